//! Type system for Verdict
//!
//! - Value types for data contexts
//! - Attribute schemas
//! - Context validators

pub mod schema;
pub mod validator;
pub mod value;

pub use schema::{FieldType, Schema, SchemaField};
pub use validator::{ValidationError, Validator};
pub use value::Value;
