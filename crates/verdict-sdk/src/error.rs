//! SDK error types

use thiserror::Error;
use verdict_core::{CombineError, CoreError};
use verdict_parser::ParseError;
use verdict_runtime::EvalError;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parser error
    #[error("Parser error: {0}")]
    Parse(#[from] ParseError),

    /// Combine error
    #[error("Combine error: {0}")]
    Combine(#[from] CombineError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// Schema or serialization error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Coarse error category, stable across error message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Combine,
    Eval,
    Config,
}

impl SdkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdkError::Parse(ParseError::Lex(_)) => ErrorKind::Lex,
            SdkError::Parse(_) => ErrorKind::Syntax,
            SdkError::Combine(_) => ErrorKind::Combine,
            SdkError::Eval(_) => ErrorKind::Eval,
            SdkError::Config(_) | SdkError::Core(_) => ErrorKind::Config,
        }
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_parser::LexError;

    #[test]
    fn test_config_error() {
        let error = SdkError::Config("max_depth must be at least 1".to_string());
        assert!(error.to_string().contains("Configuration error"));
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_kind_separates_lex_from_syntax() {
        let lex: SdkError = ParseError::Lex(LexError::UnexpectedChar { position: 0, ch: '$' }).into();
        assert_eq!(lex.kind(), ErrorKind::Lex);

        let syntax: SdkError = ParseError::Syntax {
            position: 3,
            expected: "')'".to_string(),
            found: "end of input".to_string(),
        }
        .into();
        assert_eq!(syntax.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_eval_error_conversion() {
        let error: SdkError = EvalError::MissingField {
            field: "age".to_string(),
        }
        .into();
        assert_eq!(error.kind(), ErrorKind::Eval);
        assert_eq!(error.to_string(), "Evaluation error: Field not found: age");
    }

    #[test]
    fn test_combine_error_conversion() {
        let error: SdkError = CombineError::TooFew { got: 1 }.into();
        assert_eq!(error.kind(), ErrorKind::Combine);
    }
}
