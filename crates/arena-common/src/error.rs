//! Error types for Arena services.

use thiserror::Error;

/// Errors that escape the engine and verdict boundaries.
///
/// Compile errors, runtime errors and timeouts are not errors at this level:
/// they are reported as [`ExecutionResult::Failure`](crate::ExecutionResult).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// Language tag outside the supported set
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Scratch space could not be allocated
    #[error("Setup error: {0}")]
    Setup(String),

    /// No problem with this id in the bank
    #[error("Problem not found: {0}")]
    ProblemNotFound(u32),

    /// Problem defines no test cases to run
    #[error("Problem {0} has no test cases")]
    NoTestCases(u32),
}

impl ArenaError {
    /// Returns the error code string for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ArenaError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            ArenaError::Setup(_) => "SETUP_ERROR",
            ArenaError::ProblemNotFound(_) => "PROBLEM_NOT_FOUND",
            ArenaError::NoTestCases(_) => "NO_TEST_CASES",
        }
    }

    /// True for errors caused by caller input rather than the host
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ArenaError::Setup(_))
    }
}

/// Result type alias using ArenaError
pub type ArenaResult<T> = Result<T, ArenaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ArenaError::UnsupportedLanguage("ruby".into()).error_code(),
            "UNSUPPORTED_LANGUAGE"
        );
        assert_eq!(ArenaError::Setup("disk full".into()).error_code(), "SETUP_ERROR");
        assert_eq!(ArenaError::ProblemNotFound(9).error_code(), "PROBLEM_NOT_FOUND");
        assert_eq!(ArenaError::NoTestCases(1).error_code(), "NO_TEST_CASES");
    }

    #[test]
    fn test_display_and_classification() {
        let err = ArenaError::UnsupportedLanguage("ruby".into());
        assert_eq!(err.to_string(), "Unsupported language: ruby");
        assert!(err.is_client_error());
        assert!(!ArenaError::Setup("x".into()).is_client_error());
    }
}
