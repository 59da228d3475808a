//! Common types used across Arena services.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArenaError;

/// Problem ID type
pub type ProblemId = u32;

/// Supported submission languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Java,
}

/// How a language gets from source to a running process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageClass {
    /// Source handed straight to an interpreter
    Interpreted,
    /// Compiled to a native executable, then run
    CompiledNative,
    /// Compiled to bytecode, then run on a VM with a classpath
    CompiledVm,
}

impl Language {
    /// Every supported language, in display order
    pub const ALL: [Language; 3] = [Language::Python, Language::Cpp, Language::Java];

    /// Canonical tag used on the wire and in problem data
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python 3",
            Language::Cpp => "C++17",
            Language::Java => "Java",
        }
    }

    pub fn class(&self) -> LanguageClass {
        match self {
            Language::Python => LanguageClass::Interpreted,
            Language::Cpp => LanguageClass::CompiledNative,
            Language::Java => LanguageClass::CompiledVm,
        }
    }

    /// Whether a compile phase precedes the run
    pub fn is_compiled(&self) -> bool {
        !matches!(self.class(), LanguageClass::Interpreted)
    }
}

impl FromStr for Language {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "python3" | "py" => Ok(Language::Python),
            "cpp" | "c++" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            _ => Err(ArenaError::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single request to compile (if needed) and run a program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Program source
    pub code: String,
    /// Target language
    pub language: Language,
    /// Data fed to standard input (may be empty)
    pub stdin: String,
}

impl ExecutionRequest {
    pub fn new(code: impl Into<String>, language: Language, stdin: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language,
            stdin: stdin.into(),
        }
    }

    /// Build a request from an untyped language tag, rejecting unknown tags
    pub fn parse(code: &str, language: &str, stdin: &str) -> Result<Self, ArenaError> {
        Ok(Self::new(code, language.parse()?, stdin))
    }
}

/// Classification of a failed execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// Compiler exited non-zero or ran past its deadline
    CompileError,
    /// Program exited non-zero or died on a signal
    RuntimeError,
    /// Program ran past its deadline
    Timeout,
    /// Scratch space, toolchain launch or source inspection failed
    SetupError,
}

impl FailureKind {
    /// Get short code for failure kind
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::CompileError => "CE",
            FailureKind::RuntimeError => "RE",
            FailureKind::Timeout => "TLE",
            FailureKind::SetupError => "SE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::CompileError => "Compilation Error",
            FailureKind::RuntimeError => "Runtime Error",
            FailureKind::Timeout => "Time Limit Exceeded",
            FailureKind::SetupError => "Setup Error",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome of one execution request. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Program exited zero; `stdout` is trimmed
    Success { stdout: String, exit_code: i32 },
    /// Program never produced a usable result
    Failure { kind: FailureKind, message: String },
}

impl ExecutionResult {
    /// Successful run with trimmed output
    pub fn success(stdout: &str) -> Self {
        ExecutionResult::Success {
            stdout: stdout.trim().to_string(),
            exit_code: 0,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ExecutionResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }

    /// Captured stdout of a successful run
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { stdout, .. } => Some(stdout),
            ExecutionResult::Failure { .. } => None,
        }
    }

    /// Failure message, if the run failed
    pub fn error(&self) -> Option<&str> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { message, .. } => Some(message),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ExecutionResult::Success { .. } => None,
            ExecutionResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_tags() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("Python3".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("java".parse::<Language>().unwrap(), Language::Java);

        let err = "ruby".parse::<Language>().unwrap_err();
        assert_eq!(err, ArenaError::UnsupportedLanguage("ruby".to_string()));
    }

    #[test]
    fn test_language_classes() {
        assert_eq!(Language::Python.class(), LanguageClass::Interpreted);
        assert_eq!(Language::Cpp.class(), LanguageClass::CompiledNative);
        assert_eq!(Language::Java.class(), LanguageClass::CompiledVm);
        assert!(!Language::Python.is_compiled());
        assert!(Language::Java.is_compiled());
    }

    #[test]
    fn test_request_parse_rejects_unknown_tag() {
        let req = ExecutionRequest::parse("print(1)", "py", "").unwrap();
        assert_eq!(req.language, Language::Python);
        assert!(ExecutionRequest::parse("puts 1", "ruby", "").is_err());
    }

    #[test]
    fn test_success_is_trimmed() {
        let result = ExecutionResult::success("  hello\n\n");
        assert_eq!(result.output(), Some("hello"));
        assert!(result.is_success());
        assert_eq!(result.error(), None);
    }

    #[test]
    fn test_result_serialization_shape() {
        let result = ExecutionResult::failure(FailureKind::Timeout, "Time Limit Exceeded (> 5 seconds)");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "TIMEOUT");

        let json = serde_json::to_value(ExecutionResult::success("42")).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["stdout"], "42");
        assert_eq!(json["exit_code"], 0);
    }

    #[test]
    fn test_failure_kind_codes() {
        assert_eq!(FailureKind::CompileError.code(), "CE");
        assert_eq!(FailureKind::Timeout.to_string(), "TLE");
        assert_eq!(FailureKind::RuntimeError.label(), "Runtime Error");
    }
}
