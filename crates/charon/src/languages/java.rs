//! Java language handler
//!
//! javac insists that a public class lives in a file of the same name, so the
//! entry class is read out of the source before anything touches the disk.

use std::sync::LazyLock;

use regex::Regex;

use arena_common::Language;

use super::{Invocation, LanguageHandler, SourceError};
use crate::config::ToolchainConfig;

static PUBLIC_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"public\s+class\s+(\w+)").expect("valid entry class pattern"));

/// First `public class NAME` in the source, if any
pub fn extract_class_name(code: &str) -> Option<&str> {
    PUBLIC_CLASS
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Get handler for Java
pub fn handler(code: &str, toolchain: &ToolchainConfig) -> Result<LanguageHandler, SourceError> {
    let class_name = extract_class_name(code).ok_or(SourceError::MissingEntryType)?;
    let source_file = format!("{}.java", class_name);

    Ok(LanguageHandler {
        language: Language::Java,
        compile: Some(Invocation::toolchain(&toolchain.javac, vec![source_file.clone()])),
        run: Invocation::toolchain(
            &toolchain.java,
            vec!["-cp".to_string(), ".".to_string(), class_name.to_string()],
        ),
        source_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_class_name() {
        let code = "import java.util.*;\n\npublic class Solution {\n}\n";
        assert_eq!(extract_class_name(code), Some("Solution"));
    }

    #[test]
    fn test_extract_takes_first_match() {
        let code = "public class First {}\npublic class Second {}";
        assert_eq!(extract_class_name(code), Some("First"));
    }

    #[test]
    fn test_extract_tolerates_odd_spacing() {
        assert_eq!(extract_class_name("public   class\n\tMain{}"), Some("Main"));
    }

    #[test]
    fn test_missing_public_class() {
        assert_eq!(extract_class_name("class Hidden {}"), None);

        let err = handler("class Hidden {}", &ToolchainConfig::default()).unwrap_err();
        assert_eq!(err, SourceError::MissingEntryType);
    }

    #[test]
    fn test_run_uses_classpath() {
        let handler = handler("public class Main {}", &ToolchainConfig::default()).unwrap();
        assert_eq!(handler.source_file(), "Main.java");
        assert_eq!(handler.run_invocation().args, vec!["-cp", ".", "Main"]);
    }
}
