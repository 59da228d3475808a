//! Python language handler

use arena_common::Language;

use super::{Invocation, LanguageHandler};
use crate::config::ToolchainConfig;

/// Get handler for Python
pub fn handler(toolchain: &ToolchainConfig) -> LanguageHandler {
    let source_file = "solution.py".to_string();
    LanguageHandler {
        language: Language::Python,
        compile: None,
        run: Invocation::toolchain(&toolchain.python, vec![source_file.clone()]),
        source_file,
    }
}
