//! C++ language handler

use arena_common::Language;

use super::{Invocation, LanguageHandler};
use crate::config::ToolchainConfig;

const SOURCE_FILE: &str = "solution.cpp";
const EXECUTABLE: &str = "solution";

/// Get handler for C++
pub fn handler(toolchain: &ToolchainConfig) -> LanguageHandler {
    let mut args = toolchain.cxx_flags.clone();
    args.extend([
        SOURCE_FILE.to_string(),
        "-o".to_string(),
        EXECUTABLE.to_string(),
    ]);

    LanguageHandler {
        language: Language::Cpp,
        source_file: SOURCE_FILE.to_string(),
        compile: Some(Invocation::toolchain(&toolchain.cxx, args)),
        run: Invocation::artifact(EXECUTABLE),
    }
}
