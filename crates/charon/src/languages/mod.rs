//! Language-specific handlers for compilation and execution

pub mod cpp;
pub mod java;
pub mod python;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;

use arena_common::Language;

use crate::config::ToolchainConfig;

/// Source could not be turned into a handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("No public class found in Java source")]
    MissingEntryType,
}

/// What a phase launches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Interpreter, compiler or VM launcher resolved through PATH
    Toolchain(String),
    /// File produced inside the run directory by the compile phase
    Artifact(String),
}

/// A program plus its arguments. Always runs with the run directory as cwd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Program,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn toolchain(binary: &str, args: Vec<String>) -> Self {
        Self {
            program: Program::Toolchain(binary.to_string()),
            args,
        }
    }

    pub fn artifact(name: &str) -> Self {
        Self {
            program: Program::Artifact(name.to_string()),
            args: Vec::new(),
        }
    }

    /// Build the command rooted at `dir`
    pub fn command(&self, dir: &Path) -> Command {
        let program = match &self.program {
            Program::Toolchain(binary) => PathBuf::from(binary),
            // Absolute, so resolution never depends on the parent's cwd
            Program::Artifact(name) => dir.join(name),
        };

        let mut cmd = Command::new(program);
        cmd.args(&self.args).current_dir(dir);
        cmd
    }

    /// Name of the launched program, for logs
    pub fn program_name(&self) -> &str {
        match &self.program {
            Program::Toolchain(name) | Program::Artifact(name) => name,
        }
    }
}

/// Language handler for compilation and execution
#[derive(Debug, Clone)]
pub struct LanguageHandler {
    language: Language,
    source_file: String,
    compile: Option<Invocation>,
    run: Invocation,
}

impl LanguageHandler {
    /// Get the handler for a piece of source in a specific language
    pub fn for_source(
        language: Language,
        code: &str,
        toolchain: &ToolchainConfig,
    ) -> Result<Self, SourceError> {
        match language {
            Language::Python => Ok(python::handler(toolchain)),
            Language::Cpp => Ok(cpp::handler(toolchain)),
            Language::Java => java::handler(code, toolchain),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Get the source file name
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Get the compile invocation (if needed)
    pub fn compile_invocation(&self) -> Option<&Invocation> {
        self.compile.as_ref()
    }

    /// Get the run invocation
    pub fn run_invocation(&self) -> &Invocation {
        &self.run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_match_language_class() {
        let toolchain = ToolchainConfig::default();

        let python = LanguageHandler::for_source(Language::Python, "print(1)", &toolchain).unwrap();
        assert_eq!(python.source_file(), "solution.py");
        assert!(python.compile_invocation().is_none());

        let cpp = LanguageHandler::for_source(Language::Cpp, "int main(){}", &toolchain).unwrap();
        assert_eq!(cpp.source_file(), "solution.cpp");
        assert!(cpp.compile_invocation().is_some());
        assert_eq!(cpp.run_invocation().program, Program::Artifact("solution".into()));

        let java = LanguageHandler::for_source(
            Language::Java,
            "public class Main { public static void main(String[] a) {} }",
            &toolchain,
        )
        .unwrap();
        assert_eq!(java.source_file(), "Main.java");
    }

    #[test]
    fn test_artifact_resolves_inside_run_dir() {
        let dir = Path::new("/tmp/charon-test/run-1");
        let cmd = Invocation::artifact("solution").command(dir);
        assert_eq!(cmd.as_std().get_program(), dir.join("solution").as_os_str());
        assert_eq!(cmd.as_std().get_current_dir(), Some(dir));
    }
}
