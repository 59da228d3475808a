//! Configuration for the Charon execution engine

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Engine limits and toolchain locations
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Wall-clock ceiling for running a program, in milliseconds
    pub run_timeout_ms: u64,

    /// Wall-clock ceiling for compiling a program, in milliseconds
    pub compile_timeout_ms: u64,

    /// Nominal memory limit in MB. Reported, not enforced.
    pub memory_limit_mb: u64,

    /// Cap on captured bytes per output stream
    pub output_limit_bytes: usize,

    /// Parent directory for scratch directories (system temp dir when unset)
    pub scratch_root: Option<PathBuf>,

    /// Toolchain binaries
    pub toolchain: ToolchainConfig,
}

/// Binaries used to compile and run each language
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    /// Python interpreter
    pub python: String,

    /// C++ compiler driver
    pub cxx: String,

    /// Flags passed to the C++ compiler before the source file
    pub cxx_flags: Vec<String>,

    /// Java compiler
    pub javac: String,

    /// Java launcher
    pub java: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            cxx: "g++".to_string(),
            cxx_flags: vec!["-std=c++17".to_string(), "-O2".to_string()],
            javac: "javac".to_string(),
            java: "java".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run_timeout_ms: 5000,
            compile_timeout_ms: 10_000,
            memory_limit_mb: 256,
            output_limit_bytes: 1024 * 1024, // 1 MB
            scratch_root: None,
            toolchain: ToolchainConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let toolchain = defaults.toolchain.clone();

        Self {
            run_timeout_ms: parse_var("CHARON_RUN_TIMEOUT_MS").unwrap_or(defaults.run_timeout_ms),
            compile_timeout_ms: parse_var("CHARON_COMPILE_TIMEOUT_MS")
                .unwrap_or(defaults.compile_timeout_ms),
            memory_limit_mb: parse_var("CHARON_MEMORY_LIMIT_MB").unwrap_or(defaults.memory_limit_mb),
            output_limit_bytes: parse_var("CHARON_OUTPUT_LIMIT_BYTES")
                .unwrap_or(defaults.output_limit_bytes),
            scratch_root: env::var("CHARON_SCRATCH_ROOT").ok().map(PathBuf::from),
            toolchain: ToolchainConfig {
                python: env::var("CHARON_PYTHON").unwrap_or(toolchain.python),
                cxx: env::var("CHARON_CXX").unwrap_or(toolchain.cxx),
                cxx_flags: env::var("CHARON_CXX_FLAGS")
                    .map(|v| split_flags(&v))
                    .unwrap_or(toolchain.cxx_flags),
                javac: env::var("CHARON_JAVAC").unwrap_or(toolchain.javac),
                java: env::var("CHARON_JAVA").unwrap_or(toolchain.java),
            },
        }
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_millis(self.run_timeout_ms)
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_millis(self.compile_timeout_ms)
    }

    /// Longest a single `execute` call can block
    pub fn ceiling(&self) -> Duration {
        self.compile_timeout() + self.run_timeout()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn split_flags(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Render a duration the way users see limits ("5 seconds", "1.5 seconds")
pub(crate) fn describe_secs(limit: Duration) -> String {
    let secs = limit.as_secs_f64();
    if secs.fract() == 0.0 {
        format!("{} seconds", secs as u64)
    } else {
        format!("{:.1} seconds", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.run_timeout(), Duration::from_secs(5));
        assert_eq!(config.compile_timeout(), Duration::from_secs(10));
        assert_eq!(config.ceiling(), Duration::from_secs(15));
        assert!(config.scratch_root.is_none());
        assert_eq!(config.toolchain.python, "python3");
        assert!(config.toolchain.cxx_flags.contains(&"-O2".to_string()));
    }

    #[test]
    fn test_split_flags() {
        assert_eq!(split_flags("  -std=c++20   -O3 "), vec!["-std=c++20", "-O3"]);
        assert!(split_flags("").is_empty());
    }

    #[test]
    fn test_describe_secs() {
        assert_eq!(describe_secs(Duration::from_secs(5)), "5 seconds");
        assert_eq!(describe_secs(Duration::from_millis(1500)), "1.5 seconds");
    }
}
