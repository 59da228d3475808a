//! Sandboxed execution engine
//!
//! An [`Engine`] owns one private scratch directory for its whole life. Each
//! call gets a fresh run directory inside it, which is removed before the call
//! returns, so nothing one execution writes can be seen by the next.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use tokio::fs;

use arena_common::{ArenaError, ArenaResult, ExecutionRequest, ExecutionResult, FailureKind};

use crate::config::{EngineConfig, describe_secs};
use crate::languages::{Invocation, LanguageHandler};
use crate::process::{ProcessOutcome, describe_exit, run_supervised};

/// Sandboxed executor for untrusted submissions
pub struct Engine {
    config: EngineConfig,
    scratch: Option<TempDir>,
    scratch_path: PathBuf,
}

impl Engine {
    /// Create an engine with default limits and toolchains
    pub fn new() -> ArenaResult<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine, allocating its scratch directory
    pub fn with_config(config: EngineConfig) -> ArenaResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("charon-");

        let scratch = match &config.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ArenaError::Setup(format!("Failed to create scratch directory: {}", e)))?;

        let scratch_path = scratch.path().to_path_buf();
        tracing::debug!(
            scratch = %scratch_path.display(),
            run_timeout_ms = config.run_timeout_ms,
            compile_timeout_ms = config.compile_timeout_ms,
            memory_limit_mb = config.memory_limit_mb,
            "Engine created"
        );

        Ok(Self {
            config,
            scratch: Some(scratch),
            scratch_path,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Location of the scratch directory (it may already be released)
    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    /// Whether `cleanup` has already run
    pub fn is_released(&self) -> bool {
        self.scratch.is_none()
    }

    /// Execute `code` written in the language named by `language`.
    ///
    /// Unknown language tags are rejected before any file or process is
    /// created. Every other outcome, including setup problems, comes back
    /// as an [`ExecutionResult`].
    pub async fn execute(
        &self,
        code: &str,
        language: &str,
        stdin: &str,
    ) -> ArenaResult<ExecutionResult> {
        let request = ExecutionRequest::parse(code, language, stdin)?;
        Ok(self.execute_request(&request).await)
    }

    /// Execute an already validated request
    pub async fn execute_request(&self, request: &ExecutionRequest) -> ExecutionResult {
        let Some(scratch) = self.scratch.as_ref() else {
            return ExecutionResult::failure(FailureKind::SetupError, "engine has been cleaned up");
        };

        let handler = match LanguageHandler::for_source(
            request.language,
            &request.code,
            &self.config.toolchain,
        ) {
            Ok(handler) => handler,
            Err(e) => return ExecutionResult::failure(FailureKind::SetupError, e.to_string()),
        };

        let run_dir = match tempfile::Builder::new()
            .prefix("run-")
            .tempdir_in(scratch.path())
        {
            Ok(dir) => dir,
            Err(e) => return setup_failure("Failed to create run directory", e),
        };

        let start = Instant::now();
        let result = self.execute_in(&handler, request, run_dir.path()).await;

        tracing::debug!(
            language = %request.language,
            elapsed_ms = start.elapsed().as_millis() as u64,
            outcome = result.failure_kind().map(|k| k.code()).unwrap_or("OK"),
            "Execution finished"
        );

        let run_path = run_dir.path().to_path_buf();
        if let Err(e) = run_dir.close() {
            tracing::warn!(
                run_dir = %run_path.display(),
                error = %e,
                "Failed to remove run directory"
            );
        }

        result
    }

    async fn execute_in(
        &self,
        handler: &LanguageHandler,
        request: &ExecutionRequest,
        dir: &Path,
    ) -> ExecutionResult {
        let source_path = dir.join(handler.source_file());
        if let Err(e) = fs::write(&source_path, &request.code).await {
            return setup_failure("Failed to write source file", e);
        }

        if let Some(compile) = handler.compile_invocation() {
            if let Err(failure) = self.compile(compile, dir).await {
                return failure;
            }
        }

        self.run(handler.run_invocation(), &request.stdin, dir).await
    }

    /// Compile phase. Any failure, including running out of time, is a compile error.
    async fn compile(&self, invocation: &Invocation, dir: &Path) -> Result<(), ExecutionResult> {
        let limit = self.config.compile_timeout();
        let outcome = run_supervised(
            invocation.command(dir),
            "",
            limit,
            self.config.output_limit_bytes,
        )
        .await
        .map_err(|e| launch_failure(invocation, e))?;

        match outcome {
            ProcessOutcome::Exited {
                status,
                stdout,
                stderr,
                elapsed,
            } => {
                tracing::debug!(
                    phase = "compile",
                    program = invocation.program_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    success = status.success(),
                    "Compiler finished"
                );

                if status.success() {
                    return Ok(());
                }

                let diagnostics = first_non_blank(&[&stderr, &stdout])
                    .unwrap_or_else(|| format!("Compilation failed ({})", describe_exit(&status)));
                Err(ExecutionResult::failure(FailureKind::CompileError, diagnostics))
            }
            ProcessOutcome::TimedOut { .. } => Err(ExecutionResult::failure(
                FailureKind::CompileError,
                format!("Compilation timed out (> {})", describe_secs(limit)),
            )),
        }
    }

    /// Run phase
    async fn run(&self, invocation: &Invocation, stdin: &str, dir: &Path) -> ExecutionResult {
        let limit = self.config.run_timeout();
        let outcome = match run_supervised(
            invocation.command(dir),
            stdin,
            limit,
            self.config.output_limit_bytes,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => return launch_failure(invocation, e),
        };

        match outcome {
            ProcessOutcome::Exited {
                status,
                stdout,
                stderr,
                elapsed,
            } => {
                tracing::debug!(
                    phase = "run",
                    program = invocation.program_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    exit = %describe_exit(&status),
                    "Program finished"
                );

                if status.success() {
                    ExecutionResult::success(&stdout)
                } else {
                    let message = first_non_blank(&[&stderr])
                        .unwrap_or_else(|| format!("Runtime Error ({})", describe_exit(&status)));
                    ExecutionResult::failure(FailureKind::RuntimeError, message)
                }
            }
            ProcessOutcome::TimedOut { elapsed } => {
                tracing::info!(
                    phase = "run",
                    program = invocation.program_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Program exceeded time limit"
                );
                ExecutionResult::failure(
                    FailureKind::Timeout,
                    format!("Time Limit Exceeded (> {})", describe_secs(limit)),
                )
            }
        }
    }

    /// Remove the scratch directory. Safe to call any number of times.
    pub fn cleanup(&mut self) {
        let Some(scratch) = self.scratch.take() else {
            return;
        };

        match scratch.close() {
            Ok(()) => tracing::debug!(scratch = %self.scratch_path.display(), "Engine cleaned up"),
            Err(e) => tracing::warn!(
                scratch = %self.scratch_path.display(),
                error = %e,
                "Failed to remove scratch directory"
            ),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn first_non_blank(candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn setup_failure(context: &str, err: io::Error) -> ExecutionResult {
    ExecutionResult::failure(FailureKind::SetupError, format!("{}: {}", context, err))
}

fn launch_failure(invocation: &Invocation, err: io::Error) -> ExecutionResult {
    tracing::error!(program = invocation.program_name(), error = %err, "Failed to launch process");
    ExecutionResult::failure(
        FailureKind::SetupError,
        format!("Failed to launch {}: {}", invocation.program_name(), err),
    )
}
