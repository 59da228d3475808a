//! Charon - sandboxed execution engine for Arena
//!
//! Takes untrusted source in one of the supported languages, compiles it when
//! the language needs it, runs it against a stdin payload and classifies the
//! outcome. Every process runs as the leader of its own process group under a
//! hard deadline, and every file lives in a scratch directory owned by a
//! single [`Engine`].

pub mod config;
pub mod engine;
pub mod languages;
pub mod process;

use async_trait::async_trait;

use arena_common::{ExecutionRequest, ExecutionResult};

pub use config::{EngineConfig, ToolchainConfig};
pub use engine::Engine;

/// Something that can run execution requests and be released afterwards.
///
/// The verdict layer is written against this trait so it can drive either a
/// real [`Engine`] or a scripted stand-in.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Run one request to completion
    async fn run(&self, request: &ExecutionRequest) -> ExecutionResult;

    /// Release every resource held by the sandbox. Must be idempotent.
    fn release(&mut self);
}

#[async_trait]
impl Sandbox for Engine {
    async fn run(&self, request: &ExecutionRequest) -> ExecutionResult {
        self.execute_request(request).await
    }

    fn release(&mut self) {
        self.cleanup();
    }
}
