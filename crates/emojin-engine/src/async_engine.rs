//! Asynchronous emojin engine APIs.
//!
//! Reads sources with tokio's file I/O and runs the synchronous core on
//! the blocking pool, so a long-running program does not stall the async
//! runtime.
//!
//! # Example
//!
//! ```ignore
//! use emojin_engine::AsyncEngine;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = AsyncEngine::new();
//!     let captured = engine.run_file("count.emojin").await.unwrap();
//!     for line in captured.lines {
//!         println!("{}", line);
//!     }
//! }
//! ```

use std::path::Path;

use tokio::fs;

use crate::compiler::CompileOptions;
use crate::error::{Error, Result};
use crate::interpreter::{CaptureOutput, Captured, Output};
use crate::Engine;

/// Runs and compiles emojin files without blocking the async runtime.
///
/// Every call gets its own environment; nothing is shared between runs.
#[derive(Debug, Clone, Default)]
pub struct AsyncEngine {
    options: CompileOptions,
}

impl AsyncEngine {
    /// Creates an engine with default compile options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that compiles with the given options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Runs `source` on the blocking pool and returns what it printed.
    ///
    /// A parse or runtime error is recorded as the single entry in
    /// [`Captured::errors`], matching [`interpret`](crate::interpret).
    pub async fn run(&self, source: String) -> Result<Captured> {
        tokio::task::spawn_blocking(move || {
            let capture = CaptureOutput::new();
            let mut out = capture.clone();
            if let Err(err) = Engine::new().eval(&source, &mut out) {
                out.error_line(&err.to_string());
            }
            capture.take()
        })
        .await
        .map_err(|e| Error::Task(e.to_string()))
    }

    /// Reads and runs a file.
    pub async fn run_file(&self, path: impl AsRef<Path>) -> Result<Captured> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), "running file");
        self.run(source).await
    }

    /// Runs several files concurrently. Results are in the order of `paths`.
    pub async fn run_files(&self, paths: &[impl AsRef<Path>]) -> Vec<Result<Captured>> {
        let futures: Vec<_> = paths.iter().map(|p| self.run_file(p)).collect();

        futures::future::join_all(futures).await
    }

    /// Compiles `source` on the blocking pool.
    pub async fn compile(&self, source: String) -> Result<Vec<u8>> {
        let options = self.options.clone();
        tokio::task::spawn_blocking(move || Engine::with_options(options).compile(&source))
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }

    /// Reads and compiles a file.
    pub async fn compile_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).await?;
        tracing::debug!(path = %path.display(), "compiling file");
        self.compile(source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_async_run() {
        let engine = AsyncEngine::new();
        let captured = engine.run("📢1️⃣➕2️⃣⛔️".to_string()).await.unwrap();
        assert_eq!(captured.lines, vec!["3"]);
        assert!(captured.errors.is_empty());
    }

    #[tokio::test]
    async fn test_async_run_reports_error() {
        let engine = AsyncEngine::new();
        let captured = engine
            .run("🔖❤️🫵1️⃣⛔️🔖❤️🫵2️⃣⛔️📢❤️⛔️".to_string())
            .await
            .unwrap();
        assert!(captured.lines.is_empty());
        assert_eq!(captured.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_async_compile() {
        let engine = AsyncEngine::new();
        let bytes = engine.compile("📢1️⃣⛔️".to_string()).await.unwrap();
        assert_eq!(&bytes[..4], [0xCA, 0xFE, 0xBA, 0xBE]);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let engine = AsyncEngine::new();
        let result = engine.run_file("/nonexistent/program.emojin").await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
