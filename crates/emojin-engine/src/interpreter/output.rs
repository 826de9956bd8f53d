//! Output sinks for the interpreter.
//!
//! A run writes program output one line at a time and, at most once, an
//! error line. Where those lines go is up to the caller.

use std::sync::Arc;

use parking_lot::Mutex;

/// The two line-oriented sinks a program writes to.
pub trait Output {
    /// Writes one line of program output.
    fn write_line(&mut self, line: &str);

    /// Writes one error line.
    fn error_line(&mut self, line: &str);
}

/// Writes to the process's standard output and standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdOutput;

impl Output for StdOutput {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }

    fn error_line(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Lines collected by a [`CaptureOutput`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Captured {
    /// Program output lines
    pub lines: Vec<String>,
    /// Error lines
    pub errors: Vec<String>,
}

/// Collects lines in memory.
///
/// Clones share the same buffer, so one clone can be handed to a run on
/// another thread while the caller keeps the other.
#[derive(Debug, Default, Clone)]
pub struct CaptureOutput {
    inner: Arc<Mutex<Captured>>,
}

impl CaptureOutput {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the output lines so far.
    pub fn lines(&self) -> Vec<String> {
        self.inner.lock().lines.clone()
    }

    /// Returns a copy of the error lines so far.
    pub fn errors(&self) -> Vec<String> {
        self.inner.lock().errors.clone()
    }

    /// Takes everything captured so far, leaving the buffer empty.
    pub fn take(&self) -> Captured {
        std::mem::take(&mut *self.inner.lock())
    }
}

impl Output for CaptureOutput {
    fn write_line(&mut self, line: &str) {
        self.inner.lock().lines.push(line.to_string());
    }

    fn error_line(&mut self, line: &str) {
        self.inner.lock().errors.push(line.to_string());
    }
}

/// Adapts a pair of closures to [`Output`].
pub struct CallbackOutput<O, E> {
    on_output: O,
    on_error: E,
}

impl<O, E> CallbackOutput<O, E>
where
    O: FnMut(&str),
    E: FnMut(&str),
{
    /// Creates an adapter calling `on_output` for output lines and
    /// `on_error` for error lines.
    pub fn new(on_output: O, on_error: E) -> Self {
        Self {
            on_output,
            on_error,
        }
    }
}

impl<O, E> Output for CallbackOutput<O, E>
where
    O: FnMut(&str),
    E: FnMut(&str),
{
    fn write_line(&mut self, line: &str) {
        (self.on_output)(line);
    }

    fn error_line(&mut self, line: &str) {
        (self.on_error)(line);
    }
}
