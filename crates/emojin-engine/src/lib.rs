// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # emojin-engine
//!
//! The front end and both back ends of emojin, a small language whose
//! tokens are emoji.
//!
//! ## Overview
//!
//! - A lexer that scans grapheme clusters, so multi-codepoint emoji are
//!   single symbols
//! - A recursive-descent parser producing a typed AST
//! - A tree-walking interpreter
//! - A compiler from the same AST to a JVM class file
//!
//! ## Quick Start
//!
//! ```rust
//! let mut lines = Vec::new();
//! emojin_engine::interpret(
//!     "♻️❤️🌀0️⃣➰3️⃣🔜📢❤️⛔️🔚",
//!     |line| lines.push(line.to_string()),
//!     |err| panic!("{}", err),
//! );
//! assert_eq!(lines, ["0", "1", "2"]);
//!
//! let class = emojin_engine::compile_to_bytecode("📢1️⃣➕2️⃣⛔️", |err| panic!("{}", err));
//! assert_eq!(&class[..4], [0xCA, 0xFE, 0xBA, 0xBE]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod compiler;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;

#[cfg(feature = "async")]
pub mod async_engine;
#[cfg(feature = "parallel")]
pub mod parallel;

// Re-exports for convenience
pub use ast::Statement;
pub use compiler::{CompileOptions, Compiler};
pub use error::{CompileError, Error, ParseError, Result, RuntimeError};
pub use interpreter::{CallbackOutput, CaptureOutput, Interpreter, Output, StdOutput};
pub use runtime::Value;

#[cfg(feature = "async")]
pub use async_engine::AsyncEngine;

/// Lexes and parses a source text.
pub fn parse(source: &str) -> std::result::Result<Vec<Statement>, ParseError> {
    parser::parse(lexer::tokenize(source))
}

/// An interpreter session plus compile settings.
///
/// Variables declared by one [`eval`](Engine::eval) stay bound for the
/// next, which is how the REPL keeps state between inputs.
#[derive(Debug, Default)]
pub struct Engine {
    interpreter: Interpreter,
    options: CompileOptions,
}

impl Engine {
    /// Creates an engine with an empty environment and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that compiles with the given options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            interpreter: Interpreter::new(),
            options,
        }
    }

    /// Parses and runs `source` in this session.
    ///
    /// Output lines go to `out`; a parse or runtime error is returned and
    /// not written anywhere.
    pub fn eval(&mut self, source: &str, out: &mut dyn Output) -> Result<()> {
        let program = parse(source)?;
        self.interpreter.run(&program, out)?;
        Ok(())
    }

    /// Compiles `source` to class-file bytes.
    pub fn compile(&self, source: &str) -> Result<Vec<u8>> {
        let program = parse(source)?;
        Ok(Compiler::with_options(self.options.clone()).compile(&program)?)
    }

    /// Compiles `source` and lists the generated methods' instructions.
    pub fn disassemble(&self, source: &str) -> Result<String> {
        let program = parse(source)?;
        let class = Compiler::with_options(self.options.clone()).compile_class(&program)?;
        Ok(class.disassemble())
    }

    /// Drops every variable binding.
    pub fn reset(&mut self) {
        self.interpreter = Interpreter::new();
    }

    /// The interpreter session.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// The compile settings.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }
}

/// Runs `source` from a fresh environment.
///
/// Each printed line is passed to `on_output_line`. A parse or runtime
/// error is reported as a single line to `on_error_line` and ends the run.
pub fn interpret(
    source: &str,
    on_output_line: impl FnMut(&str),
    on_error_line: impl FnMut(&str),
) {
    let mut out = CallbackOutput::new(on_output_line, on_error_line);
    if let Err(err) = Engine::new().eval(source, &mut out) {
        tracing::debug!(error = %err, "run failed");
        out.error_line(&err.to_string());
    }
}

/// Compiles `source` to the bytes of `EmojinMain.class`.
///
/// On failure the error is reported as a single line to `on_error_line`
/// and the returned buffer is empty.
pub fn compile_to_bytecode(source: &str, mut on_error_line: impl FnMut(&str)) -> Vec<u8> {
    match Engine::new().compile(source) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(error = %err, "compile failed");
            on_error_line(&err.to_string());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (Vec<String>, Vec<String>) {
        let mut lines = Vec::new();
        let mut errors = Vec::new();
        interpret(
            source,
            |line| lines.push(line.to_string()),
            |err| errors.push(err.to_string()),
        );
        (lines, errors)
    }

    #[test]
    fn test_interpret_output() {
        let (lines, errors) = run("🔖❤️🫵4️⃣⛔️🤔❤️🪣2️⃣⚖️0️⃣🔜📢💬偶数💬⛔️🔚☹️🔜📢💬奇数💬⛔️🔚");
        assert_eq!(lines, vec!["偶数"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_interpret_parse_error() {
        let (lines, errors) = run("📢1️⃣➕⛔️📢2️⃣⛔️");
        assert!(lines.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[parse error]"), "{}", errors[0]);
    }

    #[test]
    fn test_interpret_runtime_error_halts() {
        let (lines, errors) = run("📢1️⃣⛔️📢😇⛔️📢2️⃣⛔️");
        assert_eq!(lines, vec!["1"]);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[runtime error]"), "{}", errors[0]);
    }

    #[test]
    fn test_interpret_runs_are_independent() {
        run("🔖❤️🫵1️⃣⛔️");
        let (_, errors) = run("🔖❤️🫵1️⃣⛔️");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_compile_to_bytecode_error() {
        let mut errors = Vec::new();
        let bytes = compile_to_bytecode("📢🫥⛔️", |err| errors.push(err.to_string()));
        assert!(bytes.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[compile error]"), "{}", errors[0]);
    }

    #[test]
    fn test_engine_session_keeps_bindings() {
        let mut engine = Engine::new();
        let mut out = CaptureOutput::new();
        engine.eval("🔖❤️🫵4️⃣⛔️", &mut out).unwrap();
        engine.eval("📢❤️✖️2️⃣⛔️", &mut out).unwrap();
        assert_eq!(out.lines(), vec!["8"]);

        engine.reset();
        assert!(matches!(
            engine.eval("📢❤️⛔️", &mut out),
            Err(Error::Runtime(RuntimeError::UndefinedVariable { .. }))
        ));
    }

    #[test]
    fn test_engine_compile_uses_options() {
        let engine = Engine::with_options(CompileOptions::with_class_name("Demo"));
        let bytes = engine.compile("📢1️⃣⛔️").unwrap();
        let demo = b"Demo";
        assert!(bytes.windows(demo.len()).any(|w| w == demo));
    }

    #[test]
    fn test_engine_disassemble() {
        let listing = Engine::new().disassemble("🔖❤️🫵5️⃣⛔️📢❤️⛔️").unwrap();
        assert!(listing.contains("main([Ljava/lang/String;)V:"));
        assert!(listing.contains("iconst_5"));
        assert!(listing.contains("istore_1"));

        assert!(matches!(
            Engine::new().disassemble("📢🫥⛔️"),
            Err(Error::Compile(_))
        ));
    }
}
