//! The tree-walking interpreter.
//!
//! ## Structure
//!
//! - `interpreter` - The `Interpreter` that executes statements
//! - `operators` - Binary and unary operator semantics
//! - `output` - The `Output` sink trait and its implementations
//!
//! ## Usage
//!
//! ```rust
//! use emojin_engine::interpreter::{CaptureOutput, Interpreter};
//! use emojin_engine::lexer::tokenize;
//! use emojin_engine::parser::parse;
//!
//! let program = parse(tokenize("♻️❤️🌀0️⃣➰3️⃣🔜📢❤️⛔️🔚")).expect("Should parse");
//! let mut out = CaptureOutput::new();
//! Interpreter::new().run(&program, &mut out).expect("Should run");
//! assert_eq!(out.lines(), vec!["0", "1", "2"]);
//! ```

mod interpreter;
pub mod operators;
mod output;

pub use interpreter::Interpreter;
pub use output::{CallbackOutput, CaptureOutput, Captured, Output, StdOutput};
