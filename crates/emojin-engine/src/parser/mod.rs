//! Parser for emojin source code.
//!
//! Transforms a stream of tokens into an Abstract Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - Main recursive descent parser implementation
//!
//! ## Documentation Submodules
//!
//! The following submodules provide documentation and additional tests
//! for specific parsing areas:
//!
//! - `statements` - Statement parsing (print, declarations, if, for, while)
//! - `expressions` - Expression parsing (operators, literals, assignment)
//!
//! ## Usage
//!
//! ```rust
//! use emojin_engine::lexer::tokenize;
//! use emojin_engine::parser::Parser;
//!
//! let mut parser = Parser::new(tokenize("🔖❤️🫵1️⃣➕2️⃣⛔️"));
//! let program = parser.parse_program().expect("Should parse");
//! assert_eq!(program.len(), 1);
//! ```

mod parser;

// Documentation and test submodules
pub mod expressions;
pub mod statements;

pub use parser::Parser;

use crate::ast::Statement;
use crate::error::ParseError;
use crate::lexer::Token;

/// Parses a token sequence into a statement list.
pub fn parse(tokens: Vec<Token>) -> Result<Vec<Statement>, ParseError> {
    Parser::new(tokens).parse_program()
}
