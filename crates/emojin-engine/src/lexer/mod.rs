//! Lexical analysis (tokenization) for emojin source code.
//!
//! The lexer segments source text into grapheme clusters and turns them
//! into a stream of tokens that can be consumed by the parser. Emoji such
//! as `⛔️` or `3️⃣` span several code points, so scanning by `char` would
//! split them.
//!
//! ## Structure
//!
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token` and `TokenKind` definitions
//! - `symbols.rs` - The emoji symbol table
//!
//! ## Documentation Submodules
//!
//! - `operators` - Operator scanning and two-grapheme comparisons
//!
//! ## Usage
//!
//! ```rust
//! use emojin_engine::lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("📢1️⃣➕2️⃣⛔️");
//!
//! loop {
//!     let token = scanner.next_token();
//!     if matches!(token.kind, TokenKind::Eof) {
//!         break;
//!     }
//!     println!("{:?}", token.kind);
//! }
//! ```
//!
//! The lexer never fails: anything that is not a known symbol becomes part
//! of an identifier, a string or a comment.

mod scanner;
pub mod symbols;
mod token;

// Documentation and test submodules
pub mod operators;

pub use scanner::{Scanner, tokenize};
pub use token::{Span, Token, TokenKind};
