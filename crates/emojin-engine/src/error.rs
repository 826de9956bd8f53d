// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the emojin engine

use thiserror::Error;

use crate::ast::{BinaryOperator, Position};

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur anywhere in the engine
#[derive(Debug, Error)]
pub enum Error {
    /// The source did not parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The interpreter stopped on a runtime error
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// The class-file compiler could not lower the program
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

/// A fatal syntax error. Parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[parse error] line {line}, column {column}: {construct}: {message}")]
pub struct ParseError {
    /// Line of the offending token
    pub line: usize,
    /// Column of the offending token
    pub column: usize,
    /// The construct being parsed, e.g. `print statement`
    pub construct: &'static str,
    /// What went wrong
    pub message: String,
}

impl ParseError {
    /// Creates a parse error at the given position.
    pub fn new(position: Position, construct: &'static str, message: impl Into<String>) -> Self {
        Self {
            line: position.line,
            column: position.column,
            construct,
            message: message.into(),
        }
    }

    /// The position of the offending token.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

/// A fatal error raised while interpreting. It halts the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Operands of a binary operator have types it cannot combine
    #[error("[runtime error] {}cannot apply {operator} to {left} and {right}", at(.position))]
    TypeMismatch {
        /// The operator
        operator: BinaryOperator,
        /// Type of the left operand
        left: &'static str,
        /// Type of the right operand
        right: &'static str,
        /// Position of the operator
        position: Option<Position>,
    },

    /// Unary minus applied to a non-number
    #[error("[runtime error] {}cannot negate a {found}", at(.position))]
    UnaryOperand {
        /// Type of the operand
        found: &'static str,
        /// Position of the operator
        position: Option<Position>,
    },

    /// Read or assignment of a name that was never declared
    #[error("[runtime error] {}variable {name} is not declared", at(.position))]
    UndefinedVariable {
        /// The variable name
        name: String,
        /// Where the name is used
        position: Option<Position>,
    },

    /// Declaration of a name that is already bound
    #[error("[runtime error] {}variable {name} is already declared", at(.position))]
    AlreadyDeclared {
        /// The variable name
        name: String,
        /// Where the second declaration appears
        position: Option<Position>,
    },

    /// A loop bound that is not a number
    #[error("[runtime error] {}loop bounds must be numbers, found {found}", at(.position))]
    NonNumericRange {
        /// Type of the offending bound
        found: &'static str,
        /// Position of the bound expression
        position: Option<Position>,
    },
}

impl RuntimeError {
    /// The source position the error is reported at, if known.
    pub fn position(&self) -> Option<Position> {
        match self {
            RuntimeError::TypeMismatch { position, .. }
            | RuntimeError::UnaryOperand { position, .. }
            | RuntimeError::UndefinedVariable { position, .. }
            | RuntimeError::AlreadyDeclared { position, .. }
            | RuntimeError::NonNumericRange { position, .. } => *position,
        }
    }
}

/// Errors from lowering a program to a class file.
///
/// The bytecode back end only handles integer arithmetic, booleans and
/// printing; everything else is rejected here instead of producing a class
/// the JVM would refuse to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A construct the back end does not lower
    #[error("[compile error] {position}: {construct} cannot be compiled")]
    Unsupported {
        /// Description of the construct
        construct: String,
        /// Where it appears
        position: Position,
    },

    /// A value of the wrong static type
    #[error("[compile error] {position}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type required here
        expected: &'static str,
        /// The type of the expression
        found: &'static str,
        /// Where the expression appears
        position: Position,
    },

    /// Use of a name that has no local slot
    #[error("[compile error] {position}: variable {name} is not declared")]
    UndefinedVariable {
        /// The variable name
        name: String,
        /// Where the name is used
        position: Position,
    },

    /// Declaration of a name that already has a local slot
    #[error("[compile error] {position}: variable {name} is already declared")]
    AlreadyDeclared {
        /// The variable name
        name: String,
        /// Where the second declaration appears
        position: Position,
    },

    /// More locals than a method can address
    #[error("[compile error] too many local variables (limit {limit})")]
    TooManyLocals {
        /// Maximum number of slots
        limit: usize,
    },

    /// The constant pool grew past 65535 entries
    #[error("[compile error] constant pool overflow")]
    ConstantPoolOverflow,

    /// A string constant too long for a `CONSTANT_Utf8` entry
    #[error("[compile error] string constant is {length} bytes, limit is 65535")]
    StringTooLong {
        /// Encoded length in bytes
        length: usize,
    },

    /// A branch target is farther than a 16-bit offset can reach
    #[error("[compile error] branch offset {offset} out of range")]
    BranchOutOfRange {
        /// The offending offset
        offset: isize,
    },

    /// The method body exceeds the 65535-byte code limit
    #[error("[compile error] method code is {size} bytes, limit is 65535")]
    CodeTooLarge {
        /// Code length in bytes
        size: usize,
    },
}

fn at(position: &Option<Position>) -> String {
    match position {
        Some(position) => format!("{}: ", position),
        None => String::new(),
    }
}
