//! Abstract Syntax Tree (AST) definitions for emojin.
//!
//! Both back ends (the interpreter and the class-file compiler) consume
//! these types by exhaustive matching, so adding a variant here is a
//! compile error in each of them until it is handled.

use std::fmt;

use crate::lexer::symbols;

/// A 1-based source position, counted in graphemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number
    pub line: usize,
    /// Column number
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// The name of the identifier
    pub name: String,
    /// Where the identifier appears
    pub position: Position,
}

/// An emojin statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// 📢 expr ⛔️
    Print(PrintStatement),
    /// 🔖 name [🫵 expr] ⛔️
    Declaration(VariableDeclaration),
    /// 🤔 cond 🔜 … 🔚 [🧐 cond 🔜 … 🔚]* [☹️ 🔜 … 🔚]
    If(IfStatement),
    /// ♻️ name 🌀 start ➰ end 🔜 … 🔚
    For(ForStatement),
    /// 🔁 cond 🔜 … 🔚
    While(WhileStatement),
    /// expr ⛔️
    Expression(ExpressionStatement),
}

/// A print statement.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    /// The value to print
    pub argument: Expression,
    /// Position of the 📢 keyword
    pub position: Position,
}

/// A variable declaration statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// The identifier being declared
    pub id: Identifier,
    /// Optional initializer expression; `None` declares the variable as null
    pub init: Option<Expression>,
}

/// An if statement with its else-if chain.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The condition
    pub test: Expression,
    /// The block run when the condition is truthy
    pub consequent: Vec<Statement>,
    /// Else-if clauses, in source order. Each one has empty
    /// `else_ifs` and `alternate` lists of its own.
    pub else_ifs: Vec<IfStatement>,
    /// The else block (empty when absent)
    pub alternate: Vec<Statement>,
}

/// A counted for loop over `start..end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// The induction variable
    pub variable: Identifier,
    /// Inclusive start
    pub start: Expression,
    /// Exclusive end
    pub end: Expression,
    /// The loop body
    pub body: Vec<Statement>,
}

/// A while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// The condition, re-evaluated before every iteration
    pub test: Expression,
    /// The loop body
    pub body: Vec<Statement>,
}

/// An expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The expression
    pub expression: Expression,
}

/// An emojin expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal value
    Literal(LiteralExpression),
    /// Identifier reference
    Identifier(Identifier),
    /// Unary expression
    Unary(UnaryExpression),
    /// Binary expression
    Binary(BinaryExpression),
    /// Assignment expression
    Assignment(AssignmentExpression),
}

impl Expression {
    /// The position of the token this expression is reported at.
    pub fn position(&self) -> Position {
        match self {
            Expression::Literal(literal) => literal.position,
            Expression::Identifier(id) => id.position,
            Expression::Unary(unary) => unary.position,
            Expression::Binary(binary) => binary.position,
            Expression::Assignment(assign) => assign.target.position,
        }
    }
}

/// A literal together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    /// The value
    pub value: Literal,
    /// Where the literal appears
    pub position: Position,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// 🫥
    Null,
}

/// A binary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// The operator
    pub operator: BinaryOperator,
    /// The left operand
    pub left: Box<Expression>,
    /// The right operand
    pub right: Box<Expression>,
    /// Position of the operator token
    pub position: Position,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// ➕
    Add,
    /// ➖
    Subtract,
    /// ✖️
    Multiply,
    /// ➗
    Divide,
    /// 🪣
    Modulo,
    /// ⚖️
    Equal,
    /// 👉
    LessThan,
    /// ⚖️👉
    LessThanEqual,
    /// 👈
    GreaterThan,
    /// 👈⚖️
    GreaterThanEqual,
    /// 🫂
    LogicalAnd,
    /// 💫
    LogicalOr,
}

impl BinaryOperator {
    /// The source spelling of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => symbols::PLUS,
            BinaryOperator::Subtract => symbols::MINUS,
            BinaryOperator::Multiply => symbols::TIMES,
            BinaryOperator::Divide => symbols::DIVIDE,
            BinaryOperator::Modulo => symbols::BUCKET,
            BinaryOperator::Equal => symbols::BALANCE,
            BinaryOperator::LessThan => symbols::RIGHT_HAND,
            BinaryOperator::LessThanEqual => symbols::LESS_EQUAL,
            BinaryOperator::GreaterThan => symbols::LEFT_HAND,
            BinaryOperator::GreaterThanEqual => symbols::GREATER_EQUAL,
            BinaryOperator::LogicalAnd => symbols::HUGGING,
            BinaryOperator::LogicalOr => symbols::DIZZY,
        }
    }

    /// Returns true for the operators producing a boolean from two numbers.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::LessThan
                | BinaryOperator::LessThanEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanEqual
        )
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A unary expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    /// The operator
    pub operator: UnaryOperator,
    /// The operand
    pub argument: Box<Expression>,
    /// Position of the operator token
    pub position: Position,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// ➖
    Minus,
}

/// An assignment to an existing variable.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    /// The variable being reassigned
    pub target: Identifier,
    /// The new value
    pub value: Box<Expression>,
}
