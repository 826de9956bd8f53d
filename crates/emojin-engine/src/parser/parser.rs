//! The main parser implementation.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind, symbols};

type ParseResult<T> = Result<T, ParseError>;

/// A recursive descent parser for emojin.
///
/// The parser owns the token stream produced by the lexer and stops at the
/// first error; there is no recovery and no partial tree.
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    current: Token,
}

impl Parser {
    /// Creates a new parser over a token sequence.
    ///
    /// A missing trailing [`TokenKind::Eof`] is supplied automatically.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter().peekable();
        let current = tokens.next().unwrap_or_else(|| Token::eof(0, 1, 1));
        Self { tokens, current }
    }

    /// Parses the whole token stream into a statement list.
    pub fn parse_program(&mut self) -> ParseResult<Vec<Statement>> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        tracing::trace!(statements = body.len(), "parsed program");
        Ok(body)
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        match &self.current.kind {
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::Declare => self.parse_variable_declaration(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::While => self.parse_while_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_print_statement(&mut self) -> ParseResult<Statement> {
        let position = self.position();
        self.advance(); // consume 📢

        let argument = self.parse_expression("print statement")?;
        self.expect_stop("print statement", "the printed value")?;

        Ok(Statement::Print(PrintStatement { argument, position }))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Statement> {
        const CONSTRUCT: &str = "declaration";
        self.advance(); // consume 🔖

        let id = self.expect_identifier(CONSTRUCT, symbols::TAG)?;

        let init = if self.check(&TokenKind::Assign) {
            self.advance();
            let init = self.parse_expression(CONSTRUCT)?;
            self.expect_stop(CONSTRUCT, "the initializer")?;
            Some(init)
        } else {
            self.expect_stop(CONSTRUCT, "the variable name")?;
            None
        };

        Ok(Statement::Declaration(VariableDeclaration { id, init }))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        const CONSTRUCT: &str = "if statement";
        self.advance(); // consume 🤔

        let test = self.parse_expression(CONSTRUCT)?;
        let consequent = self.parse_block(CONSTRUCT, "the condition")?;

        let mut else_ifs = Vec::new();
        while self.check(&TokenKind::ElseIf) {
            self.advance();
            let test = self.parse_expression(CONSTRUCT)?;
            let consequent = self.parse_block(CONSTRUCT, "the else-if condition")?;
            else_ifs.push(IfStatement {
                test,
                consequent,
                else_ifs: Vec::new(),
                alternate: Vec::new(),
            });
        }

        let alternate = if self.check(&TokenKind::Else) {
            self.advance();
            self.parse_block(CONSTRUCT, symbols::FROWNING)?
        } else {
            Vec::new()
        };

        Ok(Statement::If(IfStatement {
            test,
            consequent,
            else_ifs,
            alternate,
        }))
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        const CONSTRUCT: &str = "for statement";
        self.advance(); // consume ♻️

        let variable = self.expect_identifier(CONSTRUCT, symbols::RECYCLE)?;
        self.expect(&TokenKind::In, CONSTRUCT, "after the loop variable")?;
        let start = self.parse_expression(CONSTRUCT)?;
        self.expect(&TokenKind::To, CONSTRUCT, "after the start value")?;
        let end = self.parse_expression(CONSTRUCT)?;
        let body = self.parse_block(CONSTRUCT, "the end value")?;

        Ok(Statement::For(ForStatement {
            variable,
            start,
            end,
            body,
        }))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        const CONSTRUCT: &str = "while statement";
        self.advance(); // consume 🔁

        let test = self.parse_expression(CONSTRUCT)?;
        let body = self.parse_block(CONSTRUCT, "the condition")?;

        Ok(Statement::While(WhileStatement { test, body }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        const CONSTRUCT: &str = "expression statement";
        let expression = self.parse_expression(CONSTRUCT)?;
        self.expect_stop(CONSTRUCT, "the expression")?;
        Ok(Statement::Expression(ExpressionStatement { expression }))
    }

    /// Parses `🔜 statement* 🔚`.
    fn parse_block(&mut self, construct: &'static str, after: &str) -> ParseResult<Vec<Statement>> {
        if !self.check(&TokenKind::BlockOpen) {
            return Err(self.error(
                construct,
                format!("expected {} after {}", symbols::SOON, after),
            ));
        }
        self.advance();

        let mut body = Vec::new();
        while !self.check(&TokenKind::BlockClose) {
            if self.is_at_end() {
                return Err(self.error(
                    construct,
                    format!("expected {} to close the block", symbols::END),
                ));
            }
            body.push(self.parse_statement()?);
        }
        self.advance(); // consume 🔚

        Ok(body)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parses an expression.
    ///
    /// Assignment is recognized by one token of lookahead (an identifier
    /// followed by 🫵) and otherwise falls through to the operator ladder.
    fn parse_expression(&mut self, construct: &'static str) -> ParseResult<Expression> {
        if matches!(self.current.kind, TokenKind::Identifier(_))
            && self.peek_kind() == Some(&TokenKind::Assign)
        {
            let target = self.expect_identifier(construct, symbols::FINGER)?;
            self.advance(); // consume 🫵
            let value = self.parse_expression(construct)?;
            return Ok(Expression::Assignment(AssignmentExpression {
                target,
                value: Box::new(value),
            }));
        }

        self.parse_or(construct)
    }

    fn parse_or(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_and(construct)?;

        while self.check(&TokenKind::Or) {
            let position = self.position();
            self.advance();
            let right = self.parse_and(construct)?;
            left = binary(BinaryOperator::LogicalOr, left, right, position);
        }

        Ok(left)
    }

    fn parse_and(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_equality(construct)?;

        while self.check(&TokenKind::And) {
            let position = self.position();
            self.advance();
            let right = self.parse_equality(construct)?;
            left = binary(BinaryOperator::LogicalAnd, left, right, position);
        }

        Ok(left)
    }

    fn parse_equality(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_relational(construct)?;

        while self.check(&TokenKind::Equal) {
            let position = self.position();
            self.advance();
            let right = self.parse_relational(construct)?;
            left = binary(BinaryOperator::Equal, left, right, position);
        }

        Ok(left)
    }

    fn parse_relational(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_additive(construct)?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::LessThan => BinaryOperator::LessThan,
                TokenKind::LessThanEqual => BinaryOperator::LessThanEqual,
                TokenKind::GreaterThan => BinaryOperator::GreaterThan,
                TokenKind::GreaterThanEqual => BinaryOperator::GreaterThanEqual,
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_additive(construct)?;
            left = binary(operator, left, right, position);
        }

        Ok(left)
    }

    fn parse_additive(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative(construct)?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_multiplicative(construct)?;
            left = binary(operator, left, right, position);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let mut left = self.parse_unary(construct)?;

        loop {
            let operator = match &self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Modulo,
                _ => break,
            };
            let position = self.position();
            self.advance();
            let right = self.parse_unary(construct)?;
            left = binary(operator, left, right, position);
        }

        Ok(left)
    }

    fn parse_unary(&mut self, construct: &'static str) -> ParseResult<Expression> {
        if self.check(&TokenKind::Minus) {
            let position = self.position();
            self.advance();
            let argument = self.parse_unary(construct)?;
            return Ok(Expression::Unary(UnaryExpression {
                operator: UnaryOperator::Minus,
                argument: Box::new(argument),
                position,
            }));
        }

        self.parse_primary(construct)
    }

    fn parse_primary(&mut self, construct: &'static str) -> ParseResult<Expression> {
        let position = self.position();

        let expression = match &self.current.kind {
            TokenKind::Number(text) => literal(Literal::Number(number_value(text)), position),
            TokenKind::String(text) => literal(Literal::String(text.clone()), position),
            TokenKind::True => literal(Literal::Boolean(true), position),
            TokenKind::False => literal(Literal::Boolean(false), position),
            TokenKind::Null => literal(Literal::Null, position),
            TokenKind::Identifier(name) => Expression::Identifier(Identifier {
                name: name.clone(),
                position,
            }),
            TokenKind::LeftParen => {
                self.advance();
                let expression = self.parse_expression(construct)?;
                if !self.check(&TokenKind::RightParen) {
                    return Err(self.error(
                        construct,
                        format!("expected {} to close the parenthesis", symbols::RIGHT_PAREN),
                    ));
                }
                self.advance();
                return Ok(expression);
            }
            other => {
                return Err(self.error(
                    construct,
                    format!("expected a value, found {}", other),
                ));
            }
        };
        self.advance();

        if self.current.kind.starts_literal() {
            return Err(self.error(
                construct,
                format!(
                    "stray literal {}; an operator may be missing",
                    self.current.kind
                ),
            ));
        }

        Ok(expression)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn advance(&mut self) {
        let next = match self.tokens.next() {
            Some(token) => token,
            None => Token::eof(self.current.span.end, self.current.line, self.current.column),
        };
        self.current = next;
    }

    fn peek_kind(&mut self) -> Option<&TokenKind> {
        self.tokens.peek().map(|token| &token.kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind, construct: &'static str, context: &str) -> ParseResult<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(
                construct,
                format!("expected {} {}, found {}", kind, context, self.current.kind),
            ))
        }
    }

    fn expect_stop(&mut self, construct: &'static str, after: &str) -> ParseResult<()> {
        if self.check(&TokenKind::Stop) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(
                construct,
                format!(
                    "expected {} after {}, found {}",
                    symbols::STOP,
                    after,
                    self.current.kind
                ),
            ))
        }
    }

    fn expect_identifier(&mut self, construct: &'static str, after: &str) -> ParseResult<Identifier> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let id = Identifier {
                name: name.clone(),
                position: self.position(),
            };
            self.advance();
            Ok(id)
        } else {
            Err(self.error(
                construct,
                format!(
                    "expected a variable name after {}, found {}",
                    after, self.current.kind
                ),
            ))
        }
    }

    fn position(&self) -> Position {
        Position::new(self.current.line, self.current.column)
    }

    fn error(&self, construct: &'static str, message: String) -> ParseError {
        ParseError::new(self.position(), construct, message)
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression, position: Position) -> Expression {
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        position,
    })
}

fn literal(value: Literal, position: Position) -> Expression {
    Expression::Literal(LiteralExpression { value, position })
}

/// Converts number token text to a value, reading the longest valid
/// decimal prefix (`1.2.3` reads as `1.2`).
fn number_value(text: &str) -> f64 {
    let prefix = match text.match_indices('.').nth(1) {
        Some((second_dot, _)) => &text[..second_dot],
        None => text,
    };
    prefix.trim_end_matches('.').parse().unwrap_or(f64::NAN)
}
