//! Token definitions for the emojin lexer.

use std::fmt;

use super::symbols;

/// A span in the source code, representing a range of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the slice of `source` covered by this span.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The span in the source code
    pub span: Span,
    /// 1-based line of the first grapheme
    pub line: usize,
    /// 1-based column of the first grapheme, counted in graphemes
    pub column: usize,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, line: usize, column: usize) -> Self {
        Self {
            kind,
            span,
            line,
            column,
        }
    }

    /// Creates the end-of-input marker at the given position.
    pub fn eof(offset: usize, line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, Span::new(offset, offset), line, column)
    }
}

/// The different kinds of tokens in emojin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    /// Numeric literal, as ASCII decimal text (`1.5`, or the permissive `1.2.3`)
    Number(String),
    /// String literal between two speech balloons
    String(String),
    /// Identifier made of any non-reserved graphemes
    Identifier(String),
    /// ✅
    True,
    /// ❌
    False,
    /// 🫥
    Null,

    // Operators
    /// ➕
    Plus,
    /// ➖
    Minus,
    /// ✖️
    Star,
    /// ➗
    Slash,
    /// 🪣
    Percent,
    /// 💫
    Or,
    /// 🫂
    And,
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
    /// 🫵
    Assign,

    // Punctuation
    /// (
    LeftParen,
    /// )
    RightParen,
    /// 🔜
    BlockOpen,
    /// 🔚
    BlockClose,
    /// ⛔️
    Stop,

    // Keywords
    /// 🤔
    If,
    /// 🧐
    ElseIf,
    /// ☹️
    Else,
    /// 📢
    Print,
    /// 🔖
    Declare,
    /// ♻️
    For,
    /// 🌀
    In,
    /// ➰
    To,
    /// 🔁
    While,

    /// End of input
    Eof,
}

impl TokenKind {
    /// Returns true if this token can begin a literal expression.
    pub fn starts_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Identifier(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// The source symbol of a fixed token, if it has one.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::True => symbols::CHECK,
            TokenKind::False => symbols::CROSS,
            TokenKind::Null => symbols::DOTTED_FACE,
            TokenKind::Plus => symbols::PLUS,
            TokenKind::Minus => symbols::MINUS,
            TokenKind::Star => symbols::TIMES,
            TokenKind::Slash => symbols::DIVIDE,
            TokenKind::Percent => symbols::BUCKET,
            TokenKind::Or => symbols::DIZZY,
            TokenKind::And => symbols::HUGGING,
            TokenKind::Equal => symbols::BALANCE,
            TokenKind::LessThan => symbols::RIGHT_HAND,
            TokenKind::LessThanEqual => symbols::LESS_EQUAL,
            TokenKind::GreaterThan => symbols::LEFT_HAND,
            TokenKind::GreaterThanEqual => symbols::GREATER_EQUAL,
            TokenKind::Assign => symbols::FINGER,
            TokenKind::LeftParen => symbols::LEFT_PAREN,
            TokenKind::RightParen => symbols::RIGHT_PAREN,
            TokenKind::BlockOpen => symbols::SOON,
            TokenKind::BlockClose => symbols::END,
            TokenKind::Stop => symbols::STOP,
            TokenKind::If => symbols::THINKING,
            TokenKind::ElseIf => symbols::MONOCLE,
            TokenKind::Else => symbols::FROWNING,
            TokenKind::Print => symbols::LOUDSPEAKER,
            TokenKind::Declare => symbols::TAG,
            TokenKind::For => symbols::RECYCLE,
            TokenKind::In => symbols::CYCLONE,
            TokenKind::To => symbols::CURL,
            TokenKind::While => symbols::REPEAT,
            TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::Identifier(_)
            | TokenKind::Eof => return None,
        };
        Some(symbol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(text) => write!(f, "number {}", text),
            TokenKind::String(text) => write!(f, "string {}{}{}", symbols::SPEECH, text, symbols::SPEECH),
            TokenKind::Identifier(name) => write!(f, "identifier {}", name),
            TokenKind::Eof => write!(f, "end of input"),
            other => match other.symbol() {
                Some(symbol) => write!(f, "{}", symbol),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let source = "📢1️⃣⛔️";
        let span = Span::new(0, "📢".len());
        assert_eq!(span.slice(source), "📢");
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_literal_starters() {
        assert!(TokenKind::Number("1".into()).starts_literal());
        assert!(TokenKind::Identifier("x".into()).starts_literal());
        assert!(TokenKind::Null.starts_literal());
        assert!(!TokenKind::Plus.starts_literal());
        assert!(!TokenKind::LeftParen.starts_literal());
    }

    #[test]
    fn test_display_uses_symbols() {
        assert_eq!(TokenKind::Stop.to_string(), "⛔️");
        assert_eq!(TokenKind::GreaterThanEqual.to_string(), "👈⚖️");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
