//! Operator scanning documentation.
//!
//! This module documents the operator scanning logic in `scanner.rs`.
//! Every operator is a single grapheme except the two comparison pairs,
//! which the scanner recognizes by peeking exactly one grapheme ahead.
//!
//! ## Operator Categories
//!
//! ### Arithmetic Operators
//!
//! | Token | Kind |
//! |-------|------|
//! | `➕` | `Plus` |
//! | `➖` | `Minus` (binary and unary) |
//! | `✖️` | `Star` |
//! | `➗` | `Slash` |
//! | `🪣` | `Percent` |
//!
//! ### Comparison Operators
//!
//! | Token | Method | Variants |
//! |-------|--------|----------|
//! | `⚖️` | `scan_balance` | `⚖️` equal, `⚖️👉` less or equal |
//! | `👈` | `scan_left_hand` | `👈` greater than, `👈⚖️` greater or equal |
//! | `👉` | | less than |
//!
//! ### Logical Operators
//!
//! | Token | Kind |
//! |-------|------|
//! | `🫂` | `And` |
//! | `💫` | `Or` |
//!
//! ## Lookahead Logic
//!
//! ```text
//! // For input "👈⚖️"
//! scan_left_hand():
//!   consume 👈
//!   peek() returns ⚖️  -> it's GreaterThanEqual
//!   advance()
//! ```
//!
//! `👉⚖️` does not combine: it is `LessThan` followed by `Equal`.

// This module serves as documentation. The actual implementation is in scanner.rs.

#[cfg(test)]
mod tests {
    use crate::lexer::{Scanner, TokenKind};

    fn scan_single(src: &str) -> TokenKind {
        let mut scanner = Scanner::new(src);
        scanner.next_token().kind
    }

    #[test]
    fn test_arithmetic_operators() {
        assert!(matches!(scan_single("➕"), TokenKind::Plus));
        assert!(matches!(scan_single("➖"), TokenKind::Minus));
        assert!(matches!(scan_single("✖️"), TokenKind::Star));
        assert!(matches!(scan_single("➗"), TokenKind::Slash));
        assert!(matches!(scan_single("🪣"), TokenKind::Percent));
    }

    #[test]
    fn test_balance_operators() {
        assert!(matches!(scan_single("⚖️"), TokenKind::Equal));
        assert!(matches!(scan_single("⚖️👉"), TokenKind::LessThanEqual));
        assert!(matches!(scan_single("⚖️ 👉"), TokenKind::Equal));
    }

    #[test]
    fn test_hand_operators() {
        assert!(matches!(scan_single("👈"), TokenKind::GreaterThan));
        assert!(matches!(scan_single("👈⚖️"), TokenKind::GreaterThanEqual));
        assert!(matches!(scan_single("👉"), TokenKind::LessThan));
        assert!(matches!(scan_single("👉⚖️"), TokenKind::LessThan));
    }

    #[test]
    fn test_logical_operators() {
        assert!(matches!(scan_single("🫂"), TokenKind::And));
        assert!(matches!(scan_single("💫"), TokenKind::Or));
    }

    #[test]
    fn test_assignment_is_not_equality() {
        assert!(matches!(scan_single("🫵"), TokenKind::Assign));
    }
}
