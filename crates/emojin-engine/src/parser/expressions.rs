//! Expression parsing utilities and documentation.
//!
//! This module documents the expression parsing logic found in `parser.rs`.
//! Expression parsing uses recursive descent with operator precedence.
//!
//! ## Precedence Table (lowest to highest)
//!
//! | Precedence | Operators | Method |
//! |------------|-----------|--------|
//! | 1 | `🫵` (right-binding) | `parse_expression` |
//! | 2 | `💫` | `parse_or` |
//! | 3 | `🫂` | `parse_and` |
//! | 4 | `⚖️` | `parse_equality` |
//! | 5 | `👉` `⚖️👉` `👈` `👈⚖️` | `parse_relational` |
//! | 6 | `➕` `➖` | `parse_additive` |
//! | 7 | `✖️` `➗` `🪣` | `parse_multiplicative` |
//! | 8 | `➖` (prefix) | `parse_unary` |
//! | 9 | primary | `parse_primary` |
//!
//! Every binary level is left-associative.
//!
//! ## Assignment
//!
//! Assignment is not a level of the ladder. `parse_expression` looks one
//! token ahead: an identifier followed by `🫵` is an assignment whose value
//! is a whole expression, so `a🫵b🫵1️⃣` assigns right to left.
//!
//! ## Primary Expressions
//!
//! - Numbers: `4️⃣2️⃣`, `3️⃣.1️⃣`
//! - Strings: `💬hello💬`
//! - Booleans and null: `✅` `❌` `🫥`
//! - Identifiers: any run of non-reserved graphemes
//! - Parenthesized: `(1️⃣➕2️⃣)`
//!
//! A primary immediately followed by another literal-starting token is a
//! "stray literal" error, which catches a forgotten operator.
//!
//! ## Grammar
//!
//! ```text
//! Expression     : Identifier 🫵 Expression | Or
//! Or             : And ( 💫 And )*
//! And            : Equality ( 🫂 Equality )*
//! Equality       : Relational ( ⚖️ Relational )*
//! Relational     : Additive ( ( 👉 | ⚖️👉 | 👈 | 👈⚖️ ) Additive )*
//! Additive       : Multiplicative ( ( ➕ | ➖ ) Multiplicative )*
//! Multiplicative : Unary ( ( ✖️ | ➗ | 🪣 ) Unary )*
//! Unary          : ➖ Unary | Primary
//! Primary        : Number | String | ✅ | ❌ | 🫥 | Identifier | ( Expression )
//! ```

// This module serves as documentation. The actual implementation is in parser.rs.

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOperator, Expression, Literal, Statement};
    use crate::lexer::tokenize;
    use crate::parser::Parser;

    fn parse_expr(src: &str) -> Expression {
        let source = format!("📢{}⛔️", src);
        let mut parser = Parser::new(tokenize(&source));
        match parser.parse_program().expect("Should parse").remove(0) {
            Statement::Print(print) => print.argument,
            other => panic!("expected print, got {:?}", other),
        }
    }

    fn operator(expr: &Expression) -> Option<BinaryOperator> {
        match expr {
            Expression::Binary(binary) => Some(binary.operator),
            _ => None,
        }
    }

    #[test]
    fn test_parse_number() {
        let expr = parse_expr("4️⃣2️⃣");
        assert!(matches!(expr, Expression::Literal(ref l) if l.value == Literal::Number(42.0)));
    }

    #[test]
    fn test_parse_string() {
        let expr = parse_expr("💬hello💬");
        assert!(matches!(expr, Expression::Literal(ref l) if l.value == Literal::String("hello".into())));
    }

    #[test]
    fn test_parse_boolean() {
        let expr = parse_expr("✅");
        assert!(matches!(expr, Expression::Literal(ref l) if l.value == Literal::Boolean(true)));
        let expr = parse_expr("❌");
        assert!(matches!(expr, Expression::Literal(ref l) if l.value == Literal::Boolean(false)));
    }

    #[test]
    fn test_parse_null() {
        let expr = parse_expr("🫥");
        assert!(matches!(expr, Expression::Literal(ref l) if l.value == Literal::Null));
    }

    #[test]
    fn test_parse_identifier() {
        let expr = parse_expr("❤️");
        assert!(matches!(expr, Expression::Identifier(ref id) if id.name == "❤️"));
    }

    #[test]
    fn test_parse_comparisons() {
        assert_eq!(operator(&parse_expr("1️⃣👉2️⃣")), Some(BinaryOperator::LessThan));
        assert_eq!(operator(&parse_expr("1️⃣⚖️👉2️⃣")), Some(BinaryOperator::LessThanEqual));
        assert_eq!(operator(&parse_expr("1️⃣👈2️⃣")), Some(BinaryOperator::GreaterThan));
        assert_eq!(operator(&parse_expr("1️⃣👈⚖️2️⃣")), Some(BinaryOperator::GreaterThanEqual));
    }

    #[test]
    fn test_parse_precedence() {
        // 1 ➕ 2 ⚖️ 3  =>  (1 ➕ 2) ⚖️ 3
        let expr = parse_expr("1️⃣➕2️⃣⚖️3️⃣");
        assert_eq!(operator(&expr), Some(BinaryOperator::Equal));
    }

    #[test]
    fn test_parse_modulo() {
        let expr = parse_expr("❤️🪣2️⃣⚖️0️⃣");
        let Expression::Binary(eq) = expr else {
            panic!("expected binary");
        };
        assert_eq!(operator(&eq.left), Some(BinaryOperator::Modulo));
    }
}
