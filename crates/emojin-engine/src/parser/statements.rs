//! Statement parsing utilities and documentation.
//!
//! This module documents the statement parsing logic found in `parser.rs`.
//! The leading token selects the statement; anything else is an
//! expression statement.
//!
//! ## Statement Types
//!
//! | Statement | Leading token | Method |
//! |-----------|---------------|--------|
//! | Print | `📢` | `parse_print_statement` |
//! | Declaration | `🔖` | `parse_variable_declaration` |
//! | If | `🤔` | `parse_if_statement` |
//! | For | `♻️` | `parse_for_statement` |
//! | While | `🔁` | `parse_while_statement` |
//! | Expression | anything else | `parse_expression_statement` |
//!
//! ## Grammar Overview
//!
//! ```text
//! Statement :
//!     📢 Expression ⛔️
//!     🔖 Identifier ⛔️
//!     🔖 Identifier 🫵 Expression ⛔️
//!     🤔 Expression Block ( 🧐 Expression Block )* ( ☹️ Block )?
//!     ♻️ Identifier 🌀 Expression ➰ Expression Block
//!     🔁 Expression Block
//!     Expression ⛔️
//!
//! Block :
//!     🔜 Statement* 🔚
//! ```
//!
//! ## Errors
//!
//! Parsing stops at the first error. The error names the construct being
//! parsed (`print statement`, `for statement`, ...) and the position of the
//! offending token. A block that reaches the end of input before its `🔚`
//! is an error for the whole program.

// This module serves as documentation. The actual implementation is in parser.rs.

#[cfg(test)]
mod tests {
    use crate::ast::Statement;
    use crate::parser::parse;
    use crate::lexer::tokenize;

    fn parse_ok(src: &str) -> Vec<Statement> {
        parse(tokenize(src)).expect("Should parse")
    }

    #[test]
    fn test_statement_dispatch() {
        let program = parse_ok(
            "🔖a🫵1️⃣⛔️
📢a⛔️
a🫵2️⃣⛔️
🤔a🔜🔚
♻️i🌀0️⃣➰1️⃣🔜🔚
🔁❌🔜🔚",
        );
        assert!(matches!(program[0], Statement::Declaration(_)));
        assert!(matches!(program[1], Statement::Print(_)));
        assert!(matches!(program[2], Statement::Expression(_)));
        assert!(matches!(program[3], Statement::If(_)));
        assert!(matches!(program[4], Statement::For(_)));
        assert!(matches!(program[5], Statement::While(_)));
    }

    #[test]
    fn test_nested_blocks() {
        let program = parse_ok("♻️i🌀0️⃣➰3️⃣🔜🤔i⚖️1️⃣🔜📢i⛔️🔚🔚");
        let Statement::For(for_stmt) = &program[0] else {
            panic!("expected for");
        };
        assert!(matches!(for_stmt.body[0], Statement::If(_)));
    }

    #[test]
    fn test_else_without_if_is_an_error() {
        assert!(parse(tokenize("☹️🔜🔚")).is_err());
    }

    #[test]
    fn test_declaration_requires_stop() {
        let err = parse(tokenize("🔖a🫵1️⃣")).unwrap_err();
        assert_eq!(err.construct, "declaration");
    }
}
