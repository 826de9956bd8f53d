//! The scanner that produces tokens from source text.

use std::iter::Peekable;

use unicode_segmentation::{GraphemeIndices, UnicodeSegmentation};

use super::symbols;
use super::{Span, Token, TokenKind};

/// A scanner that tokenizes emojin source code one grapheme cluster at a time.
pub struct Scanner<'a> {
    source: &'a str,
    graphemes: Peekable<GraphemeIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            graphemes: source.grapheme_indices(true).peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Returns the source this scanner reads from.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the next token from the source.
    ///
    /// Once the input is exhausted this keeps returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.current_pos;
        let (line, column) = (self.line, self.column);

        let Some((_, grapheme)) = self.advance() else {
            return Token::eof(start, line, column);
        };

        let kind = match grapheme {
            symbols::BALANCE => self.scan_balance(),
            symbols::LEFT_HAND => self.scan_left_hand(),
            symbols::SPEECH => self.scan_string(),
            g if symbols::digit(g).is_some() => self.scan_number(g),
            g => match symbols::single(g) {
                Some(kind) => kind,
                None => self.scan_identifier(g),
            },
        };

        Token::new(kind, Span::new(start, self.current_pos), line, column)
    }

    fn advance(&mut self) -> Option<(usize, &'a str)> {
        let result = self.graphemes.next();
        if let Some((pos, grapheme)) = result {
            self.current_pos = pos + grapheme.len();
            if symbols::is_newline(grapheme) {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.graphemes.peek().map(|(_, g)| *g)
    }

    /// Skips whitespace, line comments and stray decimal points.
    fn skip_trivia(&mut self) {
        while let Some(grapheme) = self.peek() {
            if symbols::is_whitespace(grapheme) || grapheme == symbols::DOT {
                self.advance();
            } else if grapheme == symbols::SIGN {
                // Line comment: runs through the end of the line
                while let Some((_, g)) = self.advance() {
                    if symbols::is_newline(g) {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn scan_balance(&mut self) -> TokenKind {
        if self.peek() == Some(symbols::RIGHT_HAND) {
            self.advance();
            TokenKind::LessThanEqual
        } else {
            TokenKind::Equal
        }
    }

    fn scan_left_hand(&mut self) -> TokenKind {
        if self.peek() == Some(symbols::BALANCE) {
            self.advance();
            TokenKind::GreaterThanEqual
        } else {
            TokenKind::GreaterThan
        }
    }

    fn scan_number(&mut self, first: &str) -> TokenKind {
        let mut value = String::new();
        value.extend(symbols::digit(first));

        while let Some(grapheme) = self.peek() {
            if let Some(digit) = symbols::digit(grapheme) {
                value.push(digit);
            } else if grapheme == symbols::DOT {
                value.push('.');
            } else {
                break;
            }
            self.advance();
        }

        TokenKind::Number(value)
    }

    fn scan_string(&mut self) -> TokenKind {
        let start = self.current_pos;
        let mut end = start;

        // Unterminated strings silently run to the end of input.
        while let Some((pos, grapheme)) = self.advance() {
            if grapheme == symbols::SPEECH {
                break;
            }
            end = pos + grapheme.len();
        }

        TokenKind::String(self.source[start..end].to_string())
    }

    fn scan_identifier(&mut self, first: &str) -> TokenKind {
        let mut name = String::from(first);

        while let Some(grapheme) = self.peek() {
            if symbols::is_reserved(grapheme) || symbols::is_whitespace(grapheme) {
                break;
            }
            name.push_str(grapheme);
            self.advance();
        }

        TokenKind::Identifier(name)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

/// Tokenizes `source`; the last token is always [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens: Vec<Token> = Scanner::new(source).collect();
    tracing::trace!(count = tokens.len(), "tokenized source");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut scanner = Scanner::new("📢➕➖✖️➗🪣⛔️");
        assert!(matches!(scanner.next_token().kind, TokenKind::Print));
        assert!(matches!(scanner.next_token().kind, TokenKind::Plus));
        assert!(matches!(scanner.next_token().kind, TokenKind::Minus));
        assert!(matches!(scanner.next_token().kind, TokenKind::Star));
        assert!(matches!(scanner.next_token().kind, TokenKind::Slash));
        assert!(matches!(scanner.next_token().kind, TokenKind::Percent));
        assert!(matches!(scanner.next_token().kind, TokenKind::Stop));
        assert!(matches!(scanner.next_token().kind, TokenKind::Eof));
        assert!(matches!(scanner.next_token().kind, TokenKind::Eof));
    }

    #[test]
    fn test_numbers() {
        let mut scanner = Scanner::new("4️⃣2️⃣ 3️⃣.1️⃣4️⃣ 1️⃣.2️⃣.3️⃣");
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == "42"));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == "3.14"));
        assert!(matches!(scanner.next_token().kind, TokenKind::Number(n) if n == "1.2.3"));
    }

    #[test]
    fn test_stray_dot_is_skipped() {
        assert_eq!(
            kinds(". 5️⃣"),
            vec![TokenKind::Number("5".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_strings_are_verbatim() {
        let mut scanner = Scanner::new("💬こんにちは 🔚➕💬💬💬");
        assert!(matches!(scanner.next_token().kind, TokenKind::String(s) if s == "こんにちは 🔚➕"));
        assert!(matches!(scanner.next_token().kind, TokenKind::String(s) if s.is_empty()));
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            kinds("💬abc ⛔️"),
            vec![TokenKind::String("abc ⛔️".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_comparison_combinations() {
        assert_eq!(
            kinds("⚖️👉 👈⚖️ ⚖️ 👈 👉"),
            vec![
                TokenKind::LessThanEqual,
                TokenKind::GreaterThanEqual,
                TokenKind::Equal,
                TokenKind::GreaterThan,
                TokenKind::LessThan,
                TokenKind::Eof,
            ]
        );
        // Only the documented pairings combine.
        assert_eq!(
            kinds("👉⚖️"),
            vec![TokenKind::LessThan, TokenKind::Equal, TokenKind::Eof]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            kinds("❤️🫵カウンター⛔️"),
            vec![
                TokenKind::Identifier("❤️".into()),
                TokenKind::Assign,
                TokenKind::Identifier("カウンター".into()),
                TokenKind::Stop,
                TokenKind::Eof,
            ]
        );
        // Digits and stops end an identifier.
        assert_eq!(
            kinds("ab1️⃣"),
            vec![
                TokenKind::Identifier("ab".into()),
                TokenKind::Number("1".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("🪧 a comment ➕ 1️⃣\n📢");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].kind, TokenKind::Print));
        assert_eq!((tokens[0].line, tokens[0].column), (2, 1));
    }

    #[test]
    fn test_positions_count_graphemes() {
        let tokens = tokenize("🔖❤️🫵1️⃣2️⃣⛔️\n  📢❤️⛔️");
        let positions: Vec<_> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 1), (1, 2), (1, 3), (1, 4), (1, 6), (2, 3), (2, 4), (2, 5), (2, 6)]
        );
    }

    #[test]
    fn test_crlf_is_one_newline() {
        let tokens = tokenize("📢\r\n📢");
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn test_relexing_a_span_reproduces_the_token() {
        let source = "🤔❤️🪣2️⃣⚖️0️⃣🔜📢💬偶数💬⛔️🔚☹️🔜📢👈⚖️1️⃣.5️⃣⛔️🔚";
        for token in tokenize(source) {
            if token.kind == TokenKind::Eof {
                continue;
            }
            let relexed = tokenize(token.span.slice(source));
            assert_eq!(relexed.len(), 2, "{:?}", token);
            assert_eq!(relexed[0].kind, token.kind);
        }
    }

    #[test]
    fn test_iterator_ends_with_eof() {
        let collected: Vec<_> = Scanner::new("✅").collect();
        assert_eq!(collected.len(), 2);
        assert!(matches!(collected[1].kind, TokenKind::Eof));
    }
}
