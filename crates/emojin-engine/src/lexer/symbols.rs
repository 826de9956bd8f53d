//! The emojin symbol table.
//!
//! Every reserved symbol is exactly one grapheme cluster. Several of them
//! carry a variation selector (`U+FE0F`) or a combining keycap (`U+20E3`),
//! so they are spelled with explicit escapes here; a visually identical
//! symbol without the selector is a different grapheme and lexes as an
//! identifier.
//!
//! | Symbol | Meaning | Symbol | Meaning |
//! |--------|---------|--------|---------|
//! | `0️⃣`…`9️⃣` | digits | `.` | decimal point |
//! | `➕` | add | `➖` | subtract / negate |
//! | `✖️` | multiply | `➗` | divide |
//! | `🪣` | modulo | `💫` | logical or |
//! | `🫂` | logical and | `⚖️` | equality |
//! | `👉` | less than | `👈` | greater than |
//! | `⚖️👉` | less or equal | `👈⚖️` | greater or equal |
//! | `(` `)` | grouping | `💬` | string delimiter |
//! | `🪧` | line comment | `🔜` `🔚` | block open / close |
//! | `✅` `❌` | true / false | `🫥` | null |
//! | `🤔` `🧐` `☹️` | if / else-if / else | `📢` | print |
//! | `♻️` `🌀` `➰` | for / in / to | `🔁` | while |
//! | `🔖` | declare | `🫵` | assign |
//! | `⛔️` | statement stop | | |

use super::TokenKind;

/// Keycap digits `0️⃣` through `9️⃣`, indexed by value.
pub const DIGITS: [&str; 10] = [
    "0\u{FE0F}\u{20E3}",
    "1\u{FE0F}\u{20E3}",
    "2\u{FE0F}\u{20E3}",
    "3\u{FE0F}\u{20E3}",
    "4\u{FE0F}\u{20E3}",
    "5\u{FE0F}\u{20E3}",
    "6\u{FE0F}\u{20E3}",
    "7\u{FE0F}\u{20E3}",
    "8\u{FE0F}\u{20E3}",
    "9\u{FE0F}\u{20E3}",
];

/// Decimal point `.`
pub const DOT: &str = ".";
/// `➕` add
pub const PLUS: &str = "\u{2795}";
/// `➖` subtract or negate
pub const MINUS: &str = "\u{2796}";
/// `✖️` multiply
pub const TIMES: &str = "\u{2716}\u{FE0F}";
/// `➗` divide
pub const DIVIDE: &str = "\u{2797}";
/// `🪣` modulo
pub const BUCKET: &str = "\u{1FAA3}";
/// `💫` logical or
pub const DIZZY: &str = "\u{1F4AB}";
/// `🫂` logical and
pub const HUGGING: &str = "\u{1FAC2}";
/// `⚖️` equality
pub const BALANCE: &str = "\u{2696}\u{FE0F}";
/// Opening parenthesis
pub const LEFT_PAREN: &str = "(";
/// Closing parenthesis
pub const RIGHT_PAREN: &str = ")";
/// `💬` string delimiter
pub const SPEECH: &str = "\u{1F4AC}";
/// `🪧` line comment
pub const SIGN: &str = "\u{1FAA7}";
/// `🔜` block open
pub const SOON: &str = "\u{1F51C}";
/// `🔚` block close
pub const END: &str = "\u{1F51A}";
/// `✅` true
pub const CHECK: &str = "\u{2705}";
/// `❌` false
pub const CROSS: &str = "\u{274C}";
/// `🫥` null
pub const DOTTED_FACE: &str = "\u{1FAE5}";
/// `🤔` if
pub const THINKING: &str = "\u{1F914}";
/// `🧐` else-if
pub const MONOCLE: &str = "\u{1F9D0}";
/// `☹️` else
pub const FROWNING: &str = "\u{2639}\u{FE0F}";
/// `📢` print
pub const LOUDSPEAKER: &str = "\u{1F4E2}";
/// `♻️` for
pub const RECYCLE: &str = "\u{267B}\u{FE0F}";
/// `➰` range end
pub const CURL: &str = "\u{27B0}";
/// `🌀` loop membership
pub const CYCLONE: &str = "\u{1F300}";
/// `🔁` while
pub const REPEAT: &str = "\u{1F501}";
/// `👈` greater than
pub const LEFT_HAND: &str = "\u{1F448}";
/// `👉` less than
pub const RIGHT_HAND: &str = "\u{1F449}";
/// `🔖` declare
pub const TAG: &str = "\u{1F516}";
/// `🫵` assign
pub const FINGER: &str = "\u{1FAF5}";
/// `⛔️` statement stop
pub const STOP: &str = "\u{26D4}\u{FE0F}";

/// `⚖️👉`
pub const LESS_EQUAL: &str = "\u{2696}\u{FE0F}\u{1F449}";
/// `👈⚖️`
pub const GREATER_EQUAL: &str = "\u{1F448}\u{2696}\u{FE0F}";

/// Symbols that are never part of an identifier.
const RESERVED: &[&str] = &[
    DOT, PLUS, MINUS, TIMES, DIVIDE, BUCKET, DIZZY, HUGGING, BALANCE, LEFT_PAREN, RIGHT_PAREN,
    SPEECH, SIGN, SOON, END, CHECK, CROSS, DOTTED_FACE, THINKING, MONOCLE, FROWNING, LOUDSPEAKER,
    RECYCLE, CURL, CYCLONE, REPEAT, LEFT_HAND, RIGHT_HAND, TAG, FINGER, STOP,
];

/// Looks up a grapheme in the single-symbol table.
///
/// `⚖️` and `👈` are returned as their one-grapheme meaning; the scanner
/// handles the two-grapheme combinations itself.
pub fn single(grapheme: &str) -> Option<TokenKind> {
    let kind = match grapheme {
        PLUS => TokenKind::Plus,
        MINUS => TokenKind::Minus,
        TIMES => TokenKind::Star,
        DIVIDE => TokenKind::Slash,
        BUCKET => TokenKind::Percent,
        DIZZY => TokenKind::Or,
        HUGGING => TokenKind::And,
        BALANCE => TokenKind::Equal,
        LEFT_PAREN => TokenKind::LeftParen,
        RIGHT_PAREN => TokenKind::RightParen,
        LEFT_HAND => TokenKind::GreaterThan,
        RIGHT_HAND => TokenKind::LessThan,
        STOP => TokenKind::Stop,
        SOON => TokenKind::BlockOpen,
        END => TokenKind::BlockClose,
        CHECK => TokenKind::True,
        CROSS => TokenKind::False,
        DOTTED_FACE => TokenKind::Null,
        THINKING => TokenKind::If,
        MONOCLE => TokenKind::ElseIf,
        FROWNING => TokenKind::Else,
        LOUDSPEAKER => TokenKind::Print,
        TAG => TokenKind::Declare,
        FINGER => TokenKind::Assign,
        RECYCLE => TokenKind::For,
        CURL => TokenKind::To,
        CYCLONE => TokenKind::In,
        REPEAT => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

/// Returns the ASCII digit for a keycap digit grapheme.
pub fn digit(grapheme: &str) -> Option<char> {
    DIGITS
        .iter()
        .position(|d| *d == grapheme)
        .and_then(|value| char::from_digit(value as u32, 10))
}

/// Returns true for graphemes that terminate an identifier.
pub fn is_reserved(grapheme: &str) -> bool {
    RESERVED.contains(&grapheme) || digit(grapheme).is_some()
}

/// Returns true if the grapheme is entirely whitespace (`\r\n` included).
pub fn is_whitespace(grapheme: &str) -> bool {
    !grapheme.is_empty() && grapheme.chars().all(char::is_whitespace)
}

/// Returns true if the grapheme ends a line.
pub fn is_newline(grapheme: &str) -> bool {
    grapheme.contains('\n')
}
