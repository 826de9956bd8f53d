// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Interactive REPL (Read-Eval-Print Loop) for emojin.
//!
//! One REPL session is one interpreter run: a variable declared on one
//! line stays declared on the next until `.reset`.

use emojin_engine::lexer::{TokenKind, symbols, tokenize};
use emojin_engine::{Engine, StdOutput, Value};
use owo_colors::OwoColorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Config as EditorConfig, Editor, Helper};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// REPL configuration constants
const HISTORY_FILE: &str = ".emojin_history";

/// Keyword symbols with the ASCII names Tab completes them from.
const KEYWORDS: &[(&str, &str)] = &[
    ("print", symbols::LOUDSPEAKER),
    ("declare", symbols::TAG),
    ("assign", symbols::FINGER),
    ("stop", symbols::STOP),
    ("if", symbols::THINKING),
    ("elif", symbols::MONOCLE),
    ("else", symbols::FROWNING),
    ("for", symbols::RECYCLE),
    ("in", symbols::CYCLONE),
    ("to", symbols::CURL),
    ("while", symbols::REPEAT),
    ("open", symbols::SOON),
    ("close", symbols::END),
    ("true", symbols::CHECK),
    ("false", symbols::CROSS),
    ("null", symbols::DOTTED_FACE),
    ("string", symbols::SPEECH),
    ("comment", symbols::SIGN),
    ("plus", symbols::PLUS),
    ("minus", symbols::MINUS),
    ("times", symbols::TIMES),
    ("divide", symbols::DIVIDE),
    ("mod", symbols::BUCKET),
    ("and", symbols::HUGGING),
    ("or", symbols::DIZZY),
    ("eq", symbols::BALANCE),
    ("lt", symbols::RIGHT_HAND),
    ("le", symbols::LESS_EQUAL),
    ("gt", symbols::LEFT_HAND),
    ("ge", symbols::GREATER_EQUAL),
    ("zero", symbols::DIGITS[0]),
    ("one", symbols::DIGITS[1]),
    ("two", symbols::DIGITS[2]),
    ("three", symbols::DIGITS[3]),
    ("four", symbols::DIGITS[4]),
    ("five", symbols::DIGITS[5]),
    ("six", symbols::DIGITS[6]),
    ("seven", symbols::DIGITS[7]),
    ("eight", symbols::DIGITS[8]),
    ("nine", symbols::DIGITS[9]),
];

/// REPL commands that can be executed with a dot prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Exit,
    Clear,
    Version,
    Load,
    Compile,
    Reset,
    Vars,
}

impl ReplCommand {
    /// Parse a REPL command from input string
    pub fn parse(input: &str) -> Option<(Self, Option<&str>)> {
        let input = input.trim();
        let rest = input.strip_prefix('.')?;

        let parts: Vec<&str> = rest.splitn(2, char::is_whitespace).collect();
        let cmd = parts.first()?.to_lowercase();
        let arg = parts.get(1).map(|a| a.trim()).filter(|a| !a.is_empty());

        match cmd.as_str() {
            "help" | "h" | "?" => Some((ReplCommand::Help, arg)),
            "exit" | "quit" | "q" => Some((ReplCommand::Exit, arg)),
            "clear" | "cls" => Some((ReplCommand::Clear, arg)),
            "version" | "v" => Some((ReplCommand::Version, arg)),
            "load" | "l" => Some((ReplCommand::Load, arg)),
            "compile" | "c" => Some((ReplCommand::Compile, arg)),
            "reset" => Some((ReplCommand::Reset, arg)),
            "vars" => Some((ReplCommand::Vars, arg)),
            _ => None,
        }
    }

    /// Get all available commands for help/completion
    pub fn all_commands() -> &'static [(&'static str, &'static str)] {
        &[
            (".help", "Show this help message"),
            (".exit", "Exit the REPL"),
            (".clear", "Clear the screen"),
            (".version", "Show version information"),
            (".load <file>", "Run a file in this session"),
            (".compile <file>", "Compile a file to a class file"),
            (".reset", "Forget every declared variable"),
            (".vars", "List declared variables"),
        ]
    }
}

/// Helper struct for rustyline that provides completion, highlighting and validation
#[derive(Default)]
struct EmojinHelper;

/// Byte offset where the ASCII word ending at `pos` starts.
fn word_start(line: &str, pos: usize) -> usize {
    line[..pos]
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0)
}

/// Keywords whose name starts with `word`.
fn keyword_matches(word: &str) -> Vec<Pair> {
    if word.is_empty() {
        return Vec::new();
    }

    let word = word.to_ascii_lowercase();
    KEYWORDS
        .iter()
        .filter(|(name, _)| name.starts_with(&word))
        .map(|(name, symbol)| Pair {
            display: format!("{} {}", name, symbol),
            replacement: symbol.to_string(),
        })
        .collect()
}

impl Completer for EmojinHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        if line.trim_start().starts_with('.') {
            return Ok((pos, vec![]));
        }

        let start = word_start(line, pos);
        Ok((start, keyword_matches(&line[start..pos])))
    }
}

impl Hinter for EmojinHelper {
    type Hint = String;
}

impl Highlighter for EmojinHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.trim_start().starts_with('.') {
            return Cow::Owned(line.magenta().to_string());
        }
        Cow::Owned(highlight_source(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

/// Colors each token; text between tokens (whitespace, comments) is dimmed.
fn highlight_source(line: &str) -> String {
    let mut result = String::with_capacity(line.len() * 2);
    let mut last = 0;

    for token in tokenize(line) {
        let gap = &line[last..token.span.start];
        if !gap.is_empty() {
            result.push_str(&gap.dimmed().to_string());
        }

        let text = token.span.slice(line);
        let colored = match token.kind {
            TokenKind::If
            | TokenKind::ElseIf
            | TokenKind::Else
            | TokenKind::For
            | TokenKind::In
            | TokenKind::To
            | TokenKind::While
            | TokenKind::Print
            | TokenKind::Declare => text.magenta().bold().to_string(),
            TokenKind::Number(_) | TokenKind::True | TokenKind::False | TokenKind::Null => {
                text.yellow().to_string()
            }
            TokenKind::String(_) => text.green().to_string(),
            TokenKind::Identifier(_) => text.to_string(),
            TokenKind::BlockOpen
            | TokenKind::BlockClose
            | TokenKind::LeftParen
            | TokenKind::RightParen => text.bright_blue().to_string(),
            TokenKind::Stop => text.dimmed().to_string(),
            TokenKind::Eof => String::new(),
            _ => text.cyan().to_string(),
        };
        result.push_str(&colored);
        last = token.span.end;
    }

    result.push_str(&line[last..]);
    result
}

impl Validator for EmojinHelper {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        // Keep reading while a block or a string is still open
        if !is_balanced(ctx.input()) {
            return Ok(ValidationResult::Incomplete);
        }
        Ok(ValidationResult::Valid(None))
    }
}

/// Check that every 🔜 has its 🔚 and no 💬 string is left open.
///
/// Symbols inside strings and line comments do not count.
fn is_balanced(input: &str) -> bool {
    let open = first_char(symbols::SOON);
    let close = first_char(symbols::END);
    let quote = first_char(symbols::SPEECH);
    let comment = first_char(symbols::SIGN);

    let mut depth = 0usize;
    let mut in_string = false;
    let mut in_comment = false;

    for c in input.chars() {
        if in_comment {
            in_comment = c != '\n';
        } else if in_string {
            in_string = c != quote;
        } else if c == quote {
            in_string = true;
        } else if c == comment {
            in_comment = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            // A stray close is a parse error; let the parser report it.
            if depth == 0 {
                return true;
            }
            depth -= 1;
        }
    }

    depth == 0 && !in_string
}

fn first_char(symbol: &str) -> char {
    symbol.chars().next().unwrap_or_default()
}

impl Helper for EmojinHelper {}

/// The interactive REPL for emojin
pub struct Repl {
    engine: Engine,
    editor: Editor<EmojinHelper, DefaultHistory>,
    history_path: PathBuf,
    output_dir: PathBuf,
    banner: bool,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(config: &Config) -> rustyline::Result<Self> {
        let editor_config = EditorConfig::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .max_history_size(config.repl.history_size)?
            .auto_add_history(true)
            .build();

        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(EmojinHelper));

        // Determine history file path
        let history_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("emojin")
            .join(HISTORY_FILE);

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        // A missing history file is normal on first start
        let _ = editor.load_history(&history_path);

        Ok(Self {
            engine: Engine::with_options(config.compile.options(None)),
            editor,
            history_path,
            output_dir: config.compile.output_dir.clone(),
            banner: config.repl.banner,
        })
    }

    /// Run the REPL main loop
    pub fn run(&mut self) -> rustyline::Result<()> {
        if self.banner {
            self.print_banner();
        }

        loop {
            match self.editor.readline(&self.format_prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();

                    if trimmed.is_empty() {
                        continue;
                    }

                    if let Some((cmd, arg)) = ReplCommand::parse(trimmed) {
                        match self.execute_command(cmd, arg) {
                            CommandResult::Continue => continue,
                            CommandResult::Exit => break,
                        }
                    }

                    self.eval_and_print(trimmed);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "^D".dimmed());
                    break;
                }
                Err(err) => {
                    eprintln!("{}: {:?}", "Error".red().bold(), err);
                    break;
                }
            }
        }

        if let Err(e) = self.editor.save_history(&self.history_path) {
            tracing::warn!(error = %e, path = %self.history_path.display(), "could not save history");
        }

        self.print_goodbye();
        Ok(())
    }

    fn print_banner(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!(
            "  {}  {} {} {}",
            "📢🔖🤔♻️🔁".bold(),
            "emojin".bright_cyan().bold(),
            "v".dimmed(),
            version.bright_yellow()
        );
        println!("  {}", "A programming language written in emoji".dimmed());
        println!();
        println!(
            "  {} {} {} {}",
            "Type".dimmed(),
            ".help".cyan(),
            "for available commands,".dimmed(),
            "Tab to turn a word into its emoji".dimmed()
        );
        println!();
    }

    fn print_goodbye(&self) {
        println!();
        println!("{}", "Goodbye! 👋".bright_cyan());
        println!();
    }

    fn format_prompt(&self) -> String {
        format!("{} ", "emojin>".bright_green().bold())
    }

    fn execute_command(&mut self, cmd: ReplCommand, arg: Option<&str>) -> CommandResult {
        match cmd {
            ReplCommand::Help => self.print_help(),
            ReplCommand::Exit => return CommandResult::Exit,
            ReplCommand::Clear => print!("\x1B[2J\x1B[H"),
            ReplCommand::Version => self.print_version(),
            ReplCommand::Load => match arg {
                Some(path) => self.load_file(Path::new(path)),
                None => missing_argument(".load"),
            },
            ReplCommand::Compile => match arg {
                Some(path) => self.compile_file(Path::new(path)),
                None => missing_argument(".compile"),
            },
            ReplCommand::Reset => {
                self.engine.reset();
                println!("{}", "Session reset".dimmed());
            }
            ReplCommand::Vars => self.print_vars(),
        }
        CommandResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "REPL Commands:".white().bold());
        println!();

        for (cmd, desc) in ReplCommand::all_commands() {
            println!("  {:18} {}", cmd.cyan(), desc.dimmed());
        }

        println!();
        println!("{}", "Keyboard Shortcuts:".white().bold());
        println!();
        println!("  {:18} {}", "Ctrl+C".yellow(), "Cancel current input".dimmed());
        println!("  {:18} {}", "Ctrl+D".yellow(), "Exit REPL".dimmed());
        println!("  {:18} {}", "Tab".yellow(), "Complete a keyword name".dimmed());
        println!("  {:18} {}", "↑/↓".yellow(), "Navigate history".dimmed());
        println!();
        println!("{}", "Keywords:".white().bold());
        println!();
        for row in KEYWORDS.chunks(6) {
            let line: Vec<String> = row
                .iter()
                .map(|(name, symbol)| format!("{} {:8}", symbol, name.dimmed()))
                .collect();
            println!("  {}", line.join(" "));
        }
        println!();
    }

    fn print_version(&self) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!("{}: {}", "emojin".bright_cyan().bold(), version.yellow());
        println!();
    }

    fn print_vars(&self) {
        let mut vars: Vec<(&str, &Value)> = self.engine.interpreter().environment().iter().collect();
        if vars.is_empty() {
            println!("{}", "No variables declared".dimmed());
            return;
        }

        vars.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in vars {
            println!("  {} {} {}", name, symbols::FINGER, format_value(value));
        }
    }

    fn load_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(source) => self.eval_and_print(&source),
            Err(e) => print_error(&format!("{}: {}", path.display(), e)),
        }
    }

    fn compile_file(&mut self, path: &Path) {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => return print_error(&format!("{}: {}", path.display(), e)),
        };

        match self.engine.compile(&source) {
            Ok(bytes) => {
                match crate::write_class_file(&self.output_dir, self.engine.options(), &bytes) {
                    Ok(target) => println!(
                        "{} {} ({} bytes)",
                        "Wrote".green(),
                        target.display().cyan(),
                        bytes.len()
                    ),
                    Err(e) => print_error(&format!("{:#}", e)),
                }
            }
            Err(e) => print_error(&e.to_string()),
        }
    }

    fn eval_and_print(&mut self, input: &str) {
        if let Err(e) = self.engine.eval(input, &mut StdOutput) {
            print_error(&e.to_string());
        }
    }
}

/// Result of executing a REPL command
enum CommandResult {
    Continue,
    Exit,
}

fn missing_argument(command: &str) {
    eprintln!(
        "{}: {} {}",
        "Error".red().bold(),
        command.cyan(),
        "requires a file path".dimmed()
    );
}

/// Format a value for display with syntax coloring
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => symbols::DOTTED_FACE.to_string(),
        Value::Boolean(_) | Value::Number(_) => value.to_string().yellow().to_string(),
        Value::String(s) => format!("{}{}{}", symbols::SPEECH, s, symbols::SPEECH)
            .green()
            .to_string(),
    }
}

/// Print an error line, with its `[kind]` prefix highlighted
fn print_error(message: &str) {
    match message.find(']') {
        Some(end) if message.starts_with('[') => {
            let (kind, rest) = message.split_at(end + 1);
            eprintln!("{}{}", kind.red().bold(), rest);
        }
        _ => eprintln!("{}", message.red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_command_parse() {
        assert!(matches!(
            ReplCommand::parse(".help"),
            Some((ReplCommand::Help, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".exit"),
            Some((ReplCommand::Exit, None))
        ));
        assert!(matches!(
            ReplCommand::parse(".load test.emojin"),
            Some((ReplCommand::Load, Some("test.emojin")))
        ));
        assert!(matches!(
            ReplCommand::parse(".compile  fizz.emojin "),
            Some((ReplCommand::Compile, Some("fizz.emojin")))
        ));
        assert!(matches!(
            ReplCommand::parse(".RESET"),
            Some((ReplCommand::Reset, None))
        ));
        assert!(ReplCommand::parse("📢1️⃣⛔️").is_none());
        assert!(ReplCommand::parse(".unknown").is_none());
    }

    #[test]
    fn test_is_balanced() {
        assert!(is_balanced("📢1️⃣⛔️"));
        assert!(is_balanced("🔁✅🔜📢1️⃣⛔️🔚"));
        assert!(!is_balanced("🔁✅🔜📢1️⃣⛔️"));
        assert!(!is_balanced("🤔✅🔜🔁✅🔜🔚"));
        assert!(!is_balanced("📢💬open string"));
        assert!(is_balanced("📢💬🔜 inside a string💬⛔️"));
        assert!(is_balanced("📢1️⃣⛔️ 🪧 🔜 in a comment"));
        assert!(!is_balanced("🔁✅🔜 🪧 🔚 in a comment\n📢1️⃣⛔️"));
        // Stray closers go to the parser
        assert!(is_balanced("🔚"));
    }

    #[test]
    fn test_word_start() {
        assert_eq!(word_start("pri", 3), 0);
        let line = "📢pri";
        assert_eq!(word_start(line, line.len()), "📢".len());
        let line = "🔖x🫵";
        assert_eq!(word_start(line, line.len()), line.len());
    }

    #[test]
    fn test_keyword_matches() {
        let matches = keyword_matches("pri");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].replacement, symbols::LOUDSPEAKER);

        let names: Vec<String> = keyword_matches("E")
            .into_iter()
            .map(|p| p.display.split(' ').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(names, vec!["elif", "else", "eq", "eight"]);

        assert!(keyword_matches("").is_empty());
        assert!(keyword_matches("zzz").is_empty());
    }

    #[test]
    fn test_keyword_symbols_lex_as_one_token() {
        for (name, symbol) in KEYWORDS.iter().filter(|(_, s)| *s != symbols::SIGN) {
            let tokens = tokenize(symbol);
            assert_eq!(tokens.len(), 2, "{} should be one token", name);
        }
    }

    #[test]
    fn test_highlight_keeps_text() {
        fn strip_ansi(text: &str) -> String {
            let mut out = String::new();
            let mut chars = text.chars();
            while let Some(c) = chars.next() {
                if c == '\x1b' {
                    chars.by_ref().find(|c| *c == 'm');
                } else {
                    out.push(c);
                }
            }
            out
        }

        let line = "🔖❤️🫵1️⃣ ➕ 2️⃣⛔️ 🪧 note";
        let highlighted = highlight_source(line);
        assert_ne!(highlighted, line);
        assert_eq!(strip_ansi(&highlighted), line);
    }
}
