// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! emojin - run, compile and explore programs written in emoji
//!
//! This is the main entry point for the emojin CLI/REPL.
//!
//! ## Features
//!
//! - Tree-walking interpreter for `.emojin` files and inline code
//! - JVM class-file compiler, several files at once on the rayon pool
//! - Interactive REPL with history, completion and multi-line blocks

mod config;
mod repl;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emojin_engine::lexer::{TokenKind, tokenize};
use emojin_engine::{AsyncEngine, CompileOptions, Engine, Output, StdOutput};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// emojin - a programming language written in emoji
#[derive(Parser, Debug)]
#[command(name = "emojin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run inline source instead of a file
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret one or more files
    Run {
        /// Source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compile files to JVM class files
    #[command(alias = "c")]
    Compile {
        /// Source files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory the class files are written to
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Binary name of the generated class (single file only)
        #[arg(long, value_name = "NAME")]
        class_name: Option<String>,

        /// Print the generated instructions of each class
        #[arg(short, long)]
        disassemble: bool,
    },

    /// Print the token stream of a file
    Tokens {
        /// Source file
        file: PathBuf,
    },

    /// Print the syntax tree of a file
    Ast {
        /// Source file
        file: PathBuf,
    },

    /// Start the interactive REPL
    Repl,
}

/// Main entry point - uses tokio runtime for async file execution.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(cli: Cli) -> Result<ExitCode> {
    let config = Config::load()?;

    if let Some(code) = cli.eval {
        return Ok(run_eval(&code));
    }

    match cli.command.unwrap_or(Command::Repl) {
        Command::Run { files } => run_files(&files).await,
        Command::Compile {
            files,
            output,
            class_name,
            disassemble,
        } => compile_files(&config, &files, output, class_name, disassemble),
        Command::Tokens { file } => print_tokens(&file),
        Command::Ast { file } => print_ast(&file),
        Command::Repl => run_repl(&config),
    }
}

/// Start the interactive REPL
fn run_repl(config: &Config) -> Result<ExitCode> {
    let mut repl = repl::Repl::new(config).context("failed to initialize REPL")?;
    repl.run().context("REPL error")?;
    Ok(ExitCode::SUCCESS)
}

/// Interpret inline source, streaming its output.
fn run_eval(code: &str) -> ExitCode {
    let mut failed = false;
    emojin_engine::interpret(
        code,
        |line| println!("{}", line),
        |line| {
            failed = true;
            eprintln!("{}", line.red());
        },
    );
    exit_code(failed)
}

/// Interpret files concurrently; output is printed file by file, in order.
async fn run_files(files: &[PathBuf]) -> Result<ExitCode> {
    let engine = AsyncEngine::new();
    let results = engine.run_files(files).await;
    let mut failed = false;
    let mut out = StdOutput;

    for (path, result) in files.iter().zip(results) {
        let captured = result.with_context(|| format!("failed to run {}", path.display()))?;
        for line in &captured.lines {
            out.write_line(line);
        }
        for line in &captured.errors {
            failed = true;
            out.error_line(&format!("{}: {}", path.display().cyan(), line.red()));
        }
    }

    Ok(exit_code(failed))
}

fn compile_files(
    config: &Config,
    files: &[PathBuf],
    output: Option<PathBuf>,
    class_name: Option<String>,
    disassemble: bool,
) -> Result<ExitCode> {
    if class_name.is_some() && files.len() > 1 {
        anyhow::bail!("--class-name needs exactly one input file");
    }

    let mut jobs = Vec::with_capacity(files.len());
    for path in files {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let options = match (&class_name, files.len()) {
            (Some(name), _) => config.compile.options(Some(name.as_str())),
            (None, 1) => config.compile.options(None),
            (None, _) => CompileOptions::with_class_name(class_name_for(path)),
        };
        jobs.push((options, source));
    }

    let output_dir = output.unwrap_or_else(|| config.compile.output_dir.clone());

    let results = emojin_engine::parallel::compile_each(&jobs);
    let mut failed = false;

    for ((path, (options, source)), result) in files.iter().zip(&jobs).zip(results) {
        match result {
            Ok(bytes) => {
                let target = write_class_file(&output_dir, options, &bytes)?;
                println!(
                    "{} {} -> {} ({} bytes)",
                    "Compiled".green().bold(),
                    path.display(),
                    target.display().cyan(),
                    bytes.len()
                );
                if disassemble {
                    print_disassembly(options, source);
                }
            }
            Err(e) => {
                failed = true;
                eprintln!("{}: {}", path.display().cyan(), e.red());
            }
        }
    }

    Ok(exit_code(failed))
}

/// Writes a class below `root` at its package path, creating directories
/// as needed, and returns the file written.
pub(crate) fn write_class_file(
    root: &Path,
    options: &CompileOptions,
    bytes: &[u8],
) -> Result<PathBuf> {
    let target = root.join(options.class_file_path());
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&target, bytes)
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}

fn print_disassembly(options: &CompileOptions, source: &str) {
    match Engine::with_options(options.clone()).disassemble(source) {
        Ok(listing) => {
            println!("{}", options.class_name.bright_cyan().bold());
            print!("{}", listing);
        }
        Err(e) => eprintln!("{}", e.red()),
    }
}

fn print_tokens(path: &Path) -> Result<ExitCode> {
    let source = read_source(path)?;

    for token in tokenize(&source) {
        let text = token.span.slice(&source);
        match &token.kind {
            TokenKind::Eof => println!("{:>4}:{:<4} {}", token.line, token.column, "EOF".dimmed()),
            kind => println!(
                "{:>4}:{:<4} {:<14} {}",
                token.line,
                token.column,
                format!("{:?}", kind).yellow(),
                text
            ),
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_ast(path: &Path) -> Result<ExitCode> {
    let source = read_source(path)?;

    match emojin_engine::parse(&source) {
        Ok(program) => {
            for statement in &program {
                println!("{:#?}", statement);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.red());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// A class name derived from a file stem: `fizz-buzz.emojin` becomes `Fizz_buzz`.
fn class_name_for(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

    let mut name: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    match name.chars().next() {
        None => return emojin_engine::compiler::DEFAULT_CLASS_NAME.to_string(),
        Some(c) if c.is_ascii_digit() => name.insert(0, '_'),
        Some(c) => name.replace_range(..1, &c.to_ascii_uppercase().to_string()),
    }
    name
}
