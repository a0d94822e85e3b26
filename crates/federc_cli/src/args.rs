//! the args for running federc

use crate::sink::EchoSink;
use eyre::WrapErr;
use feder_cli_common::LoggingArgs;
use feder_parsing::lexer::Lexer;
use feder_tokens::diagnostic::Silent;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Runs the feder lexer and parser over a source")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    pub mode: Mode,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// What to do with the source
#[derive(Debug, clap::Subcommand)]
pub enum Mode {
    /// Print the name of every token, one per line
    Tokens(InputArgs),
    /// Parse exactly one expression and print its rendering
    Expr(InputArgs),
    /// Parse a complete program and print its rendering
    Program(InputArgs),
}

impl Mode {
    pub fn input(&self) -> &InputArgs {
        match self {
            Mode::Tokens(input) | Mode::Expr(input) | Mode::Program(input) => input,
        }
    }
}

/// Where the source comes from
#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// The source file to read. Standard input is read if neither this nor `--input` is given
    #[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// Use this text as the source
    #[clap(short = 'e', long = "input", value_name = "TEXT", conflicts_with = "file")]
    pub input: Option<String>,
    /// The source name used in diagnostics
    #[clap(long, env = "FEDERC_SOURCE_NAME")]
    pub name: Option<String>,
    /// Don't render diagnostics to stderr
    #[clap(long)]
    pub no_echo: bool,
}

impl InputArgs {
    /// The name diagnostics refer to the source by
    pub fn source_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.input, &self.file) {
            (Some(_), _) => "<arg>".to_string(),
            (None, Some(file)) => file.display().to_string(),
            (None, None) => "<stdin>".to_string(),
        }
    }

    /// Creates a lexer over the selected source
    pub fn lexer(&self) -> eyre::Result<Lexer> {
        let name = self.source_name();
        let lexer = match (&self.input, &self.file) {
            (Some(text), _) => Lexer::from_text(name, text),
            (None, Some(path)) => {
                let file = File::open(path)
                    .wrap_err_with(|| format!("could not open {}", path.display()))?;
                Lexer::new(name, file)?
            }
            (None, None) => Lexer::new(name, io::stdin().lock())?,
        };
        if self.no_echo {
            Ok(lexer.with_sink(Silent))
        } else {
            Ok(lexer.with_sink(EchoSink))
        }
    }
}
