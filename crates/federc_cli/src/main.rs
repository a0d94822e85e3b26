use crate::args::{Args, Mode};
use clap::Parser as _;
use feder_parsing::parser::Parser;
use std::io;
use std::process::ExitCode;
use tracing::metadata::LevelFilter;
use tracing::{debug, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

mod args;
mod driver;
mod sink;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting federc with args: {args:?}");
    debug!("federc version: {}", env!("CARGO_PKG_VERSION"));

    let lexer = args.mode.input().lexer()?;
    let mut stdout = io::stdout().lock();
    let succeeded = match &args.mode {
        Mode::Tokens(_) => driver::dump_tokens(lexer, &mut stdout)?,
        Mode::Expr(_) => driver::print_expression(Parser::new(lexer), &mut stdout)?,
        Mode::Program(_) => driver::print_program(Parser::new(lexer), &mut stdout)?,
    };

    if succeeded {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
