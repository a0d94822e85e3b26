#![doc = include_str!("../README.md")]

use clap::{value_parser, ArgAction, Args};

/// Verbosity flags. `-v` and `-vv` log more, `-q` and `-qq` log less.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LoggingArgs {
    /// Log more, repeat for even more
    #[clap(
        short = 'v',
        long = "verbose",
        value_parser = value_parser!(u8).range(0..=2),
        action = ArgAction::Count,
        conflicts_with = "quiet"
    )]
    verbose: u8,
    /// Log less, repeat to silence logging
    #[clap(
        short = 'q',
        long = "quiet",
        value_parser = value_parser!(u8).range(0..=2),
        action = ArgAction::Count,
        conflicts_with = "verbose"
    )]
    quiet: u8,
}

impl LoggingArgs {
    /// How far from the default level the flags move logging, from `-2` to `2`
    pub fn verbosity(&self) -> i8 {
        (self.verbose.min(2) as i8) - (self.quiet.min(2) as i8)
    }

    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used. Without either
    /// only warnings and errors are logged, leaving the output to the tool itself.
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self.verbosity() {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use test_log::test;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        logging: LoggingArgs,
    }

    fn verbosity(args: &[&str]) -> i8 {
        Cli::try_parse_from(args)
            .expect("could not parse test args")
            .logging
            .verbosity()
    }

    #[test]
    fn test_verbosity_counts() {
        assert_eq!(verbosity(&["federc"]), 0);
        assert_eq!(verbosity(&["federc", "-v"]), 1);
        assert_eq!(verbosity(&["federc", "-vv"]), 2);
        assert_eq!(verbosity(&["federc", "-q"]), -1);
        assert_eq!(verbosity(&["federc", "--quiet", "--quiet"]), -2);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["federc", "-v", "-q"]).is_err());
    }
}
