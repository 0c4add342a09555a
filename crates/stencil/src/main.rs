//! Stencil CLI - static site generator.
//!
//! Provides commands for:
//! - `generate`: Render every source document into a static page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::GenerateArgs;
use error::CliError;
use output::Output;

/// Default log level when neither --log nor `RUST_LOG` is set.
const DEFAULT_LOG_LEVEL: &str = "info";

/// Stencil - static site generator.
#[derive(Parser)]
#[command(name = "stencil", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the site from source documents and templates.
    Generate(GenerateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Generate(args) => init_tracing(args.log.as_deref()).and_then(|()| args.execute()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// Initialize tracing.
///
/// An explicit `--log` level wins; otherwise `RUST_LOG` is used, falling
/// back to [`DEFAULT_LOG_LEVEL`].
fn init_tracing(level: Option<&str>) -> Result<(), CliError> {
    let filter = match level {
        Some(level) => EnvFilter::new(parse_level(level)?.to_string()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Parse a log level name (case-insensitive).
///
/// Accepts tracing's names plus the classic `WARNING`, `CRITICAL`, `FATAL`
/// and `NOTSET`.
fn parse_level(level: &str) -> Result<LevelFilter, CliError> {
    let name = match level.to_ascii_uppercase().as_str() {
        "WARNING" => "warn",
        "CRITICAL" | "FATAL" => "error",
        "NOTSET" => "trace",
        _ => level,
    };
    name.parse()
        .map_err(|_| CliError::Validation(format!("Invalid log level: {level}")))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_positional() {
        let cli = Cli::try_parse_from(["stencil", "generate", "src", "out"]).unwrap();
        let Commands::Generate(args) = cli.command;
        assert!(args.log.is_none());
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "stencil",
            "generate",
            "src",
            "out",
            "--log",
            "DEBUG",
            "--force_deletion",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command;
        assert_eq!(args.log.as_deref(), Some("DEBUG"));
    }

    #[test]
    fn test_parse_force_deletion_alias() {
        assert!(Cli::try_parse_from(["stencil", "generate", "--force-deletion"]).is_ok());
    }

    #[test]
    fn test_parse_config_option() {
        assert!(Cli::try_parse_from(["stencil", "generate", "-c", "site.toml"]).is_ok());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
    }

    #[test]
    fn test_parse_level_classic_names() {
        assert_eq!(parse_level("WARNING").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_level("CRITICAL").unwrap(), LevelFilter::ERROR);
        assert_eq!(parse_level("fatal").unwrap(), LevelFilter::ERROR);
        assert_eq!(parse_level("NOTSET").unwrap(), LevelFilter::TRACE);
        assert_eq!(parse_level("DEBUG").unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_parse_level_invalid() {
        let err = parse_level("loud").unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(err.to_string().contains("loud"));
    }
}
