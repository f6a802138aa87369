//! numgrid - Entry Point

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// numgrid - scroll an endless grid of natural numbers
#[derive(Parser, Debug)]
#[command(name = "numgrid")]
#[command(version)]
#[command(about = "TUI for scrolling natural numbers with primes and factors")]
pub struct Args {
    /// Cells per grid row
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Rows of entries prefetched beyond the screen
    #[arg(short, long)]
    pub buffer_rows: Option<usize>,

    /// Rows generated by the initial load
    #[arg(long)]
    pub initial_rows: Option<usize>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = numgrid::config::load_config_with_precedence(args.config.clone())?;
        let merged = numgrid::config::merge_config(config_file);
        let with_env = numgrid::config::apply_env_overrides(merged);
        numgrid::config::apply_cli_overrides(
            with_env,
            args.columns,
            args.buffer_rows,
            args.initial_rows,
            args.no_color,
        )
    };
    config.validate()?;

    numgrid::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    numgrid::view::run_with_config(&config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["numgrid", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["numgrid", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["numgrid"]);
        assert_eq!(args.columns, None);
        assert_eq!(args.buffer_rows, None);
        assert_eq!(args.initial_rows, None);
        assert!(!args.no_color);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_geometry_flags() {
        let args = Args::parse_from(["numgrid", "-c", "8", "--buffer-rows", "50", "--initial-rows", "12"]);
        assert_eq!(args.columns, Some(8));
        assert_eq!(args.buffer_rows, Some(50));
        assert_eq!(args.initial_rows, Some(12));
    }

    #[test]
    fn test_short_buffer_rows_flag() {
        let args = Args::parse_from(["numgrid", "-b", "20"]);
        assert_eq!(args.buffer_rows, Some(20));
    }

    #[test]
    fn test_columns_rejects_non_number() {
        let result = Args::try_parse_from(["numgrid", "--columns", "many"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_color_and_config() {
        let args = Args::parse_from(["numgrid", "--no-color", "--config", "/tmp/numgrid.toml"]);
        assert!(args.no_color);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/numgrid.toml")));
    }
}
