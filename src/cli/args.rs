//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Texview PDF preview bridge CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root directory (default: current working directory)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve PDF previews over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on; 0 picks a free port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Build the document containing PATH, then sync the PDF viewer
    #[command(visible_alias = "b")]
    Build {
        /// Any file inside the document's directory
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,

        /// Source line to sync the viewer to
        #[arg(default_value_t = 0)]
        line: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_serve_alias() {
        let cli = Cli::parse_from(["texview", "s", "--port", "8080"]);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: Some(8080),
                ..
            }
        ));
    }

    #[test]
    fn test_build_line_defaults_to_zero() {
        let cli = Cli::parse_from(["texview", "b", "notes/ch1.tex"]);
        match cli.command {
            Commands::Build { path, line } => {
                assert_eq!(path, PathBuf::from("notes/ch1.tex"));
                assert_eq!(line, 0);
            }
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn test_build_with_line() {
        let cli = Cli::parse_from(["texview", "build", "book/ch.tex", "42"]);
        assert!(matches!(cli.command, Commands::Build { line: 42, .. }));
    }
}
