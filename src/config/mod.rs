//! Project configuration for `texview.toml`.
//!
//! Configuration is deliberately small: the project root, the listen
//! address, and the two external tool command lines. Precedence is
//! CLI flag > `texview.toml` > built-in default, and the merged result is
//! an explicit structure handed to constructors - nothing reads config
//! from process-wide state.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"
//! port = 5432
//!
//! [tools]
//! build_command = ["latexmk", "-synctex=1", "-interaction=nonstopmode", "-pdf"]
//! sync_command = ["displayline"]
//! ```

use crate::cli::{Cli, Commands};
use crate::utils::normalize_path;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use thiserror::Error;

/// Config file looked up under the project root.
pub const CONFIG_FILENAME: &str = "texview.toml";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5432;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Merged configuration for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Project root directory - all served paths resolve under it
    /// (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Preview server settings
    pub serve: ServeConfig,

    /// External tool command lines
    pub tools: ToolsConfig,
}

/// Preview server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number. 0 asks the OS for a free port.
    pub port: u16,
}

/// External tool command lines, as argv arrays.
///
/// The filename / sync arguments are appended by the orchestrator; only
/// the leading program-plus-flags part is configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Document build command; the entry filename is appended.
    pub build_command: Vec<String>,

    /// Viewer sync command; `-r <line> <artifact> <original>` is appended.
    pub sync_command: Vec<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            serve: ServeConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            build_command: vec![
                "latexmk".into(),
                "-synctex=1".into(),
                "-interaction=nonstopmode".into(),
                "-pdf".into(),
            ],
            sync_command: default_sync_command(),
        }
    }
}

/// Default viewer-sync command.
///
/// Skim ships `displayline` inside its app bundle rather than on PATH, so
/// on macOS fall back to the bundled binary when the bare name is missing.
fn default_sync_command() -> Vec<String> {
    #[cfg(target_os = "macos")]
    {
        const SKIM_DISPLAYLINE: &str =
            "/Applications/Skim.app/Contents/SharedSupport/displayline";
        if which::which("displayline").is_err()
            && std::path::Path::new(SKIM_DISPLAYLINE).is_file()
        {
            return vec![SKIM_DISPLAYLINE.into()];
        }
    }
    vec!["displayline".into()]
}

impl PreviewConfig {
    /// Load configuration: `texview.toml` under the root if present, with
    /// CLI flags applied on top.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let root = match &cli.root {
            Some(dir) => normalize_path(dir),
            None => std::env::current_dir()
                .map_err(|e| ConfigError::Io(PathBuf::from("."), e))?,
        };

        let file = root.join(CONFIG_FILENAME);
        let mut config = match file.try_exists() {
            Ok(true) => {
                let text = std::fs::read_to_string(&file)
                    .map_err(|e| ConfigError::Io(file.clone(), e))?;
                Self::parse(&text)?
            }
            Ok(false) => Self::default(),
            Err(e) => return Err(ConfigError::Io(file, e)),
        };
        config.root = root;

        if let Commands::Serve { interface, port } = &cli.command {
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tools.build_command.is_empty() {
            return Err(ConfigError::Validation(
                "[tools] build_command must not be empty".into(),
            ));
        }
        if self.tools.sync_command.is_empty() {
            return Err(ConfigError::Validation(
                "[tools] sync_command must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreviewConfig::parse("").unwrap();

        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, DEFAULT_PORT);
        assert_eq!(config.tools.build_command[0], "latexmk");
        assert!(config.tools.build_command.contains(&"-pdf".to_string()));
    }

    #[test]
    fn test_parse_serve_section() {
        let config =
            PreviewConfig::parse("[serve]\ninterface = \"0.0.0.0\"\nport = 8080").unwrap();

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.serve.port, 8080);
    }

    #[test]
    fn test_parse_tools_section() {
        let config = PreviewConfig::parse(
            "[tools]\nbuild_command = [\"tectonic\"]\nsync_command = [\"zathura\", \"--synctex-forward\"]",
        )
        .unwrap();

        assert_eq!(config.tools.build_command, ["tectonic"]);
        assert_eq!(config.tools.sync_command, ["zathura", "--synctex-forward"]);
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = PreviewConfig::parse("[tools]\nbuild_command = []").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            PreviewConfig::parse("[serve]\nport = \"not a number\""),
            Err(ConfigError::Toml(_))
        ));
    }
}
