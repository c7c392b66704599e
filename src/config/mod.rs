mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;

pub const DEFAULT_ZONE: &str = "eu1.make.com";
pub const DEFAULT_PORT: u16 = 3000;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub api_key: Option<String>,
    pub zone: Option<String>,
    pub team_id: Option<String>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

#[derive(Clone)]
pub struct AppConfig {
    // Make account
    pub api_key: String,
    pub zone: String,
    pub team_id: String,

    // Server
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

// The API key never ends up in logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("zone", &self.zone)
            .field("team_id", &self.team_id)
            .field("port", &self.port)
            .field("logging_level", &self.logging_level)
            .finish()
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_key = non_empty(file.api_key.or_else(|| cli.api_key.clone())).ok_or_else(|| {
            anyhow::anyhow!("api_key must be specified via MAKE_API_KEY or in config file")
        })?;

        let team_id = non_empty(file.team_id.or_else(|| cli.team_id.clone())).ok_or_else(|| {
            anyhow::anyhow!("team_id must be specified via MAKE_TEAM_ID or in config file")
        })?;

        let zone = non_empty(file.zone.or_else(|| cli.zone.clone()))
            .unwrap_or_else(|| DEFAULT_ZONE.to_string());
        if zone.contains("://") || zone.contains('/') {
            bail!(
                "zone must be a bare host name such as {}, got {:?}",
                DEFAULT_ZONE,
                zone
            );
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        Ok(Self {
            api_key,
            zone,
            team_id,
            port,
            logging_level,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
