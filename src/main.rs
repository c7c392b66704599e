use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use make_mcp_server::config::{AppConfig, CliConfig, FileConfig, DEFAULT_PORT, DEFAULT_ZONE};
use make_mcp_server::{create_mcp_state, run_server, MakeClient, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {
    /// Make API token.
    #[clap(long, env = "MAKE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Make zone host, e.g. eu1.make.com or us1.make.com.
    #[clap(long, env = "MAKE_ZONE", default_value = DEFAULT_ZONE)]
    pub zone: String,

    /// Team whose scenarios, connections and data stores are exposed.
    #[clap(long, env = "MAKE_TEAM_ID")]
    pub team_id: Option<String>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Optional TOML config file. Values in the file override CLI and environment.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            api_key: self.api_key.clone(),
            zone: Some(self.zone.clone()),
            team_id: self.team_id.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;
    info!("Resolved configuration: {:?}", config);

    let make_client = MakeClient::for_zone(&config.zone, config.api_key.clone())
        .context("Failed to create Make API client")?;
    info!("Make API at {}", make_client.base_url());

    let mcp_state = create_mcp_state(Arc::new(make_client), config.team_id.clone());
    info!(
        "Exposing {} tools for team {}",
        mcp_state.registry.tool_count(),
        config.team_id
    );

    let server_config = ServerConfig {
        requests_logging_level: config.logging_level,
        port: config.port,
    };

    run_server(server_config, mcp_state).await
}
