use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::gateway_logic::state::GatewayStateConfig;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MESSENGER_HOST: &str = "127.0.0.1";
pub const DEFAULT_MESSENGER_PORT: u16 = 6379;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),
}

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default)]
#[clap(about = "Auction pipeline command gateway", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[clap(long, env = "PORT", help = "Port to listen on for inbound commands.")]
    pub port: Option<u16>,

    #[clap(long, env = "GATEWAY_CONFIG_PATH", help = "Path to the JSON configuration file.")]
    pub config_path: Option<PathBuf>,

    #[clap(long, env = "PROJECT_ID", help = "Tenant/project identifier for registry and storage.")]
    pub project_id: Option<String>,

    #[clap(long, env = "K_SERVICE", help = "Service-name label attached to startup logs.")]
    pub service_name: Option<String>,

    #[clap(long, env = "REGISTRY_URL", help = "Endpoint registry connection URL (postgres://...).")]
    pub registry_url: Option<String>,

    #[clap(long, env = "STORAGE_URL", help = "Object-storage API base URL.")]
    pub storage_url: Option<String>,

    #[clap(long, env = "MESSENGER_HOST", help = "Message bus host.")]
    pub messenger_host: Option<String>,

    #[clap(long, env = "MESSENGER_PORT", help = "Message bus port.")]
    pub messenger_port: Option<u16>,

    #[clap(long, env = "MESSENGER_FATAL", help = "Treat a message bus connection failure as fatal at bootstrap.")]
    pub messenger_fatal: Option<bool>,

    #[clap(long, env = "GATEWAY_LOG_DIR", help = "Directory for log files.")]
    pub log_dir: Option<PathBuf>,

    #[clap(long, env = "GATEWAY_LOG_LEVEL", help = "Logging level (trace, debug, info, warn, error).")]
    pub log_level: Option<String>,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            port: other.port.or(self.port),
            config_path: other.config_path.or(self.config_path),
            project_id: other.project_id.or(self.project_id),
            service_name: other.service_name.or(self.service_name),
            registry_url: other.registry_url.or(self.registry_url),
            storage_url: other.storage_url.or(self.storage_url),
            messenger_host: other.messenger_host.or(self.messenger_host),
            messenger_port: other.messenger_port.or(self.messenger_port),
            messenger_fatal: other.messenger_fatal.or(self.messenger_fatal),
            log_dir: other.log_dir.or(self.log_dir),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Extracts the validated bootstrap configuration, failing on any
    /// missing load-bearing value.
    pub fn gateway_state_config(&self) -> Result<GatewayStateConfig, ConfigError> {
        Ok(GatewayStateConfig {
            project_id: self
                .project_id
                .clone()
                .ok_or(ConfigError::Missing("PROJECT_ID"))?,
            registry_url: self
                .registry_url
                .clone()
                .ok_or(ConfigError::Missing("REGISTRY_URL"))?,
            storage_url: self
                .storage_url
                .clone()
                .ok_or(ConfigError::Missing("STORAGE_URL"))?,
            messenger_host: self
                .messenger_host
                .clone()
                .unwrap_or_else(|| DEFAULT_MESSENGER_HOST.to_string()),
            messenger_port: self.messenger_port.unwrap_or(DEFAULT_MESSENGER_PORT),
            messenger_fatal: self.messenger_fatal.unwrap_or(false),
        })
    }
}

pub fn load_config() -> Config {
    // 1. Load defaults
    let default_config = Config {
        port: Some(DEFAULT_PORT),
        log_dir: Some(PathBuf::from("./logs")),
        log_level: Some("info".to_string()),
        messenger_host: Some(DEFAULT_MESSENGER_HOST.to_string()),
        messenger_port: Some(DEFAULT_MESSENGER_PORT),
        messenger_fatal: Some(false),
        ..Default::default()
    };

    // 2. Load from config file (server_gateway.conf) if present.
    //    Allow overriding the default config file path with a CLI arg.
    let cli_args = Config::parse();

    let config_file_path = cli_args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("server_gateway.conf"));

    let current_config = merge_config_file(default_config, &config_file_path);

    // 3. Override with environment variables and CLI arguments.
    //    clap handles env vars and CLI args in one pass.
    current_config.merge(cli_args)
}

// Runs before the tracing subscriber is installed, so problems with the
// config file go to stderr rather than a not-yet-wired logger.
fn merge_config_file(current: Config, path: &Path) -> Config {
    if !path.exists() {
        return current;
    }

    let config_str = match fs::read_to_string(path) {
        Ok(config_str) => config_str,
        Err(err) => {
            eprintln!(
                "Failed to read config file {}: {err}, falling back to other sources",
                path.display()
            );
            return current;
        }
    };

    match serde_json::from_str::<Config>(&config_str) {
        Ok(file_config) => current.merge(file_config),
        Err(err) => {
            eprintln!(
                "Failed to parse config file {}: {err}, falling back to other sources",
                path.display()
            );
            current
        }
    }
}
