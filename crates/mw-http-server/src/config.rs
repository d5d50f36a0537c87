//! Server-side configuration document (spec §6 "Configuration",
//! SPEC_FULL.md §3.3): NiFi server entries, the expert-help provider/model
//! pair, and the workflow action ceiling/retry count. Loaded layered —
//! built-in defaults, then an optional TOML file, then environment
//! overrides — matching `tasker-client`/`tasker-ctl`'s workspace pairing
//! of the `config` crate with TOML.

use nifi_client::NiFiServerConfig;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpertHelpConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

impl Default for ExpertHelpConfig {
    fn default() -> Self {
        Self { provider: None, model: None, api_key: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_action_ceiling")]
    pub action_ceiling: usize,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

fn default_action_ceiling() -> usize {
    10
}

fn default_retry_count() -> u32 {
    0
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self { action_ceiling: default_action_ceiling(), retry_count: default_retry_count() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MiddlewareConfig {
    #[serde(default)]
    pub nifi_servers: Vec<NiFiServerConfig>,
    #[serde(default)]
    pub expert_help: ExpertHelpConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    "127.0.0.1:8808".to_string()
}

impl MiddlewareConfig {
    /// Layers built-in defaults, an optional TOML file (path from
    /// `MW_CONFIG_FILE`, defaulting to `middleware.toml` in the current
    /// directory, tolerated if absent), then `MW_`-prefixed environment
    /// overrides (e.g. `MW_BIND_ADDRESS`).
    pub fn load() -> Result<Self, ConfigError> {
        let file_path = std::env::var("MW_CONFIG_FILE").unwrap_or_else(|_| "middleware.toml".to_string());

        let settings = config::Config::builder()
            .set_default("bind_address", default_bind_address())?
            .set_default("workflow.action_ceiling", default_action_ceiling() as i64)?
            .set_default("workflow.retry_count", default_retry_count() as i64)?
            .add_source(config::File::with_name(&file_path).required(false))
            .add_source(config::Environment::with_prefix("MW").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn server(&self, id: &str) -> Option<&NiFiServerConfig> {
        self.nifi_servers.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_without_a_config_file_falls_back_to_defaults() {
        std::env::set_var("MW_CONFIG_FILE", "/nonexistent/middleware.toml");
        let config = MiddlewareConfig::load().expect("defaults alone must be loadable");
        assert_eq!(config.bind_address, "127.0.0.1:8808");
        assert_eq!(config.workflow.action_ceiling, 10);
        assert!(config.nifi_servers.is_empty());
        std::env::remove_var("MW_CONFIG_FILE");
    }
}
