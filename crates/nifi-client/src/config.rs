//! Client configuration (spec §4.A "Configuration", §6 "Configuration").

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One configured NiFi server entry. Mirrors the shape listed in a
/// server-side configuration document (spec §6): id, display name, URL,
/// credentials, TLS-verification flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NiFiServerConfig {
    pub id: String,
    pub display_name: String,
    pub base_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl NiFiServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
