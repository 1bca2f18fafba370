use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sixdice_game::{DEFAULT_BET, DEFAULT_ITERATIONS};
use sixdice_ledger::SyncMode;
use sixdice_types::Amount;

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Ledger file. `None` keeps the ledger in memory for the process lifetime.
    pub ledger_path: Option<PathBuf>,
    pub sync_mode: SyncMode,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
    pub simulation: SimulationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            ledger_path: None,
            sync_mode: SyncMode::default(),
            cors_allowed_origins: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(raw: &str) -> ServerResult<Self> {
        toml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

/// Defaults and limits for `/simulate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_iterations: i64,
    pub default_bet: Amount,
    pub max_iterations: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_iterations: DEFAULT_ITERATIONS,
            default_bet: DEFAULT_BET,
            max_iterations: 10_000_000,
        }
    }
}
