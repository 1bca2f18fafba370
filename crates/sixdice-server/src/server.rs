use sixdice_game::{GameTable, RngDice};
use sixdice_ledger::{FileLedger, InMemoryLedger};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// SixDice game server.
pub struct SixDiceServer {
    config: ServerConfig,
}

impl SixDiceServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured ledger and wrap it in a game table.
    pub fn build_state(&self) -> ServerResult<AppState> {
        let dice = RngDice::from_entropy();
        let table = match &self.config.ledger_path {
            Some(path) => {
                let ledger = FileLedger::open(path, self.config.sync_mode)?;
                GameTable::open(ledger, dice)?
            }
            None => {
                tracing::warn!("no ledger_path configured; balance will not survive a restart");
                GameTable::open(InMemoryLedger::new(), dice)?
            }
        };
        Ok(AppState::new(table, self.config.simulation.clone()))
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = self.build_state()?;
        Ok(build_router(state, &self.config.cors_allowed_origins))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("SixDice server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
