use std::sync::Arc;

use sixdice_game::GameTable;

use crate::config::SimulationConfig;

/// Shared handler state: the game table and simulation limits.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<GameTable>,
    pub simulation: SimulationConfig,
}

impl AppState {
    pub fn new(table: GameTable, simulation: SimulationConfig) -> Self {
        Self {
            table: Arc::new(table),
            simulation,
        }
    }
}
