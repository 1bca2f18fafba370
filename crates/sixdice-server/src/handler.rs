use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;
use sixdice_game::{RollOutcome, Simulation, SimulationReport};

use crate::api::{BalanceResponse, HealthResponse, HistoryResponse, RollRequest, SimulateQuery};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn balance_handler(State(state): State<AppState>) -> ServerResult<Json<BalanceResponse>> {
    let balance = state.table.balance()?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn roll_handler(
    State(state): State<AppState>,
    payload: Result<Json<RollRequest>, JsonRejection>,
) -> ServerResult<Json<RollOutcome>> {
    let Json(request) = payload?;
    let outcome = state.table.roll(request.bet)?;
    Ok(Json(outcome))
}

pub async fn reset_handler(State(state): State<AppState>) -> ServerResult<Json<BalanceResponse>> {
    let balance = state.table.reset()?;
    Ok(Json(BalanceResponse { balance }))
}

pub async fn history_handler(State(state): State<AppState>) -> ServerResult<Json<HistoryResponse>> {
    let entries = state.table.history()?;
    Ok(Json(HistoryResponse { entries }))
}

/// Runs the simulation on the blocking pool; it never touches the ledger.
pub async fn simulate_handler(
    State(state): State<AppState>,
    query: Result<Query<SimulateQuery>, QueryRejection>,
) -> ServerResult<Json<SimulationReport>> {
    let Query(query) = query?;
    let limits = &state.simulation;
    let mut simulation = Simulation::new(
        query.iterations.unwrap_or(limits.default_iterations),
        query.bet.unwrap_or(limits.default_bet),
    )
    .with_max_iterations(limits.max_iterations);
    if let Some(seed) = query.seed {
        simulation = simulation.with_seed(seed);
    }

    let report = tokio::task::spawn_blocking(move || simulation.run())
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;
    Ok(Json(report))
}
