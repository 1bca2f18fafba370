//! HTTP server for SixDice.
//!
//! Exposes the game table over JSON: balance, roll, reset, history and a
//! ledger-free RTP simulation. Cross-origin access and request tracing are
//! handled by `tower-http` layers.

pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use api::{BalanceResponse, ErrorResponse, HealthResponse, HistoryResponse, RollRequest};
pub use config::{ServerConfig, SimulationConfig};
pub use error::{ServerError, ServerResult};
pub use server::SixDiceServer;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use sixdice_game::{FixedDice, GameTable};
    use sixdice_ledger::InMemoryLedger;
    use sixdice_types::DiceRoll;
    use tower::util::ServiceExt;

    fn app_with(values: [u8; 6]) -> Router {
        let dice = FixedDice::new(DiceRoll::from_values(&values).unwrap());
        let table = GameTable::open(InMemoryLedger::new(), dice).unwrap();
        let state = AppState::new(table, SimulationConfig::default());
        router::build_router(state, &[])
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_owned()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn balance_starts_at_one_hundred() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, get("/balance")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "balance": 100 }));
    }

    #[tokio::test]
    async fn roll_yahtzee() {
        let app = app_with([1, 1, 1, 1, 1, 1]);
        let (status, body) = send(&app, post_json("/roll", r#"{"bet": 10}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dice"], serde_json::json!([1, 1, 1, 1, 1, 1]));
        assert_eq!(body["combination"], "Yahtzee");
        assert_eq!(body["win"], 80);
        assert_eq!(body["balance"], 170);
    }

    #[tokio::test]
    async fn roll_without_combination_returns_null() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (_, body) = send(&app, post_json("/roll", r#"{"bet": 25}"#)).await;
        assert!(body["combination"].is_null());
        assert_eq!(body["win"], 0);
        assert_eq!(body["balance"], 75);
    }

    #[tokio::test]
    async fn invalid_bet_is_bad_request() {
        let app = app_with([1, 1, 1, 1, 1, 1]);
        for bet in ["0", "-5"] {
            let json = format!(r#"{{"bet": {bet}}}"#);
            let (status, body) = send(&app, post_json("/roll", &json)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "invalid_bet");
        }
        let (_, body) = send(&app, get("/history")).await;
        assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insufficient_balance_is_conflict() {
        let app = app_with([1, 1, 1, 1, 1, 1]);
        let (status, body) = send(&app, post_json("/roll", r#"{"bet": 101}"#)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "insufficient_balance");
        let (_, body) = send(&app, get("/balance")).await;
        assert_eq!(body["balance"], 100);
    }

    #[tokio::test]
    async fn integer_valued_bet_forms_are_accepted() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, post_json("/roll", r#"{"bet": "10"}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 90);

        let (status, body) = send(&app, post_json("/roll", r#"{"bet": 10.0}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 80);
    }

    #[tokio::test]
    async fn malformed_bet_renders_json_error() {
        let app = app_with([1, 1, 1, 1, 1, 1]);
        for json in [r#"{"bet": "ten"}"#, r#"{"bet": 2.5}"#, r#"{}"#, "not json"] {
            let (status, body) = send(&app, post_json("/roll", json)).await;
            assert!(status.is_client_error(), "{json}: {status}");
            assert_eq!(body["code"], "invalid_request", "{json}");
            assert!(body["error"].as_str().is_some());
        }
        let (_, body) = send(&app, get("/balance")).await;
        assert_eq!(body["balance"], 100);
    }

    #[tokio::test]
    async fn missing_content_type_renders_json_error() {
        let app = app_with([1, 1, 1, 1, 1, 1]);
        let request = Request::builder()
            .method("POST")
            .uri("/roll")
            .body(Body::from(r#"{"bet": 10}"#))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["code"], "invalid_request");
    }

    #[tokio::test]
    async fn malformed_simulate_query_renders_json_error() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, get("/simulate?iterations=abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    #[tokio::test]
    async fn reset_restores_balance() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        send(&app, post_json("/roll", r#"{"bet": 60}"#)).await;
        let (status, body) = send(&app, post_empty("/reset")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], 100);

        let (_, body) = send(&app, get("/history")).await;
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["kind"], "Init");
        assert_eq!(entries[0]["value"], 100);
    }

    #[tokio::test]
    async fn history_lists_entries_in_order() {
        let app = app_with([2, 2, 3, 3, 5, 5]);
        send(&app, post_json("/roll", r#"{"bet": 10}"#)).await;
        let (_, body) = send(&app, get("/history")).await;
        let kinds: Vec<&str> = body["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["Init", "Bet", "Win"]);
    }

    #[tokio::test]
    async fn simulate_with_explicit_parameters() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, get("/simulate?iterations=2000&bet=5&seed=9")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["simulated_rolls"], 2000);
        assert_eq!(body["total_bet"], 10_000);
        assert!(body["RTP"].as_str().unwrap().ends_with('%'));

        // The ledger is untouched.
        let (_, body) = send(&app, get("/balance")).await;
        assert_eq!(body["balance"], 100);
    }

    #[tokio::test]
    async fn simulate_zero_iterations_is_bad_request() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let (status, body) = send(&app, get("/simulate?iterations=0&bet=10")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_iteration_count");
    }

    #[tokio::test]
    async fn simulate_uses_configured_defaults() {
        let dice = FixedDice::new(DiceRoll::from_values(&[1, 2, 3, 4, 5, 6]).unwrap());
        let table = GameTable::open(InMemoryLedger::new(), dice).unwrap();
        let limits = SimulationConfig {
            default_iterations: 500,
            default_bet: 2,
            max_iterations: 1_000,
        };
        let app = router::build_router(AppState::new(table, limits), &[]);

        let (_, body) = send(&app, get("/simulate")).await;
        assert_eq!(body["simulated_rolls"], 500);
        assert_eq!(body["total_bet"], 1_000);

        let (status, _) = send(&app, get("/simulate?iterations=1001")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cors_headers_are_present() {
        let app = app_with([1, 2, 3, 4, 5, 6]);
        let request = Request::builder()
            .uri("/balance")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
