use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use sixdice_ledger::LedgerEntry;
use sixdice_types::Amount;

/// HTTP endpoint paths.
pub mod endpoints {
    pub const BALANCE: &str = "/balance";
    pub const ROLL: &str = "/roll";
    pub const RESET: &str = "/reset";
    pub const SIMULATE: &str = "/simulate";
    pub const HISTORY: &str = "/history";
    pub const HEALTH: &str = "/health";
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RollRequest {
    #[serde(deserialize_with = "integer_amount")]
    pub bet: Amount,
}

/// Accept an integer, an integral float (`10.0`) or an integer string (`"10"`).
fn integer_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Float(value)
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        Raw::Float(value) => Err(D::Error::custom(format!(
            "expected an integer amount, got {value}"
        ))),
        Raw::Text(text) => text.trim().parse().map_err(|_| {
            D::Error::custom(format!("expected an integer amount, got {text:?}"))
        }),
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulateQuery {
    pub iterations: Option<i64>,
    pub bet: Option<Amount>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<LedgerEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Health check response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}
