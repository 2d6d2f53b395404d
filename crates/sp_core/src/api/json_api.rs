//! JSON API for host integration.
//!
//! String-in, string-out endpoints so non-Rust hosts (web views, game
//! shells) can call the engine without binding to its types. Every call
//! returns an [`ApiResponse`] envelope; parse and precondition failures
//! are reported inside the envelope, never as panics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::data::sample_roster;
use crate::engine::resolver::NameResolver;
use crate::engine::solver::{self, OptimalResult};
use crate::models::{PlayerRecord, Roster};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Default solver wall-clock budget when the request omits one.
const DEFAULT_TIME_BUDGET_MS: u64 = 2_000;

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Structured API error with a stable code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string() }
    }
}

/// Optimal score request. When `roster` is omitted the embedded sample
/// roster is used (demo path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptimalRequest {
    pub schema_version: Option<String>,
    pub team_sequence: Vec<String>,
    pub roster: Option<Vec<PlayerRecord>>,
    pub time_budget_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveOptimalResponse {
    pub result: OptimalResult,
}

/// Name resolution request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvePlayerRequest {
    pub schema_version: Option<String>,
    pub input: String,
    pub roster: Option<Vec<PlayerRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvePlayerResponse {
    /// None when the input matched nothing (a normal outcome)
    pub canonical_name: Option<String>,
    pub display_name: Option<String>,
    pub stat_value: Option<u32>,
}

fn to_json<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string())
}

fn build_roster(records: Option<Vec<PlayerRecord>>) -> Result<RosterHandle, String> {
    match records {
        Some(records) => Roster::new(records).map(RosterHandle::Owned).map_err(|e| e.to_string()),
        None => Ok(RosterHandle::Sample(sample_roster())),
    }
}

enum RosterHandle {
    Owned(Roster),
    Sample(&'static Roster),
}

impl RosterHandle {
    fn roster(&self) -> &Roster {
        match self {
            RosterHandle::Owned(r) => r,
            RosterHandle::Sample(r) => r,
        }
    }
}

/// Compute the optimal score for a team sequence.
pub fn solve_optimal_json(request_json: &str) -> String {
    let request: SolveOptimalRequest = match serde_json::from_str(request_json) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse SolveOptimalRequest: {}", e);
            let err = ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e));
            return to_json(&ApiResponse::<SolveOptimalResponse>::error(err));
        }
    };

    let roster = match build_roster(request.roster) {
        Ok(roster) => roster,
        Err(message) => {
            let err = ApiError::new("INVALID_ROSTER", &message);
            return to_json(&ApiResponse::<SolveOptimalResponse>::error(err));
        }
    };

    let budget = Duration::from_millis(request.time_budget_ms.unwrap_or(DEFAULT_TIME_BUDGET_MS));
    match solver::solve(&request.team_sequence, roster.roster(), budget) {
        Ok(result) => {
            info!(
                slots = request.team_sequence.len(),
                max_score = result.max_score,
                used_fallback = result.used_fallback,
                "optimal solve complete"
            );
            to_json(&ApiResponse::success(SolveOptimalResponse { result }))
        }
        Err(e) => {
            error!("Optimal solve failed: {}", e);
            let err = ApiError::new("SOLVE_FAILED", &e.to_string());
            to_json(&ApiResponse::<SolveOptimalResponse>::error(err))
        }
    }
}

/// Resolve free-text input to a canonical player.
pub fn resolve_player_json(request_json: &str) -> String {
    let request: ResolvePlayerRequest = match serde_json::from_str(request_json) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse ResolvePlayerRequest: {}", e);
            let err = ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e));
            return to_json(&ApiResponse::<ResolvePlayerResponse>::error(err));
        }
    };

    let roster = match build_roster(request.roster) {
        Ok(roster) => roster,
        Err(message) => {
            let err = ApiError::new("INVALID_ROSTER", &message);
            return to_json(&ApiResponse::<ResolvePlayerResponse>::error(err));
        }
    };

    let roster = roster.roster();
    let resolved = NameResolver::new(roster).resolve(&request.input);
    let response = match resolved.and_then(|name| roster.get(name)) {
        Some(record) => ResolvePlayerResponse {
            canonical_name: Some(record.canonical_name.clone()),
            display_name: Some(record.display_name.clone()),
            stat_value: Some(record.stat_value),
        },
        None => ResolvePlayerResponse { canonical_name: None, display_name: None, stat_value: None },
    };
    to_json(&ApiResponse::success(response))
}
