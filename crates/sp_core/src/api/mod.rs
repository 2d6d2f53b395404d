//! JSON API surface.

pub mod json_api;

pub use json_api::{
    resolve_player_json, solve_optimal_json, ApiError, ApiResponse, ResolvePlayerRequest,
    ResolvePlayerResponse, SolveOptimalRequest, SolveOptimalResponse, API_VERSION,
};
