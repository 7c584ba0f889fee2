//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{
    ErrorResponse, SteadyStateRecord, SummaryResponse, TrajectoryQuery, TrajectoryRecord,
};

/// Returns the scenario config and the run summary.
///
/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        config: state.config.clone(),
        summary: state.summary.clone(),
    })
}

/// Returns trajectory records, optionally filtered by step range.
///
/// `GET /trajectory` → 200 + `Vec<TrajectoryRecord>` JSON
/// `GET /trajectory?from=N&to=M` → steps in `[N, M]`, three records per step
/// `GET /trajectory?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_trajectory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrajectoryQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(1);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<TrajectoryRecord> = state
        .trajectory
        .points()
        .iter()
        .filter(|p| p.step >= from && p.step <= to)
        .map(TrajectoryRecord::from)
        .collect();

    Ok(Json(records))
}

/// Returns the stationary distribution of each period.
///
/// `GET /steady-state` → 200 + `Vec<SteadyStateRecord>` JSON
pub async fn get_steady_state(State(state): State<Arc<AppState>>) -> Json<Vec<SteadyStateRecord>> {
    Json(
        state
            .summary
            .periods
            .iter()
            .map(SteadyStateRecord::from)
            .collect(),
    )
}
