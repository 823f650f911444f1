//! Generation handlers - launch, inspect, cancel and follow generator runs.

use std::convert::Infallible;

use addrgen_core::{
    CancelResponse, ProcessId, ProcessRecord, StartGenerationRequest, StartGenerationResponse,
};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use futures_util::stream::Stream;

use crate::error::HttpError;
use crate::sse::event_sse;
use crate::state::AppState;

/// Start a generator run.
///
/// Responds as soon as the process is spawned. A generator that fails to
/// start still yields `started`; the failure shows up on the process record.
/// A body that is not a start request is a 400 like any other invalid input.
pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartGenerationRequest>, JsonRejection>,
) -> Result<Json<StartGenerationResponse>, HttpError> {
    let Json(req) = payload?;
    Ok(Json(state.generation.start_generation(&req).await?))
}

/// List all tracked processes, newest first.
pub async fn list(State(state): State<AppState>) -> Json<Vec<ProcessRecord>> {
    Json(state.generation.list_processes())
}

/// Get one process with its buffered output.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProcessRecord>, HttpError> {
    Ok(Json(state.generation.get_process(&ProcessId::from(id))?))
}

/// Cancel a running process.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, HttpError> {
    Ok(Json(state.generation.cancel_process(&ProcessId::from(id))?))
}

/// Stream a process's events via SSE.
///
/// The first message carries the current status, the last one is
/// `complete`. Closing the connection leaves the process running.
pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static>, HttpError> {
    let events = state.generation.stream_process(&ProcessId::from(id))?;
    Ok(event_sse(events))
}
