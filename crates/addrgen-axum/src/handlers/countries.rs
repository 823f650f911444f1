//! Country handlers - the directory backing the country picker.

use addrgen_core::Country;
use axum::Json;
use axum::extract::State;

use crate::error::HttpError;
use crate::state::AppState;

/// List all known countries, sorted by code.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Country>>, HttpError> {
    Ok(Json(state.generation.list_countries().await?))
}
