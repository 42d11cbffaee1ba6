use axum::extract::State;
use axum::Json;
use farmhub_adapters::FarmRecord;

use crate::auth::{authorize, Capability, CurrentSession};
use crate::errors::AppError;
use crate::state::AppState;

/// `GET /api/farm`. An empty list is a valid answer; a store failure is an error.
pub async fn list_farms(
    State(state): State<AppState>,
    current: CurrentSession,
) -> Result<Json<Vec<FarmRecord>>, AppError> {
    authorize(current.session(), Capability::Authenticated)?;
    Ok(Json(state.db.list_farms().await?))
}
