//! Address handlers

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use crate::dto::AddressResponse;
use crate::handlers::parse_postal_code;
use crate::{error::ApiError, AppState};

/// Looks a postal code up at the provider without storing the result
#[instrument(skip(state))]
pub async fn lookup_address(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let postal_code = parse_postal_code(&cep)?;
    let address = state.service.lookup_address(&postal_code).await?;
    Ok(Json(address.into()))
}

/// Returns the stored address for a postal code
pub async fn get_address(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let postal_code = parse_postal_code(&cep)?;
    let address = state.service.stored_address(&postal_code).await?;
    Ok(Json(address.into()))
}

/// Refetches a postal code and overwrites the stored address
#[instrument(skip(state))]
pub async fn sync_address(
    State(state): State<AppState>,
    Path(cep): Path<String>,
) -> Result<Json<AddressResponse>, ApiError> {
    let postal_code = parse_postal_code(&cep)?;
    let address = state.service.sync_address(&postal_code).await?;
    Ok(Json(address.into()))
}
