//! Customer handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use domain_customer::UpdateOutcome;

use crate::dto::{
    CustomerRequest, CustomerResponse, PageQuery, PageResponse, PatchCustomerRequest,
    SearchQuery,
};
use crate::handlers::parse_customer_id;
use crate::{error::ApiError, AppState};

/// Creates a customer at the address its postal code resolves to
#[instrument(skip(state, request))]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), ApiError> {
    let customer = state.service.insert(request.into_domain()?).await?;
    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Creates every customer in the body or none of them
#[instrument(skip(state, requests), fields(count = requests.len()))]
pub async fn create_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<CustomerRequest>>,
) -> Result<(StatusCode, Json<Vec<CustomerResponse>>), ApiError> {
    let batch = requests
        .into_iter()
        .map(CustomerRequest::into_domain)
        .collect::<Result<Vec<_>, _>>()?;
    let customers = state.service.batch_insert(batch).await?;
    Ok((
        StatusCode::CREATED,
        Json(customers.into_iter().map(Into::into).collect()),
    ))
}

/// Lists every customer
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerResponse>>, ApiError> {
    let customers = state.service.find_all().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Lists one page of customers
pub async fn page_customers(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<CustomerResponse>>, ApiError> {
    let request = query.to_request(state.config.page_size_limit())?;
    let page = state.service.find_paginated(&request).await?;
    Ok(Json(page.into()))
}

/// Lists one page of customers whose name contains `name`
pub async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<PageResponse<CustomerResponse>>, ApiError> {
    let request = query.to_request(state.config.page_size_limit())?;
    let page = state
        .service
        .find_by_name_contains(&query.name, &request)
        .await?;
    Ok(Json(page.into()))
}

/// Gets a customer by ID
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state.service.find_by_id(id).await?;
    Ok(Json(customer.into()))
}

/// Replaces a customer; an unknown id changes nothing and answers 404
#[instrument(skip(state, request))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    if !state.service.exists(id).await? {
        return Err(ApiError::NotFound(format!("Customer not found: {}", id)));
    }
    match state.service.update(id, request.into_domain()?).await? {
        UpdateOutcome::Updated(customer) => Ok(Json(customer.into())),
        UpdateOutcome::NotFound => Err(ApiError::NotFound(format!("Customer not found: {}", id))),
    }
}

/// Applies the fields present in the body
#[instrument(skip(state, request))]
pub async fn patch_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PatchCustomerRequest>,
) -> Result<Json<CustomerResponse>, ApiError> {
    let id = parse_customer_id(&id)?;
    let customer = state.service.partial_update(id, request.into()).await?;
    Ok(Json(customer.into()))
}

/// Deletes a customer
#[instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_customer_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
