//! HTTP API Layer
//!
//! This crate provides the REST API for the customer registry using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for customers, addresses and health
//! - **Middleware**: Request logging with a correlation id
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, health_sources, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use core_kernel::HealthCheckable;
use domain_customer::CustomerService;

use crate::config::ApiConfig;
use crate::middleware::request_logging_middleware;
use crate::handlers::{addresses, customers, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: CustomerService,
    /// Adapters probed by the readiness check
    pub health: Vec<Arc<dyn HealthCheckable>>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        service: CustomerService,
        health: Vec<Arc<dyn HealthCheckable>>,
        config: ApiConfig,
    ) -> Self {
        Self {
            service,
            health,
            config,
        }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Customer service, health sources and API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Customer routes
    let customer_routes = Router::new()
        .route("/", get(customers::list_customers).post(customers::create_customer))
        .route("/batch", post(customers::create_batch))
        .route("/page", get(customers::page_customers))
        .route("/search", get(customers::search_customers))
        .route(
            "/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .patch(customers::patch_customer)
                .delete(customers::delete_customer),
        );

    // Address routes
    let address_routes = Router::new()
        .route("/lookup/:cep", get(addresses::lookup_address))
        .route("/sync/:cep", post(addresses::sync_address))
        .route("/:cep", get(addresses::get_address));

    let api_routes = Router::new()
        .nest("/customers", customer_routes)
        .nest("/addresses", address_routes);

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_logging_middleware))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
