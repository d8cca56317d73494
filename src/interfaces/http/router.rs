//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::PricingService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{self, MetricsState};
use crate::interfaces::http::modules::pricing::{self, PricingState};
use crate::interfaces::http::modules::rate_configs;
use crate::interfaces::http::modules::request_id::request_id_middleware;

/// Unified state for all routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub pricing: PricingState,
    pub metrics: MetricsState,
    pub health: HealthState,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiState> for PricingState {
    fn from_ref(s: &ApiState) -> Self {
        s.pricing.clone()
    }
}

impl FromRef<ApiState> for MetricsState {
    fn from_ref(s: &ApiState) -> Self {
        s.metrics.clone()
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Pricing
        pricing::handlers::calculate_quote,
        // Rate configs
        rate_configs::handlers::list_rate_configs,
        rate_configs::handlers::get_rate_config,
        rate_configs::handlers::create_rate_config,
        rate_configs::handlers::update_rate_config,
        rate_configs::handlers::delete_rate_config,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::handlers::HealthResponse,
            // Pricing
            pricing::dto::QuoteHttpRequest,
            pricing::dto::QuoteResponse,
            pricing::dto::SurchargeLineDto,
            pricing::dto::DimensionsDto,
            // Rate configs
            rate_configs::dto::RateConfigResponse,
            rate_configs::dto::CreateRateConfigRequest,
            rate_configs::dto::UpdateRateConfigRequest,
            rate_configs::dto::WeightBracketDto,
            rate_configs::dto::PeakWindowDto,
            rate_configs::dto::SurchargeAmountDto,
        )
    ),
    tags(
        (name = "Health", description = "Service health check for uptime and readiness monitoring."),
        (name = "Pricing", description = "Delivery quote calculation. Deterministic: the same request and tenant rate configuration always produce the same itemized breakdown. Errors distinguish `InvalidRequest` (caller mistake) from `InvalidConfiguration` (broken tenant rate table)."),
        (name = "Rate Configs", description = "Tenant rate configurations: base rates per delivery tier, per-km distance rate, weight brackets, tier multipliers, surcharges (flat or percentage), peak windows, holidays, insurance rate and minimum charge. Rate tables are validated on create/update so malformed configuration fails at load time."),
    ),
    info(
        title = "Delivery Pricing Service API",
        version = "1.0.0",
        description = "REST API for multi-tenant delivery and transportation pricing.

## Response format

All REST responses are wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}}
{\"success\": false, \"error\": \"description\"}
```

## Quote calculation

`POST /api/v1/pricing/quote` prices a shipment against the tenant's rate
configuration: base rate by tier, distance charge, weight-bracket charge,
tier multiplier, surcharge lines (peak hour, holiday, urgent, refrigeration,
special equipment, escort), declared-value insurance and a minimum-charge
floor. All monetary fields are rounded half-up to the configured number of
decimal places and returned as decimal strings."
    )
)]
pub struct ApiDoc;

/// Build the REST API router.
pub fn create_api_router(service: Arc<PricingService>, prometheus: PrometheusHandle) -> Router {
    let state = ApiState {
        pricing: PricingState { service },
        metrics: MetricsState { handle: prometheus },
        health: HealthState::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handlers::health_check))
        .route("/metrics", get(metrics::handlers::prometheus_metrics))
        .route(
            "/api/v1/pricing/quote",
            post(pricing::handlers::calculate_quote),
        )
        .route(
            "/api/v1/rate-configs",
            get(rate_configs::handlers::list_rate_configs)
                .post(rate_configs::handlers::create_rate_config),
        )
        .route(
            "/api/v1/rate-configs/{tenant_id}",
            get(rate_configs::handlers::get_rate_config)
                .put(rate_configs::handlers::update_rate_config)
                .delete(rate_configs::handlers::delete_rate_config),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────
