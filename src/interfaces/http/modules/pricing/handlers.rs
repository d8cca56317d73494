//! Pricing REST API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{QuoteHttpRequest, QuoteResponse};
use super::PricingState;
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};

/// Calculate a delivery quote for a tenant
///
/// Looks up the tenant's rate configuration and runs the pricing
/// calculation. Pricing failures are deterministic: the same request and
/// configuration always produce the same result or the same error.
#[utoipa::path(
    post,
    path = "/api/v1/pricing/quote",
    tag = "Pricing",
    request_body = QuoteHttpRequest,
    responses(
        (status = 200, description = "Itemized quote", body = ApiResponse<QuoteResponse>),
        (status = 404, description = "Tenant has no rate configuration"),
        (status = 422, description = "InvalidRequest or InvalidConfiguration")
    )
)]
pub async fn calculate_quote(
    State(state): State<PricingState>,
    ValidatedJson(req): ValidatedJson<QuoteHttpRequest>,
) -> Result<Json<ApiResponse<QuoteResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let (tenant_id, request) = req.into_domain();
    match state.service.quote(&tenant_id, request).await {
        Ok(breakdown) => Ok(Json(ApiResponse::success(breakdown.into()))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

// ── Tests ──────────────────────────────────────────────────────
