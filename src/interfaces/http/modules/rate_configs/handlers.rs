//! Rate configuration REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateRateConfigRequest, RateConfigResponse, UpdateRateConfigRequest};
use crate::interfaces::http::common::{domain_error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::pricing::PricingState;

#[utoipa::path(
    get,
    path = "/api/v1/rate-configs",
    tag = "Rate Configs",
    responses(
        (status = 200, description = "Rate configuration list", body = ApiResponse<Vec<RateConfigResponse>>)
    )
)]
pub async fn list_rate_configs(
    State(state): State<PricingState>,
) -> Result<Json<ApiResponse<Vec<RateConfigResponse>>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.service.list_configs().await {
        Ok(configs) => {
            let responses: Vec<RateConfigResponse> = configs.into_iter().map(Into::into).collect();
            Ok(Json(ApiResponse::success(responses)))
        }
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/rate-configs/{tenant_id}",
    tag = "Rate Configs",
    params(("tenant_id" = String, Path, description = "Tenant identifier")),
    responses(
        (status = 200, description = "Rate configuration", body = ApiResponse<RateConfigResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_rate_config(
    State(state): State<PricingState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<ApiResponse<RateConfigResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.service.get_config(&tenant_id).await {
        Ok(Some(config)) => Ok(Json(ApiResponse::success(config.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "Rate configuration for tenant {} not found",
                tenant_id
            ))),
        )),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/rate-configs",
    tag = "Rate Configs",
    request_body = CreateRateConfigRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<RateConfigResponse>),
        (status = 409, description = "Tenant already configured"),
        (status = 422, description = "Malformed rate tables")
    )
)]
pub async fn create_rate_config(
    State(state): State<PricingState>,
    ValidatedJson(req): ValidatedJson<CreateRateConfigRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RateConfigResponse>>), (StatusCode, Json<ApiResponse<()>>)>
{
    let config = req.into_domain().map_err(|msg| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(msg)),
        )
    })?;

    match state.service.create_config(config).await {
        Ok(saved) => Ok((StatusCode::CREATED, Json(ApiResponse::success(saved.into())))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/rate-configs/{tenant_id}",
    tag = "Rate Configs",
    params(("tenant_id" = String, Path, description = "Tenant identifier")),
    request_body = UpdateRateConfigRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<RateConfigResponse>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Malformed rate tables")
    )
)]
pub async fn update_rate_config(
    State(state): State<PricingState>,
    Path(tenant_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateRateConfigRequest>,
) -> Result<Json<ApiResponse<RateConfigResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let existing = match state.service.get_config(&tenant_id).await {
        Ok(Some(config)) => config,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!(
                    "Rate configuration for tenant {} not found",
                    tenant_id
                ))),
            ));
        }
        Err(e) => return Err(domain_error_response(&e)),
    };

    let updated = req.apply_to(existing).map_err(|msg| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(msg)),
        )
    })?;

    match state.service.update_config(updated.clone()).await {
        Ok(()) => Ok(Json(ApiResponse::success(updated.into()))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/rate-configs/{tenant_id}",
    tag = "Rate Configs",
    params(("tenant_id" = String, Path, description = "Tenant identifier")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_rate_config(
    State(state): State<PricingState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.service.delete_config(&tenant_id).await {
        Ok(()) => Ok(Json(ApiResponse::success(
            "Rate configuration deleted".to_string(),
        ))),
        Err(e) => Err(domain_error_response(&e)),
    }
}

// ── Tests ──────────────────────────────────────────────────────
