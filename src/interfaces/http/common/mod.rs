//! Shared HTTP response types

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard response envelope.
///
/// Every REST endpoint returns data in this wrapper. On success:
/// `{"success": true, "data": {...}}`; on failure:
/// `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Error description, `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error to its HTTP status and envelope.
///
/// `InvalidRequest`/`InvalidConfiguration` both surface as 422; the error
/// string carries the kind so callers and operators can tell a bad request
/// from a broken tenant rate table.
pub fn domain_error_response(err: &DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    let status = match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) | DomainError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricingError;

    #[test]
    fn envelope_success_shape() {
        let resp = ApiResponse::success(42);
        assert!(resp.success);
        assert_eq!(resp.data, Some(42));
        assert!(resp.error.is_none());
    }

    #[test]
    fn success_envelope_omits_error_field() {
        let json = serde_json::to_string(&ApiResponse::success("ok")).unwrap();
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = DomainError::NotFound {
            entity: "RateConfig",
            field: "tenant_id",
            value: "acme".to_string(),
        };
        let (status, _) = domain_error_response(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn pricing_errors_map_to_422() {
        let err: DomainError = PricingError::invalid_request("tier", "unknown").into();
        let (status, body) = domain_error_response(&err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.0.error.unwrap().starts_with("InvalidRequest"));
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = DomainError::Conflict("duplicate".to_string());
        let (status, _) = domain_error_response(&err);
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
