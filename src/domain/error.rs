//! Domain errors

use thiserror::Error;

/// Errors produced by the pricing calculator.
///
/// Both variants are deterministic given the same inputs and map to a 422
/// at the HTTP boundary. `InvalidRequest` is a caller error and names the
/// offending field; `InvalidConfiguration` is a tenant configuration error
/// and is surfaced distinctly so operators fix the rate table instead of
/// retrying.
#[derive(Debug, Clone, Error)]
pub enum PricingError {
    #[error("InvalidRequest: {field}: {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    #[error("InvalidConfiguration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl PricingError {
    pub fn invalid_request(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Stable error-kind discriminant used in responses and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "InvalidRequest",
            Self::InvalidConfiguration { .. } => "InvalidConfiguration",
        }
    }
}

/// Service-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── Tests ──────────────────────────────────────────────────────
