//! Pricing service: tenant rate-configuration lookup plus quote calculation

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{
    calculate, DomainError, DomainResult, QuoteBreakdown, QuoteRequest, RateConfig,
    RateConfigRepository,
};

/// Service fronting tenant rate-configuration storage and the calculator.
pub struct PricingService {
    repository: Arc<dyn RateConfigRepository>,
}

impl PricingService {
    pub fn new(repository: Arc<dyn RateConfigRepository>) -> Self {
        Self { repository }
    }

    /// Compute a quote for a tenant.
    ///
    /// Fetches the tenant's rate configuration once and passes the immutable
    /// snapshot to the pure calculator; there is no other state involved.
    pub async fn quote(
        &self,
        tenant_id: &str,
        request: QuoteRequest,
    ) -> DomainResult<QuoteBreakdown> {
        let config = self
            .repository
            .find_by_tenant(tenant_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "RateConfig",
                field: "tenant_id",
                value: tenant_id.to_string(),
            })?;

        let breakdown = match calculate(&request, &config) {
            Ok(breakdown) => breakdown,
            Err(e) => {
                metrics::counter!("pricing_quotes_total", "outcome" => e.kind()).increment(1);
                return Err(e.into());
            }
        };

        metrics::counter!("pricing_quotes_total", "outcome" => "ok").increment(1);
        info!(
            tenant_id,
            tier = request.tier.as_str(),
            total = %breakdown.total,
            currency = breakdown.currency.as_str(),
            minimum_charge_applied = breakdown.minimum_charge_applied,
            "Quote calculated"
        );

        Ok(breakdown)
    }

    pub async fn get_config(&self, tenant_id: &str) -> DomainResult<Option<RateConfig>> {
        self.repository.find_by_tenant(tenant_id).await
    }

    pub async fn list_configs(&self) -> DomainResult<Vec<RateConfig>> {
        self.repository.find_all().await
    }

    /// Store a new tenant configuration, validating the rate tables first so
    /// malformed configuration fails at load time rather than at quote time.
    pub async fn create_config(&self, mut config: RateConfig) -> DomainResult<RateConfig> {
        config.validate()?;
        let now = Utc::now();
        config.created_at = now;
        config.updated_at = now;
        let saved = self.repository.save(config).await?;
        info!(tenant_id = saved.tenant_id.as_str(), "Rate configuration created");
        Ok(saved)
    }

    pub async fn update_config(&self, mut config: RateConfig) -> DomainResult<()> {
        config.validate()?;
        config.updated_at = Utc::now();
        self.repository.update(config).await
    }

    pub async fn delete_config(&self, tenant_id: &str) -> DomainResult<()> {
        self.repository.delete(tenant_id).await
    }
}
