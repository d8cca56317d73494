//! Rate configuration repository interface

use async_trait::async_trait;

use super::model::RateConfig;
use crate::domain::DomainResult;

/// Tenant rate-configuration storage port.
///
/// The calculator never touches storage itself; callers fetch a fully
/// materialized `RateConfig` snapshot through this trait and pass it in.
#[async_trait]
pub trait RateConfigRepository: Send + Sync {
    async fn find_by_tenant(&self, tenant_id: &str) -> DomainResult<Option<RateConfig>>;
    async fn find_all(&self) -> DomainResult<Vec<RateConfig>>;
    async fn save(&self, config: RateConfig) -> DomainResult<RateConfig>;
    async fn update(&self, config: RateConfig) -> DomainResult<()>;
    async fn delete(&self, tenant_id: &str) -> DomainResult<()>;
}
