//! In-memory rate-configuration storage

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{DomainError, DomainResult, RateConfig, RateConfigRepository};

/// In-memory store keyed by tenant id.
///
/// `DashMap` gives lock-free reads across request-handling tasks; each lookup
/// hands out a cloned snapshot, so a concurrent configuration update never
/// mutates a calculation in flight.
pub struct InMemoryStore {
    configs: DashMap<String, RateConfig>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateConfigRepository for InMemoryStore {
    async fn find_by_tenant(&self, tenant_id: &str) -> DomainResult<Option<RateConfig>> {
        Ok(self.configs.get(tenant_id).map(|c| c.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<RateConfig>> {
        Ok(self.configs.iter().map(|c| c.clone()).collect())
    }

    async fn save(&self, config: RateConfig) -> DomainResult<RateConfig> {
        if self.configs.contains_key(&config.tenant_id) {
            return Err(DomainError::Conflict(format!(
                "rate configuration for tenant {} already exists",
                config.tenant_id
            )));
        }
        self.configs.insert(config.tenant_id.clone(), config.clone());
        Ok(config)
    }

    async fn update(&self, config: RateConfig) -> DomainResult<()> {
        if !self.configs.contains_key(&config.tenant_id) {
            return Err(DomainError::NotFound {
                entity: "RateConfig",
                field: "tenant_id",
                value: config.tenant_id.clone(),
            });
        }
        self.configs.insert(config.tenant_id.clone(), config);
        Ok(())
    }

    async fn delete(&self, tenant_id: &str) -> DomainResult<()> {
        self.configs
            .remove(tenant_id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "RateConfig",
                field: "tenant_id",
                value: tenant_id.to_string(),
            })?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeightBracket;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn config(tenant: &str) -> RateConfig {
        let mut base_rates = BTreeMap::new();
        base_rates.insert("standard".to_string(), dec!(50));
        RateConfig {
            tenant_id: tenant.to_string(),
            currency: "USD".to_string(),
            base_rates,
            distance_rate_per_km: dec!(5),
            weight_brackets: vec![WeightBracket {
                max_weight_kg: None,
                rate_per_kg: dec!(2),
            }],
            tier_multipliers: BTreeMap::new(),
            surcharges: BTreeMap::new(),
            peak_windows: vec![],
            holidays: vec![],
            insurance_rate: dec!(0),
            minimum_charge: dec!(0),
            decimal_places: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn save_and_find_by_tenant() {
        let store = InMemoryStore::new();
        store.save(config("acme")).await.unwrap();
        let found = store.find_by_tenant("acme").await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_tenant("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_tenant_is_conflict() {
        let store = InMemoryStore::new();
        store.save(config("acme")).await.unwrap();
        let err = store.save(config("acme")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_tenant_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.update(config("ghost")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_replaces_snapshot() {
        let store = InMemoryStore::new();
        store.save(config("acme")).await.unwrap();
        let mut updated = config("acme");
        updated.distance_rate_per_km = dec!(7);
        store.update(updated).await.unwrap();
        let found = store.find_by_tenant("acme").await.unwrap().unwrap();
        assert_eq!(found.distance_rate_per_km, dec!(7));
    }

    #[tokio::test]
    async fn delete_removes_config() {
        let store = InMemoryStore::new();
        store.save(config("acme")).await.unwrap();
        store.delete("acme").await.unwrap();
        assert!(store.find_by_tenant("acme").await.unwrap().is_none());
        let err = store.delete("acme").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_all_lists_every_tenant() {
        let store = InMemoryStore::new();
        store.save(config("acme")).await.unwrap();
        store.save(config("globex")).await.unwrap();
        let all = store.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
