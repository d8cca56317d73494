//! Rate configuration DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{PeakWindow, RateConfig, SurchargeAmount, SurchargeKind, WeightBracket};

/// Weight bracket; `max_weight_kg` absent means unbounded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct WeightBracketDto {
    pub max_weight_kg: Option<Decimal>,
    pub rate_per_kg: Decimal,
}

impl From<WeightBracketDto> for WeightBracket {
    fn from(b: WeightBracketDto) -> Self {
        Self {
            max_weight_kg: b.max_weight_kg,
            rate_per_kg: b.rate_per_kg,
        }
    }
}

impl From<WeightBracket> for WeightBracketDto {
    fn from(b: WeightBracket) -> Self {
        Self {
            max_weight_kg: b.max_weight_kg,
            rate_per_kg: b.rate_per_kg,
        }
    }
}

/// Daily peak window, start-inclusive and end-exclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct PeakWindowDto {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl From<PeakWindowDto> for PeakWindow {
    fn from(w: PeakWindowDto) -> Self {
        Self {
            start: w.start,
            end: w.end,
        }
    }
}

impl From<PeakWindow> for PeakWindowDto {
    fn from(w: PeakWindow) -> Self {
        Self {
            start: w.start,
            end: w.end,
        }
    }
}

/// Flat amount or fraction of the subtotal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SurchargeAmountDto {
    Flat(Decimal),
    Percent(Decimal),
}

impl From<SurchargeAmountDto> for SurchargeAmount {
    fn from(a: SurchargeAmountDto) -> Self {
        match a {
            SurchargeAmountDto::Flat(v) => Self::Flat(v),
            SurchargeAmountDto::Percent(v) => Self::Percent(v),
        }
    }
}

impl From<SurchargeAmount> for SurchargeAmountDto {
    fn from(a: SurchargeAmount) -> Self {
        match a {
            SurchargeAmount::Flat(v) => Self::Flat(v),
            SurchargeAmount::Percent(v) => Self::Percent(v),
        }
    }
}

/// Tenant rate configuration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RateConfigResponse {
    pub tenant_id: String,
    pub currency: String,
    pub base_rates: BTreeMap<String, Decimal>,
    pub distance_rate_per_km: Decimal,
    pub weight_brackets: Vec<WeightBracketDto>,
    pub tier_multipliers: BTreeMap<String, Decimal>,
    pub surcharges: BTreeMap<String, SurchargeAmountDto>,
    pub peak_windows: Vec<PeakWindowDto>,
    pub holidays: Vec<NaiveDate>,
    pub insurance_rate: Decimal,
    pub minimum_charge: Decimal,
    pub decimal_places: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RateConfig> for RateConfigResponse {
    fn from(c: RateConfig) -> Self {
        Self {
            tenant_id: c.tenant_id,
            currency: c.currency,
            base_rates: c.base_rates,
            distance_rate_per_km: c.distance_rate_per_km,
            weight_brackets: c.weight_brackets.into_iter().map(Into::into).collect(),
            tier_multipliers: c.tier_multipliers,
            surcharges: c
                .surcharges
                .into_iter()
                .map(|(kind, amount)| (kind.to_string(), amount.into()))
                .collect(),
            peak_windows: c.peak_windows.into_iter().map(Into::into).collect(),
            holidays: c.holidays,
            insurance_rate: c.insurance_rate,
            minimum_charge: c.minimum_charge,
            decimal_places: c.decimal_places,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRateConfigRequest {
    #[validate(length(min = 1, max = 64, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(equal = 3, message = "currency must be an ISO 4217 code"))]
    pub currency: String,
    pub base_rates: BTreeMap<String, Decimal>,
    pub distance_rate_per_km: Decimal,
    pub weight_brackets: Vec<WeightBracketDto>,
    #[serde(default)]
    pub tier_multipliers: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub surcharges: BTreeMap<String, SurchargeAmountDto>,
    #[serde(default)]
    pub peak_windows: Vec<PeakWindowDto>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    pub insurance_rate: Decimal,
    pub minimum_charge: Decimal,
    pub decimal_places: u32,
}

impl CreateRateConfigRequest {
    /// Build the domain configuration; surcharge keys must name known
    /// conditions.
    pub fn into_domain(self) -> Result<RateConfig, String> {
        let now = Utc::now();
        Ok(RateConfig {
            tenant_id: self.tenant_id,
            currency: self.currency,
            base_rates: self.base_rates,
            distance_rate_per_km: self.distance_rate_per_km,
            weight_brackets: self.weight_brackets.into_iter().map(Into::into).collect(),
            tier_multipliers: self.tier_multipliers,
            surcharges: parse_surcharges(self.surcharges)?,
            peak_windows: self.peak_windows.into_iter().map(Into::into).collect(),
            holidays: self.holidays,
            insurance_rate: self.insurance_rate,
            minimum_charge: self.minimum_charge,
            decimal_places: self.decimal_places,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRateConfigRequest {
    pub currency: Option<String>,
    pub base_rates: Option<BTreeMap<String, Decimal>>,
    pub distance_rate_per_km: Option<Decimal>,
    pub weight_brackets: Option<Vec<WeightBracketDto>>,
    pub tier_multipliers: Option<BTreeMap<String, Decimal>>,
    pub surcharges: Option<BTreeMap<String, SurchargeAmountDto>>,
    pub peak_windows: Option<Vec<PeakWindowDto>>,
    pub holidays: Option<Vec<NaiveDate>>,
    pub insurance_rate: Option<Decimal>,
    pub minimum_charge: Option<Decimal>,
    pub decimal_places: Option<u32>,
}

impl UpdateRateConfigRequest {
    /// Merge the partial update over an existing configuration.
    pub fn apply_to(self, existing: RateConfig) -> Result<RateConfig, String> {
        let surcharges = match self.surcharges {
            Some(map) => parse_surcharges(map)?,
            None => existing.surcharges,
        };
        Ok(RateConfig {
            tenant_id: existing.tenant_id,
            currency: self.currency.unwrap_or(existing.currency),
            base_rates: self.base_rates.unwrap_or(existing.base_rates),
            distance_rate_per_km: self
                .distance_rate_per_km
                .unwrap_or(existing.distance_rate_per_km),
            weight_brackets: self
                .weight_brackets
                .map(|brackets| brackets.into_iter().map(Into::into).collect())
                .unwrap_or(existing.weight_brackets),
            tier_multipliers: self.tier_multipliers.unwrap_or(existing.tier_multipliers),
            surcharges,
            peak_windows: self
                .peak_windows
                .map(|windows| windows.into_iter().map(Into::into).collect())
                .unwrap_or(existing.peak_windows),
            holidays: self.holidays.unwrap_or(existing.holidays),
            insurance_rate: self.insurance_rate.unwrap_or(existing.insurance_rate),
            minimum_charge: self.minimum_charge.unwrap_or(existing.minimum_charge),
            decimal_places: self.decimal_places.unwrap_or(existing.decimal_places),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        })
    }
}

fn parse_surcharges(
    map: BTreeMap<String, SurchargeAmountDto>,
) -> Result<BTreeMap<SurchargeKind, SurchargeAmount>, String> {
    map.into_iter()
        .map(|(name, amount)| {
            let kind: SurchargeKind = name.parse()?;
            Ok((kind, amount.into()))
        })
        .collect()
}
