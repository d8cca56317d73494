//! Tenant rate configuration entity

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::PricingError;

/// Maximum rounding precision accepted in a rate configuration.
pub const MAX_DECIMAL_PLACES: u32 = 9;

/// Condition that can trigger a surcharge.
///
/// `PeakHour` and `Holiday` are derived from the pickup date/time against the
/// configured windows; the remaining conditions are request flags. Surcharge
/// lines are evaluated in the declaration order of this enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    PeakHour,
    Holiday,
    Urgent,
    Refrigeration,
    SpecialEquipment,
    Escort,
}

impl SurchargeKind {
    /// Evaluation order for surcharge rules.
    pub const ALL: [SurchargeKind; 6] = [
        Self::PeakHour,
        Self::Holiday,
        Self::Urgent,
        Self::Refrigeration,
        Self::SpecialEquipment,
        Self::Escort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PeakHour => "peak_hour",
            Self::Holiday => "holiday",
            Self::Urgent => "urgent",
            Self::Refrigeration => "refrigeration",
            Self::SpecialEquipment => "special_equipment",
            Self::Escort => "escort",
        }
    }
}

impl std::fmt::Display for SurchargeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurchargeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peak_hour" => Ok(Self::PeakHour),
            "holiday" => Ok(Self::Holiday),
            "urgent" => Ok(Self::Urgent),
            "refrigeration" => Ok(Self::Refrigeration),
            "special_equipment" => Ok(Self::SpecialEquipment),
            "escort" => Ok(Self::Escort),
            other => Err(format!("unknown surcharge condition: {}", other)),
        }
    }
}

/// Surcharge pricing rule: either a flat amount or a fraction of the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SurchargeAmount {
    Flat(Decimal),
    Percent(Decimal),
}

/// Weight bracket with an upper-inclusive ceiling.
///
/// `max_weight_kg = None` means the bracket is unbounded above. Brackets are
/// stored in ascending ceiling order; together with the selection rule
/// (smallest ceiling ≥ weight) this covers [0, ∞) without overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBracket {
    // Skipped when absent so the TOML serializer never sees a bare None
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight_kg: Option<Decimal>,
    pub rate_per_kg: Decimal,
}

/// Daily peak-hour window, start-inclusive and end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl PeakWindow {
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t < self.end
    }
}

/// Tenant-scoped rate configuration.
///
/// Loaded once per calculation from tenant storage and immutable for the
/// duration of the call. All monetary values are `Decimal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    pub tenant_id: String,
    /// Currency code (ISO 4217), display only
    pub currency: String,
    /// Delivery-tier name → flat starting charge
    pub base_rates: BTreeMap<String, Decimal>,
    pub distance_rate_per_km: Decimal,
    /// Weight brackets in ascending ceiling order
    pub weight_brackets: Vec<WeightBracket>,
    /// Tier name → subtotal multiplier; absent tier means 1
    #[serde(default)]
    pub tier_multipliers: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub surcharges: BTreeMap<SurchargeKind, SurchargeAmount>,
    #[serde(default)]
    pub peak_windows: Vec<PeakWindow>,
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,
    /// Fraction applied to the declared package value
    pub insurance_rate: Decimal,
    /// Floor applied to the final total
    pub minimum_charge: Decimal,
    /// Rounding precision for every monetary field
    pub decimal_places: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl RateConfig {
    /// Validate the rate tables.
    ///
    /// Called when a configuration enters the store and again by the
    /// calculator: a malformed table must fail closed rather than silently
    /// pick an arbitrary bracket.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.base_rates.is_empty() {
            return Err(PricingError::invalid_configuration(
                "base_rates must define at least one tier",
            ));
        }
        for (tier, rate) in &self.base_rates {
            if rate.is_sign_negative() {
                return Err(PricingError::invalid_configuration(format!(
                    "base_rates[{}] is negative",
                    tier
                )));
            }
        }

        if self.distance_rate_per_km.is_sign_negative() {
            return Err(PricingError::invalid_configuration(
                "distance_rate_per_km is negative",
            ));
        }

        self.validate_brackets()?;

        for (tier, m) in &self.tier_multipliers {
            if m.is_sign_negative() {
                return Err(PricingError::invalid_configuration(format!(
                    "tier_multipliers[{}] is negative",
                    tier
                )));
            }
        }

        for (kind, amount) in &self.surcharges {
            let value = match amount {
                SurchargeAmount::Flat(v) | SurchargeAmount::Percent(v) => v,
            };
            if value.is_sign_negative() {
                return Err(PricingError::invalid_configuration(format!(
                    "surcharges[{}] is negative",
                    kind
                )));
            }
        }

        for window in &self.peak_windows {
            if window.start >= window.end {
                return Err(PricingError::invalid_configuration(format!(
                    "peak window {}..{} must start before it ends",
                    window.start, window.end
                )));
            }
        }

        if self.insurance_rate.is_sign_negative() {
            return Err(PricingError::invalid_configuration(
                "insurance_rate is negative",
            ));
        }
        if self.minimum_charge.is_sign_negative() {
            return Err(PricingError::invalid_configuration(
                "minimum_charge is negative",
            ));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(PricingError::invalid_configuration(format!(
                "decimal_places must be at most {}",
                MAX_DECIMAL_PLACES
            )));
        }

        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), PricingError> {
        if self.weight_brackets.is_empty() {
            return Err(PricingError::invalid_configuration(
                "weight_brackets must not be empty",
            ));
        }

        let mut previous_ceiling: Option<Decimal> = None;
        for (i, bracket) in self.weight_brackets.iter().enumerate() {
            if bracket.rate_per_kg.is_sign_negative() {
                return Err(PricingError::invalid_configuration(format!(
                    "weight_brackets[{}].rate_per_kg is negative",
                    i
                )));
            }
            match bracket.max_weight_kg {
                Some(ceiling) => {
                    if ceiling <= Decimal::ZERO {
                        return Err(PricingError::invalid_configuration(format!(
                            "weight_brackets[{}].max_weight_kg must be positive",
                            i
                        )));
                    }
                    if let Some(prev) = previous_ceiling {
                        if ceiling <= prev {
                            return Err(PricingError::invalid_configuration(format!(
                                "weight_brackets[{}] ceiling {} does not increase over {}",
                                i, ceiling, prev
                            )));
                        }
                    }
                    previous_ceiling = Some(ceiling);
                }
                None => {
                    // Unbounded bracket must close the list
                    if i != self.weight_brackets.len() - 1 {
                        return Err(PricingError::invalid_configuration(
                            "unbounded weight bracket must be last",
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Select the bracket for a weight: smallest ceiling ≥ weight
    /// (ceilings are upper-inclusive), falling back to the unbounded bracket.
    pub fn bracket_for_weight(&self, weight_kg: Decimal) -> Option<&WeightBracket> {
        self.weight_brackets
            .iter()
            .find(|b| match b.max_weight_kg {
                Some(ceiling) => weight_kg <= ceiling,
                None => true,
            })
    }

    /// Subtotal multiplier for a tier, defaulting to 1 when not configured.
    pub fn multiplier_for_tier(&self, tier: &str) -> Decimal {
        self.tier_multipliers
            .get(tier)
            .copied()
            .unwrap_or(Decimal::ONE)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_config() -> RateConfig {
        let mut base_rates = BTreeMap::new();
        base_rates.insert("standard".to_string(), dec!(50));
        base_rates.insert("express".to_string(), dec!(90));

        RateConfig {
            tenant_id: "acme".to_string(),
            currency: "USD".to_string(),
            base_rates,
            distance_rate_per_km: dec!(5),
            weight_brackets: vec![
                WeightBracket {
                    max_weight_kg: Some(dec!(5)),
                    rate_per_kg: dec!(2),
                },
                WeightBracket {
                    max_weight_kg: Some(dec!(20)),
                    rate_per_kg: dec!(1.5),
                },
                WeightBracket {
                    max_weight_kg: None,
                    rate_per_kg: dec!(1),
                },
            ],
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

    #[test]
    fn valid_config_passes() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn empty_base_rates_rejected() {
        let mut cfg = sample_config();
        cfg.base_rates.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_base_rate_rejected() {
        let mut cfg = sample_config();
        cfg.base_rates.insert("economy".to_string(), dec!(-1));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_brackets_rejected() {
        let mut cfg = sample_config();
        cfg.weight_brackets.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_increasing_ceilings_rejected() {
        let mut cfg = sample_config();
        cfg.weight_brackets = vec![
            WeightBracket {
                max_weight_kg: Some(dec!(10)),
                rate_per_kg: dec!(2),
            },
            WeightBracket {
                max_weight_kg: Some(dec!(5)),
                rate_per_kg: dec!(1),
            },
        ];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn duplicate_ceilings_rejected() {
        let mut cfg = sample_config();
        cfg.weight_brackets = vec![
            WeightBracket {
                max_weight_kg: Some(dec!(5)),
                rate_per_kg: dec!(2),
            },
            WeightBracket {
                max_weight_kg: Some(dec!(5)),
                rate_per_kg: dec!(1),
            },
        ];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unbounded_bracket_must_be_last() {
        let mut cfg = sample_config();
        cfg.weight_brackets = vec![
            WeightBracket {
                max_weight_kg: None,
                rate_per_kg: dec!(1),
            },
            WeightBracket {
                max_weight_kg: Some(dec!(5)),
                rate_per_kg: dec!(2),
            },
        ];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn negative_bracket_rate_rejected() {
        let mut cfg = sample_config();
        cfg.weight_brackets[0].rate_per_kg = dec!(-2);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_peak_window_rejected() {
        let mut cfg = sample_config();
        cfg.peak_windows = vec![PeakWindow {
            start: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        }];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn excessive_decimal_places_rejected() {
        let mut cfg = sample_config();
        cfg.decimal_places = 12;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bracket_ceiling_is_upper_inclusive() {
        let cfg = sample_config();
        let bracket = cfg.bracket_for_weight(dec!(5)).unwrap();
        assert_eq!(bracket.rate_per_kg, dec!(2));
        let bracket = cfg.bracket_for_weight(dec!(5.001)).unwrap();
        assert_eq!(bracket.rate_per_kg, dec!(1.5));
    }

    #[test]
    fn overweight_falls_into_unbounded_bracket() {
        let cfg = sample_config();
        let bracket = cfg.bracket_for_weight(dec!(500)).unwrap();
        assert_eq!(bracket.max_weight_kg, None);
    }

    #[test]
    fn no_bracket_when_all_bounded_and_exceeded() {
        let mut cfg = sample_config();
        cfg.weight_brackets.pop();
        assert!(cfg.bracket_for_weight(dec!(500)).is_none());
    }

    #[test]
    fn multiplier_defaults_to_one() {
        let mut cfg = sample_config();
        assert_eq!(cfg.multiplier_for_tier("standard"), Decimal::ONE);
        cfg.tier_multipliers
            .insert("express".to_string(), dec!(1.5));
        assert_eq!(cfg.multiplier_for_tier("express"), dec!(1.5));
    }

    #[test]
    fn peak_window_start_inclusive_end_exclusive() {
        let w = PeakWindow {
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert!(w.contains(NaiveTime::from_hms_opt(7, 0, 0).unwrap()));
        assert!(w.contains(NaiveTime::from_hms_opt(8, 59, 0).unwrap()));
        assert!(!w.contains(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert!(!w.contains(NaiveTime::from_hms_opt(6, 59, 59).unwrap()));
    }

    #[test]
    fn surcharge_kind_round_trips_through_str() {
        for kind in SurchargeKind::ALL {
            assert_eq!(kind.as_str().parse::<SurchargeKind>().unwrap(), kind);
        }
        assert!("overnight".parse::<SurchargeKind>().is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = sample_config();
        let encoded = toml::to_string(&cfg).unwrap();
        let decoded: RateConfig = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded.tenant_id, cfg.tenant_id);
        assert_eq!(decoded.base_rates, cfg.base_rates);
        assert_eq!(decoded.weight_brackets, cfg.weight_brackets);
    }
}
