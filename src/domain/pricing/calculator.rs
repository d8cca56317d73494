//! Delivery pricing calculator
//!
//! Pure and total over valid inputs: no I/O, no shared mutable state, safe to
//! invoke concurrently from any number of request-handling tasks. Each call
//! receives an immutable `RateConfig` snapshot and returns a freshly
//! allocated breakdown.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::error::PricingError;
use crate::domain::pricing::model::{QuoteBreakdown, QuoteRequest, SurchargeLine};
use crate::domain::rate_config::{RateConfig, SurchargeAmount, SurchargeKind};

/// Compute an itemized quote for a shipment against a tenant rate table.
///
/// The configuration is re-validated on every call: a malformed rate table
/// fails closed with `InvalidConfiguration` instead of silently picking an
/// arbitrary bracket. Request errors (unknown tier, non-positive weight or
/// distance) are reported as `InvalidRequest` with the offending field.
pub fn calculate(
    request: &QuoteRequest,
    config: &RateConfig,
) -> Result<QuoteBreakdown, PricingError> {
    config.validate()?;
    validate_request(request)?;

    let base = *config.base_rates.get(&request.tier).ok_or_else(|| {
        PricingError::invalid_request("tier", format!("unknown delivery tier: {}", request.tier))
    })?;

    let distance_charge = request.distance_km * config.distance_rate_per_km;

    let bracket = config
        .bracket_for_weight(request.weight_kg)
        .ok_or_else(|| {
            PricingError::invalid_configuration(format!(
                "no weight bracket covers {} kg",
                request.weight_kg
            ))
        })?;
    let weight_charge = bracket.rate_per_kg * request.weight_kg;

    let multiplier = config.multiplier_for_tier(&request.tier);
    let subtotal = (base + distance_charge + weight_charge) * multiplier;

    // Single ordered rule list: one predicate per condition, charge rules
    // applied uniformly in SurchargeKind declaration order.
    let mut surcharges = Vec::new();
    for kind in SurchargeKind::ALL {
        if !condition_holds(kind, request, config) {
            continue;
        }
        let Some(amount) = config.surcharges.get(&kind) else {
            continue;
        };
        let charge = match amount {
            SurchargeAmount::Flat(value) => *value,
            // Additive compounding: every percentage surcharge reads the
            // same pre-surcharge subtotal
            SurchargeAmount::Percent(fraction) => *fraction * subtotal,
        };
        surcharges.push(SurchargeLine {
            kind,
            amount: charge,
        });
    }

    let insurance = match request.declared_value {
        Some(value) => value * config.insurance_rate,
        None => Decimal::ZERO,
    };

    let surcharge_sum: Decimal = surcharges.iter().map(|line| line.amount).sum();
    let total_before_floor = subtotal + surcharge_sum + insurance;
    // The floor comparison uses unrounded values; rounding happens per field
    // at the very end.
    let minimum_charge_applied = total_before_floor < config.minimum_charge;
    let total = total_before_floor.max(config.minimum_charge);

    let dp = config.decimal_places;
    Ok(QuoteBreakdown {
        base: round_money(base, dp),
        distance_charge: round_money(distance_charge, dp),
        weight_charge: round_money(weight_charge, dp),
        surcharges: surcharges
            .into_iter()
            .map(|line| SurchargeLine {
                kind: line.kind,
                amount: round_money(line.amount, dp),
            })
            .collect(),
        insurance: round_money(insurance, dp),
        subtotal: round_money(subtotal, dp),
        total: round_money(total, dp),
        currency: config.currency.clone(),
        minimum_charge_applied,
    })
}

/// Whether a surcharge condition holds for this request.
///
/// Peak-hour and holiday are derived from the pickup date/time against the
/// configured windows (start-inclusive, end-exclusive); the rest are flags.
fn condition_holds(kind: SurchargeKind, request: &QuoteRequest, config: &RateConfig) -> bool {
    match kind {
        SurchargeKind::PeakHour => config
            .peak_windows
            .iter()
            .any(|w| w.contains(request.pickup_time)),
        SurchargeKind::Holiday => config.holidays.contains(&request.pickup_date),
        SurchargeKind::Urgent => request.urgent,
        SurchargeKind::Refrigeration => request.refrigerated,
        SurchargeKind::SpecialEquipment => request.special_equipment,
        SurchargeKind::Escort => request.escort,
    }
}

fn validate_request(request: &QuoteRequest) -> Result<(), PricingError> {
    if request.weight_kg <= Decimal::ZERO {
        return Err(PricingError::invalid_request(
            "weight_kg",
            "must be positive",
        ));
    }
    if request.distance_km <= Decimal::ZERO {
        return Err(PricingError::invalid_request(
            "distance_km",
            "must be positive",
        ));
    }
    if let Some(value) = request.declared_value {
        if value.is_sign_negative() {
            return Err(PricingError::invalid_request(
                "declared_value",
                "must not be negative",
            ));
        }
    }
    if let Some(dims) = &request.dimensions_cm {
        if dims.length_cm <= Decimal::ZERO
            || dims.width_cm <= Decimal::ZERO
            || dims.height_cm <= Decimal::ZERO
        {
            return Err(PricingError::invalid_request(
                "dimensions_cm",
                "every dimension must be positive",
            ));
        }
    }
    Ok(())
}

/// Round half-up to the configured number of decimal places.
///
/// The result is rescaled so every monetary field serializes with exactly
/// `decimal_places` fractional digits.
fn round_money(value: Decimal, decimal_places: u32) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimal_places);
    rounded
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate_config::{PeakWindow, WeightBracket};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

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
                    rate_per_kg: dec!(3),
                },
                WeightBracket {
                    max_weight_kg: None,
                    rate_per_kg: dec!(4),
                },
            ],
            tier_multipliers: BTreeMap::new(),
            surcharges: BTreeMap::new(),
            peak_windows: vec![],
            holidays: vec![],
            insurance_rate: dec!(0),
            minimum_charge: dec!(80),
            decimal_places: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_request() -> QuoteRequest {
        QuoteRequest {
            tier: "standard".to_string(),
            weight_kg: dec!(3),
            distance_km: dec!(10),
            dimensions_cm: None,
            declared_value: None,
            pickup_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            pickup_time: NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
            urgent: false,
            refrigerated: false,
            special_equipment: false,
            escort: false,
        }
    }

    #[test]
    fn worked_example_without_floor() {
        // base 50 + distance 10*5 + weight 3*2 = 106, multiplier 1, floor 80
        let bd = calculate(&sample_request(), &sample_config()).unwrap();
        assert_eq!(bd.base, dec!(50.00));
        assert_eq!(bd.distance_charge, dec!(50.00));
        assert_eq!(bd.weight_charge, dec!(6.00));
        assert_eq!(bd.subtotal, dec!(106.00));
        assert_eq!(bd.total, dec!(106.00));
        assert!(!bd.minimum_charge_applied);
        assert!(bd.surcharges.is_empty());
    }

    #[test]
    fn minimum_charge_floor_applies() {
        let mut cfg = sample_config();
        cfg.minimum_charge = dec!(150);
        let bd = calculate(&sample_request(), &cfg).unwrap();
        assert_eq!(bd.subtotal, dec!(106.00));
        assert_eq!(bd.total, dec!(150.00));
        assert!(bd.minimum_charge_applied);
    }

    #[test]
    fn unknown_tier_is_invalid_request() {
        let mut req = sample_request();
        req.tier = "premium".to_string();
        let err = calculate(&req, &sample_config()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidRequest { field: "tier", .. }
        ));
    }

    #[test]
    fn non_positive_weight_is_invalid_request() {
        let mut req = sample_request();
        req.weight_kg = dec!(0);
        let err = calculate(&req, &sample_config()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidRequest {
                field: "weight_kg",
                ..
            }
        ));
    }

    #[test]
    fn non_positive_distance_is_invalid_request() {
        let mut req = sample_request();
        req.distance_km = dec!(-1);
        let err = calculate(&req, &sample_config()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidRequest {
                field: "distance_km",
                ..
            }
        ));
    }

    #[test]
    fn negative_declared_value_is_invalid_request() {
        let mut req = sample_request();
        req.declared_value = Some(dec!(-10));
        let err = calculate(&req, &sample_config()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidRequest {
                field: "declared_value",
                ..
            }
        ));
    }

    #[test]
    fn weight_at_bracket_ceiling_uses_lower_bracket() {
        let mut req = sample_request();
        req.weight_kg = dec!(5);
        let bd = calculate(&req, &sample_config()).unwrap();
        // 5 kg * 2/kg, not 5 kg * 3/kg
        assert_eq!(bd.weight_charge, dec!(10.00));
    }

    #[test]
    fn weight_above_ceiling_moves_to_next_bracket() {
        let mut req = sample_request();
        req.weight_kg = dec!(5.5);
        let bd = calculate(&req, &sample_config()).unwrap();
        assert_eq!(bd.weight_charge, dec!(16.50));
    }

    #[test]
    fn overweight_without_unbounded_bracket_is_invalid_configuration() {
        let mut cfg = sample_config();
        cfg.weight_brackets.pop();
        let mut req = sample_request();
        req.weight_kg = dec!(100);
        let err = calculate(&req, &cfg).unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
    }

    #[test]
    fn malformed_brackets_fail_closed() {
        let mut cfg = sample_config();
        cfg.weight_brackets[1].max_weight_kg = Some(dec!(4));
        let err = calculate(&sample_request(), &cfg).unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
    }

    #[test]
    fn tier_multiplier_scales_subtotal() {
        let mut cfg = sample_config();
        cfg.tier_multipliers.insert("express".to_string(), dec!(1.5));
        let mut req = sample_request();
        req.tier = "express".to_string();
        let bd = calculate(&req, &cfg).unwrap();
        // (90 + 50 + 6) * 1.5 = 219
        assert_eq!(bd.subtotal, dec!(219.00));
        assert_eq!(bd.total, dec!(219.00));
    }

    #[test]
    fn flat_and_percent_surcharges_are_additive() {
        let mut cfg = sample_config();
        cfg.surcharges
            .insert(SurchargeKind::Urgent, SurchargeAmount::Flat(dec!(25)));
        cfg.surcharges.insert(
            SurchargeKind::Refrigeration,
            SurchargeAmount::Percent(dec!(0.10)),
        );
        let mut req = sample_request();
        req.urgent = true;
        req.refrigerated = true;
        let bd = calculate(&req, &cfg).unwrap();
        // subtotal 106; urgent flat 25; refrigeration 10% of 106 = 10.60
        assert_eq!(bd.surcharges.len(), 2);
        assert_eq!(bd.surcharges[0].kind, SurchargeKind::Urgent);
        assert_eq!(bd.surcharges[0].amount, dec!(25.00));
        assert_eq!(bd.surcharges[1].kind, SurchargeKind::Refrigeration);
        assert_eq!(bd.surcharges[1].amount, dec!(10.60));
        assert_eq!(bd.total, dec!(141.60));
    }

    #[test]
    fn flag_without_configured_surcharge_adds_nothing() {
        let mut req = sample_request();
        req.escort = true;
        let bd = calculate(&req, &sample_config()).unwrap();
        assert!(bd.surcharges.is_empty());
    }

    #[test]
    fn peak_window_boundaries() {
        let mut cfg = sample_config();
        cfg.peak_windows = vec![PeakWindow {
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        }];
        cfg.surcharges
            .insert(SurchargeKind::PeakHour, SurchargeAmount::Flat(dec!(15)));

        // One minute before the window ends: surcharge applies
        let mut req = sample_request();
        req.pickup_time = NaiveTime::from_hms_opt(8, 59, 0).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.surcharges.len(), 1);
        assert_eq!(bd.surcharges[0].kind, SurchargeKind::PeakHour);

        // Window start is inclusive
        req.pickup_time = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.surcharges.len(), 1);

        // Window end is exclusive
        req.pickup_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert!(bd.surcharges.is_empty());

        // One minute after
        req.pickup_time = NaiveTime::from_hms_opt(9, 1, 0).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert!(bd.surcharges.is_empty());
    }

    #[test]
    fn holiday_surcharge_is_derived_from_pickup_date() {
        let mut cfg = sample_config();
        cfg.holidays = vec![NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()];
        cfg.surcharges
            .insert(SurchargeKind::Holiday, SurchargeAmount::Percent(dec!(0.2)));

        let mut req = sample_request();
        req.pickup_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.surcharges.len(), 1);
        assert_eq!(bd.surcharges[0].amount, dec!(21.20));

        req.pickup_date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let bd = calculate(&req, &cfg).unwrap();
        assert!(bd.surcharges.is_empty());
    }

    #[test]
    fn insurance_from_declared_value() {
        let mut cfg = sample_config();
        cfg.insurance_rate = dec!(0.01);
        let mut req = sample_request();
        req.declared_value = Some(dec!(1000));
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.insurance, dec!(10.00));
        assert_eq!(bd.total, dec!(116.00));
    }

    #[test]
    fn missing_declared_value_means_no_insurance() {
        let mut cfg = sample_config();
        cfg.insurance_rate = dec!(0.01);
        let bd = calculate(&sample_request(), &cfg).unwrap();
        assert_eq!(bd.insurance, dec!(0.00));
    }

    #[test]
    fn rounding_is_half_up() {
        let mut cfg = sample_config();
        let mut req = sample_request();
        req.distance_km = dec!(1);

        // Exact midpoint rounds away from zero
        cfg.distance_rate_per_km = dec!(5.005);
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.distance_charge, dec!(5.01));

        // Below the midpoint rounds down
        cfg.distance_rate_per_km = dec!(5.0049);
        let bd = calculate(&req, &cfg).unwrap();
        assert_eq!(bd.distance_charge, dec!(5.00));
    }

    #[test]
    fn monetary_fields_carry_configured_scale() {
        let bd = calculate(&sample_request(), &sample_config()).unwrap();
        assert_eq!(bd.total.to_string(), "106.00");
        assert_eq!(bd.base.to_string(), "50.00");
        assert_eq!(bd.insurance.to_string(), "0.00");
    }

    #[test]
    fn total_is_monotonic_in_weight() {
        let cfg = sample_config();
        let mut previous = Decimal::ZERO;
        for tenths in 1..200 {
            let mut req = sample_request();
            req.weight_kg = Decimal::new(tenths, 1);
            let bd = calculate(&req, &cfg).unwrap();
            assert!(
                bd.total >= previous,
                "total decreased at weight {}",
                req.weight_kg
            );
            previous = bd.total;
        }
    }

    #[test]
    fn total_is_monotonic_in_distance() {
        let cfg = sample_config();
        let mut previous = Decimal::ZERO;
        for km in 1..150 {
            let mut req = sample_request();
            req.distance_km = Decimal::from(km);
            let bd = calculate(&req, &cfg).unwrap();
            assert!(
                bd.total >= previous,
                "total decreased at distance {}",
                req.distance_km
            );
            previous = bd.total;
        }
    }

    #[test]
    fn total_never_below_minimum_charge() {
        let mut cfg = sample_config();
        cfg.minimum_charge = dec!(500);
        for km in 1..50 {
            let mut req = sample_request();
            req.distance_km = Decimal::from(km);
            let bd = calculate(&req, &cfg).unwrap();
            assert!(bd.total >= cfg.minimum_charge);
        }
    }
}
