//! Pricing request and quote entities

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::rate_config::SurchargeKind;

/// Package dimensions, carried through for auditing but not priced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
}

/// A single pricing calculation request.
///
/// Transient: created per call and discarded with the result.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Delivery tier name, must be present in the tenant's `base_rates`
    pub tier: String,
    pub weight_kg: Decimal,
    pub distance_km: Decimal,
    pub dimensions_cm: Option<Dimensions>,
    pub declared_value: Option<Decimal>,
    pub pickup_date: NaiveDate,
    pub pickup_time: NaiveTime,
    pub urgent: bool,
    pub refrigerated: bool,
    pub special_equipment: bool,
    pub escort: bool,
}

/// One triggered surcharge line in a quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub kind: SurchargeKind,
    pub amount: Decimal,
}

/// Itemized charge breakdown.
///
/// Every monetary field is rounded half-up to the configured decimal places.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    pub base: Decimal,
    pub distance_charge: Decimal,
    pub weight_charge: Decimal,
    pub surcharges: Vec<SurchargeLine>,
    pub insurance: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub minimum_charge_applied: bool,
}

impl QuoteBreakdown {
    /// Format the total as a human-readable string
    pub fn format_total(&self) -> String {
        format!("{} {}", self.total, self.currency)
    }
}

// ── Tests ──────────────────────────────────────────────────────
