//! Pricing DTOs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Dimensions, QuoteBreakdown, QuoteRequest};

/// Package dimensions in centimeters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DimensionsDto {
    pub length_cm: Decimal,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
}

impl From<DimensionsDto> for Dimensions {
    fn from(d: DimensionsDto) -> Self {
        Self {
            length_cm: d.length_cm,
            width_cm: d.width_cm,
            height_cm: d.height_cm,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteHttpRequest {
    #[validate(length(min = 1, max = 64, message = "tenant_id is required"))]
    pub tenant_id: String,
    #[validate(length(min = 1, max = 64, message = "tier is required"))]
    pub tier: String,
    pub weight_kg: Decimal,
    pub distance_km: Decimal,
    pub dimensions_cm: Option<DimensionsDto>,
    pub declared_value: Option<Decimal>,
    /// Pickup date, `YYYY-MM-DD`
    pub pickup_date: NaiveDate,
    /// Pickup time of day, `HH:MM:SS`
    pub pickup_time: NaiveTime,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub refrigerated: bool,
    #[serde(default)]
    pub special_equipment: bool,
    #[serde(default)]
    pub escort: bool,
}

impl QuoteHttpRequest {
    /// Split into the tenant identifier and the domain request.
    pub fn into_domain(self) -> (String, QuoteRequest) {
        let request = QuoteRequest {
            tier: self.tier,
            weight_kg: self.weight_kg,
            distance_km: self.distance_km,
            dimensions_cm: self.dimensions_cm.map(Into::into),
            declared_value: self.declared_value,
            pickup_date: self.pickup_date,
            pickup_time: self.pickup_time,
            urgent: self.urgent,
            refrigerated: self.refrigerated,
            special_equipment: self.special_equipment,
            escort: self.escort,
        };
        (self.tenant_id, request)
    }
}

/// One triggered surcharge line
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SurchargeLineDto {
    pub name: String,
    pub amount: Decimal,
}

/// Itemized quote breakdown
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub base: Decimal,
    pub distance_charge: Decimal,
    pub weight_charge: Decimal,
    pub surcharges: Vec<SurchargeLineDto>,
    pub insurance: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub currency: String,
    pub minimum_charge_applied: bool,
    pub formatted_total: String,
}

impl From<QuoteBreakdown> for QuoteResponse {
    fn from(bd: QuoteBreakdown) -> Self {
        let formatted_total = bd.format_total();
        Self {
            base: bd.base,
            distance_charge: bd.distance_charge,
            weight_charge: bd.weight_charge,
            surcharges: bd
                .surcharges
                .into_iter()
                .map(|line| SurchargeLineDto {
                    name: line.kind.to_string(),
                    amount: line.amount,
                })
                .collect(),
            insurance: bd.insurance,
            subtotal: bd.subtotal,
            total: bd.total,
            currency: bd.currency,
            minimum_charge_applied: bd.minimum_charge_applied,
            formatted_total,
        }
    }
}
