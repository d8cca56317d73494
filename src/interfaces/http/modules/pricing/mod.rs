//! Pricing quote endpoint

pub mod dto;
pub mod handlers;

use std::sync::Arc;

use crate::application::PricingService;

/// Shared state for pricing and rate-configuration routes.
#[derive(Clone)]
pub struct PricingState {
    pub service: Arc<PricingService>,
}
