//! Tenant rate configuration: model, validation and storage port

pub mod model;
pub mod repository;

pub use model::{
    PeakWindow, RateConfig, SurchargeAmount, SurchargeKind, WeightBracket, MAX_DECIMAL_PLACES,
};
pub use repository::RateConfigRepository;
