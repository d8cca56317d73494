//! # Delivery Pricing Service
//!
//! Multi-tenant delivery/transportation pricing: a pure, deterministic
//! calculator wrapped in a small REST service.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, the pricing calculator and the
//!   rate-configuration storage port
//! - **application**: The pricing service fronting storage and the calculator
//! - **infrastructure**: External concerns (in-memory tenant store, seed files)
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Graceful shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export storage types for easy access
pub use infrastructure::{load_seed_file, InMemoryStore};

// Re-export API router and the pricing service
pub use application::PricingService;
pub use interfaces::create_api_router;
