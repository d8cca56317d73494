//! Storage implementations for the rate-configuration port

mod memory;
mod seed;

pub use memory::InMemoryStore;
pub use seed::{load_seed_file, parse_seed, SeedError};
