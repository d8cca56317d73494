//! Infrastructure layer - external concerns

pub mod storage;

pub use storage::{load_seed_file, parse_seed, InMemoryStore, SeedError};
