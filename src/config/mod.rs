/// Database configuration and connection management
pub mod database;

/// Initial data seeding from config.toml
pub mod seed;
