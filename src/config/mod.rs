/// Application settings loaded from environment variables
pub mod app;

/// Remote store connection and table creation
pub mod database;

/// Session seat seeding from config.toml
pub mod sessions;
