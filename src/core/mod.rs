pub mod config;
pub mod export;
pub mod query;
pub mod registry;
pub mod token;
