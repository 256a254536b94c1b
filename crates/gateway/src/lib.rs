pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
