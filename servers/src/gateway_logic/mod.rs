pub mod config;
pub mod errors;
pub mod logger;
pub mod metrics;
pub mod routes;
pub mod state;
