pub mod analysis;
pub mod config;
pub mod cors;
pub mod error;
pub mod model_api;
pub mod routes;
pub mod upload;
