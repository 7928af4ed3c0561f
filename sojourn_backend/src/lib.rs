pub mod api;
pub mod cli;
pub mod community;
pub mod config;
pub mod repository;
pub mod telemetry;
pub mod utils;
