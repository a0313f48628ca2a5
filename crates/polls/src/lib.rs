//! Questions, choices and vote counting exposed through a small REST resource layer.

pub mod config;
pub mod error;
pub mod model;
pub mod resources;
pub mod store;
pub mod telemetry;
