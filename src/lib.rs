//! Gigcast Library
//!
//! Hourly gig-economy earnings estimation: resolves a location, pulls
//! weather, events, traffic, and fuel data through per-source TTL caches,
//! and produces net hourly earnings ranges for rideshare and food delivery
//! services. This module exposes the engine components for use by tests
//! and other consumers.

pub mod cache;
pub mod config;
pub mod demand;
pub mod earnings;
pub mod engine;
pub mod error;
pub mod geo;
pub mod logging;
pub mod sources;
pub mod timeslot;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use engine::{EstimateEngine, Forecast};
pub use error::{EngineError, Result};
