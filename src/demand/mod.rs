//! Demand modeling: event-driven boosts and composed multipliers.

pub mod boost;
pub mod composer;

use serde::Serialize;

/// The two sides of the marketplace a forecast can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Rideshare,
    Delivery,
}
