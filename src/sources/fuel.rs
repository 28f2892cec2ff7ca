//! Fuel price source.
//!
//! There is no live API here; state-level averages from configuration act as
//! the estimate tier and the default price covers unknown states. Kept as a
//! source client so the caching and provenance treatment matches the other
//! domains.

use crate::config::CostConfig;
use crate::sources::types::{FuelReading, Provenance};

pub struct FuelClient {
    regional: std::collections::HashMap<String, f64>,
    default_price: f64,
}

impl FuelClient {
    pub fn new(costs: &CostConfig) -> Self {
        Self {
            regional: costs.regional_gas_prices.clone(),
            default_price: costs.default_gas_price_per_gallon,
        }
    }

    pub fn fetch(&self, state: Option<&str>) -> FuelReading {
        if let Some(price) = state.and_then(|s| self.regional.get(s)) {
            return FuelReading {
                price_per_gallon: *price,
                provenance: Provenance::Estimate,
            };
        }
        FuelReading {
            price_per_gallon: self.default_price,
            provenance: Provenance::Default,
        }
    }
}
