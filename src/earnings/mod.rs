//! Per-service hourly earnings models.

pub mod deadtime;
pub mod delivery;
pub mod rideshare;
pub mod types;

pub use delivery::DeliveryModel;
pub use rideshare::RideshareModel;
pub use types::{Prediction, Service, SlotInputs};
