//! HTTP API shim over the forecast engine.

pub mod routes;
pub mod server;

pub use server::serve;
