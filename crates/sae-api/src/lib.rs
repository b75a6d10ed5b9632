// sae-api: Async Rust client for the Smart Appliance Enabler REST API

pub mod client;
pub mod endpoint;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{ApplianceClient, ClientConfig};
pub use endpoint::ApiEndpoint;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::*;
