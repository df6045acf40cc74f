// Remote data gateway: the read-only sports data API behind a typed,
// cached, retrying client.

pub mod cache;
pub mod client;
pub mod error;

pub use cache::{CacheSettings, ResponseCache};
pub use client::{DataSource, GatewaySettings, HttpGateway};
pub use error::GatewayError;
