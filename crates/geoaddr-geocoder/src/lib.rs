pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::{GeocoderConfig, HeartRailsClient};
pub use error::GeocoderError;
pub use types::{GeoApiResponse, RawLocation};
