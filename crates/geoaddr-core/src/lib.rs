pub mod address;
pub mod app_config;
pub mod config;
pub mod distance;
pub mod error;
pub mod location;
pub mod resolve;

pub use address::common_address;
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::{distance_km, reference_distance_km, round_to_tenth, ReferencePoint};
pub use error::{ConfigError, LookupError, PersistenceError, ResolutionError};
pub use location::LocationRecord;
pub use resolve::{AccessLogEntry, AccessLogStore, Geocoder, ResolvedAddress, Resolver};
