//! HeartRails Geo API response types.
//!
//! `searchByPostal` answers `{"response": {"location": [...]}}` on a hit and
//! `{"response": {"error": "..."}}` when the postal code is unknown.
//! Coordinates arrive as decimal strings: `x` is longitude, `y` latitude.

use geoaddr_core::LocationRecord;
use serde::Deserialize;

use crate::error::GeocoderError;

#[derive(Debug, Deserialize)]
pub struct GeoApiResponse {
    pub response: GeoApiBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeoApiBody {
    #[serde(default)]
    pub location: Vec<RawLocation>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One `location` entry exactly as the provider sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub prefecture: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub city_kana: Option<String>,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub town_kana: Option<String>,
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub postal: Option<String>,
}

impl RawLocation {
    /// Parse coordinates and build a [`LocationRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`GeocoderError::InvalidCoordinate`] if `x` or `y` is not a
    /// finite decimal number.
    pub fn into_record(self) -> Result<LocationRecord, GeocoderError> {
        let longitude = parse_coordinate("x", &self.x)?;
        let latitude = parse_coordinate("y", &self.y)?;
        Ok(LocationRecord::new(
            self.prefecture,
            self.city,
            self.town,
            longitude,
            latitude,
        ))
    }
}

fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, GeocoderError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocoderError::InvalidCoordinate {
            field,
            value: raw.to_owned(),
        })
}
