use serde::{Deserialize, Serialize};

/// One candidate geocoding hit for a postal code.
///
/// Coordinates are already parsed; the geocoder rejects non-finite values
/// before a record is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub prefecture: String,
    pub city: String,
    pub town: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl LocationRecord {
    pub fn new(
        prefecture: impl Into<String>,
        city: impl Into<String>,
        town: impl Into<String>,
        longitude: f64,
        latitude: f64,
    ) -> Self {
        Self {
            prefecture: prefecture.into(),
            city: city.into(),
            town: town.into(),
            longitude,
            latitude,
        }
    }

    /// `prefecture + city + town` with no separators.
    #[must_use]
    pub fn full_address(&self) -> String {
        let mut out =
            String::with_capacity(self.prefecture.len() + self.city.len() + self.town.len());
        out.push_str(&self.prefecture);
        out.push_str(&self.city);
        out.push_str(&self.town);
        out
    }
}
