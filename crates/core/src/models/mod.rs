#![allow(missing_docs)]

//! Shared domain models.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// A single city entry as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    /// Name as it appears in the dataset (storage casing).
    pub name: String,
    /// Population count.
    pub population: u64,
    /// Federal subject (region) the city belongs to.
    pub subject: String,
    /// Federal district the city belongs to.
    pub district: String,
    /// Latitude, kept verbatim from the dataset.
    pub latitude: String,
    /// Longitude, kept verbatim from the dataset.
    pub longitude: String,
}

impl CityRecord {
    /// Lowercased name used for every comparison.
    pub fn normalized_name(&self) -> String {
        normalize(&self.name)
    }

    /// Presentation form of the name with the first letter capitalised.
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    /// Convert back into the on-disk record shape.
    pub fn to_raw(&self) -> RawCity {
        RawCity {
            name: Some(self.name.clone()),
            population: Some(self.population),
            subject: Some(self.subject.clone()),
            district: Some(self.district.clone()),
            coords: Some(RawCoords {
                lat: Some(self.latitude.clone()),
                lon: Some(self.longitude.clone()),
            }),
        }
    }
}

/// City data exactly as it arrives from the dataset, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub coords: Option<RawCoords>,
}

/// Coordinate pair nested under `coords`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCoords {
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
}

impl RawCity {
    /// Check that every required field is present. `index` is the record's
    /// position in the source sequence and is only used for error reporting.
    pub fn validate(self, index: usize) -> Result<CityRecord, CatalogError> {
        let missing = |field: &'static str| CatalogError::MissingField { index, field };

        let name = self.name.ok_or_else(|| missing("name"))?;
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName { index });
        }
        let population = self.population.ok_or_else(|| missing("population"))?;
        let subject = self.subject.ok_or_else(|| missing("subject"))?;
        let district = self.district.ok_or_else(|| missing("district"))?;
        let coords = self.coords.ok_or_else(|| missing("coords"))?;
        let latitude = coords.lat.ok_or_else(|| missing("coords.lat"))?;
        let longitude = coords.lon.ok_or_else(|| missing("coords.lon"))?;

        Ok(CityRecord {
            name: name.trim().to_string(),
            population,
            subject,
            district,
            latitude,
            longitude,
        })
    }
}

/// Lowercase form of a city name used for lookups and letter comparisons.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First letter of a name, lowercased.
pub fn first_letter(name: &str) -> Option<char> {
    name.trim().chars().next().and_then(lower)
}

/// Last letter of a name, lowercased.
pub fn last_letter(name: &str) -> Option<char> {
    name.trim().chars().next_back().and_then(lower)
}

/// Capitalise the first letter for display, leaving the rest untouched.
pub fn display_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower(ch: char) -> Option<char> {
    ch.to_lowercase().next()
}
