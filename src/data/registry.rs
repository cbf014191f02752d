//! City registry loaded from the remote `LocationData.csv`.

use serde::Deserialize;
use tracing::info;

use crate::data::{fetch, DataSourceConfig};
use crate::error::{EtError, Result};

#[derive(Debug, Deserialize)]
struct LocationRow {
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// A selectable city with its coordinates.
///
/// `key` is the underscore form used in file names; `display_name`
/// swaps underscores for spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub key: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRecord {
    /// Human-readable city name.
    pub fn display_name(&self) -> String {
        self.key.replace('_', " ")
    }
}

/// Fetch and parse the city registry.
///
/// The registry is required for any session; both fetch and parse
/// failures surface as [`EtError::DataUnavailable`].
pub fn load_registry(config: &DataSourceConfig) -> Result<Vec<LocationRecord>> {
    let body = fetch(config, &config.csv_url("LocationData"))?;
    let records = parse_registry(body.as_bytes())?;
    info!(cities = records.len(), "loaded location registry");
    Ok(records)
}

fn parse_registry(data: &[u8]) -> Result<Vec<LocationRecord>> {
    let mut reader = csv::Reader::from_reader(data);
    let mut records = Vec::new();
    for row in reader.deserialize::<LocationRow>() {
        let row = row.map_err(|e| {
            EtError::DataUnavailable(format!("location registry is unreadable: {e}"))
        })?;
        records.push(LocationRecord {
            key: row.city,
            latitude: row.latitude,
            longitude: row.longitude,
        });
    }
    if records.is_empty() {
        return Err(EtError::DataUnavailable(
            "location registry contains no cities".into(),
        ));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_registry() {
        let data = "City,Latitude,Longitude\nFresno_CA,36.74,-119.78\nDavis_CA,38.54,-121.74\n";
        let records = parse_registry(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "Fresno_CA");
        assert_eq!(records[0].display_name(), "Fresno CA");
        assert!((records[1].latitude - 38.54).abs() < 1e-9);
    }

    #[test]
    fn empty_registry_is_unavailable() {
        let data = "City,Latitude,Longitude\n";
        assert!(matches!(
            parse_registry(data.as_bytes()),
            Err(EtError::DataUnavailable(_))
        ));
    }

    #[test]
    fn malformed_row_is_unavailable() {
        let data = "City,Latitude,Longitude\nFresno_CA,not-a-number,-119.78\n";
        assert!(matches!(
            parse_registry(data.as_bytes()),
            Err(EtError::DataUnavailable(_))
        ));
    }
}
