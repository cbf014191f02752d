//! Per-city evapotranspiration series loaded from remote CSV files.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::info;

use crate::core::TimeSeries;
use crate::data::{fetch, DataSourceConfig};
use crate::error::{EtError, Result};

/// Fetch and parse the monthly ET series for a city.
///
/// `city_key` is the underscore form from the registry. The CSV must
/// carry a `DateTime` column and an `Ensemble ET` (or already-renamed
/// `ET`) column; `Unnamed` index columns are dropped.
pub fn load_series(config: &DataSourceConfig, city_key: &str) -> Result<TimeSeries> {
    let body = fetch(config, &config.csv_url(city_key))?;
    let series = parse_series(body.as_bytes())?;
    info!(city = city_key, months = series.len(), "loaded ET series");
    Ok(series)
}

fn parse_series(data: &[u8]) -> Result<TimeSeries> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| EtError::MalformedSeries(format!("unreadable header row: {e}")))?
        .clone();

    let time_col = headers
        .iter()
        .position(|h| h == "DateTime")
        .ok_or_else(|| EtError::MalformedSeries("missing DateTime column".into()))?;
    // The upstream files name the value column "Ensemble ET"; accept the
    // renamed form too. Pandas-style "Unnamed: 0" index columns are
    // ignored.
    let value_col = headers
        .iter()
        .position(|h| h == "Ensemble ET" || h == "ET")
        .ok_or_else(|| EtError::MalformedSeries("missing ET column".into()))?;

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row =
            row.map_err(|e| EtError::MalformedSeries(format!("row {row_idx}: {e}")))?;
        let raw_time = row.get(time_col).ok_or_else(|| {
            EtError::MalformedSeries(format!("row {row_idx}: missing DateTime field"))
        })?;
        let raw_value = row.get(value_col).ok_or_else(|| {
            EtError::MalformedSeries(format!("row {row_idx}: missing ET field"))
        })?;

        timestamps.push(parse_timestamp(raw_time).ok_or_else(|| {
            EtError::MalformedSeries(format!(
                "row {row_idx}: unparseable timestamp {raw_time:?}"
            ))
        })?);
        values.push(raw_value.trim().parse::<f64>().map_err(|_| {
            EtError::MalformedSeries(format!("row {row_idx}: unparseable value {raw_value:?}"))
        })?);
    }

    if timestamps.is_empty() {
        return Err(EtError::MalformedSeries("series contains no rows".into()));
    }

    TimeSeries::new(timestamps, values)
        .map_err(|e| EtError::MalformedSeries(format!("invalid series: {e}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}
