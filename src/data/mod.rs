//! Remote CSV loading: the city registry and per-city ET series.

mod config;
mod registry;
mod series;

pub use config::{DataSourceConfig, DEFAULT_BASE_URL};
pub use registry::{load_registry, LocationRecord};
pub use series::load_series;

use std::time::Duration;

use crate::error::{EtError, Result};

/// Fetch a URL as text, mapping transport and status failures to
/// [`EtError::DataUnavailable`].
fn fetch(config: &DataSourceConfig, url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("etcast/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| EtError::DataUnavailable(format!("http client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| EtError::DataUnavailable(format!("{url}: {e}")))?;

    if !response.status().is_success() {
        return Err(EtError::DataUnavailable(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }

    response
        .text()
        .map_err(|e| EtError::DataUnavailable(format!("{url}: {e}")))
}
