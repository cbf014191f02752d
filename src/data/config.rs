//! Data source configuration.

/// Default host serving the per-city CSV files and the location registry.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/danikagupta/et_data1/main";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the dashboard loads its CSV data from.
///
/// Files are expected at `<base_url>/LocationData.csv` and
/// `<base_url>/<City_Name>.csv`.
#[derive(Debug, Clone)]
pub struct DataSourceConfig {
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DataSourceConfig {
    /// Full URL of a CSV resource under the base URL.
    pub fn csv_url(&self, name: &str) -> String {
        format!("{}/{}.csv", self.base_url.trim_end_matches('/'), name)
    }
}
