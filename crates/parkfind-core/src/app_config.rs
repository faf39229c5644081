#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// LTA DataMall `AccountKey` header value.
    pub datamall_account_key: String,
    pub datagov_base_url: String,
    pub datamall_base_url: String,
    /// data.gov.sg datastore resource id for the HDB carpark information table.
    pub hdb_information_resource_id: String,
    /// data.gov.sg datastore resource id for the carpark rates table.
    pub rates_resource_id: String,
    pub feed_request_timeout_secs: u64,
    pub feed_user_agent: String,
    pub feed_max_retries: u32,
    pub feed_retry_backoff_base_secs: u64,
    /// Seconds between scheduled snapshot refreshes in watch mode.
    pub refresh_interval_secs: u64,
    /// Result-window size for paged queries.
    pub page_size: usize,
    /// Default search radius when the caller supplies none.
    pub default_radius_km: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("datamall_account_key", &"[redacted]")
            .field("datagov_base_url", &self.datagov_base_url)
            .field("datamall_base_url", &self.datamall_base_url)
            .field(
                "hdb_information_resource_id",
                &self.hdb_information_resource_id,
            )
            .field("rates_resource_id", &self.rates_resource_id)
            .field(
                "feed_request_timeout_secs",
                &self.feed_request_timeout_secs,
            )
            .field("feed_user_agent", &self.feed_user_agent)
            .field("feed_max_retries", &self.feed_max_retries)
            .field(
                "feed_retry_backoff_base_secs",
                &self.feed_retry_backoff_base_secs,
            )
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .field("page_size", &self.page_size)
            .field("default_radius_km", &self.default_radius_km)
            .finish()
    }
}
