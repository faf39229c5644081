use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use parkfind_core::AppConfig;

use crate::error::FeedError;
use crate::retry::retry_with_backoff;
use crate::types::{
    AvailabilityResponse, AvailabilityRow, DatamallResponse, DatamallRow, DatastoreResponse,
    HdbInformationRow, RateRow,
};

/// Rows requested per datastore_search page.
const DATASTORE_PAGE_LIMIT: usize = 1000;

/// DataMall returns at most 500 records per call; further records are
/// reached via `$skip`.
const DATAMALL_PAGE_SIZE: usize = 500;

/// Maximum pages per source before aborting. Prevents infinite loops on a
/// misbehaving endpoint that keeps returning full pages.
const MAX_PAGES: usize = 100;

/// HTTP client for the four carpark data sources.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures) are retried with
/// exponential backoff; each page fetch retries independently.
pub struct FeedClient {
    client: Client,
    datagov_base_url: String,
    datamall_base_url: String,
    datamall_account_key: String,
    hdb_information_resource_id: String,
    rates_resource_id: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl FeedClient {
    /// Creates a `FeedClient` from application config.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: &AppConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.feed_request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.feed_user_agent)
            .build()?;
        Ok(Self {
            client,
            datagov_base_url: config.datagov_base_url.trim_end_matches('/').to_owned(),
            datamall_base_url: config.datamall_base_url.trim_end_matches('/').to_owned(),
            datamall_account_key: config.datamall_account_key.clone(),
            hdb_information_resource_id: config.hdb_information_resource_id.clone(),
            rates_resource_id: config.rates_resource_id.clone(),
            max_retries: config.feed_max_retries,
            backoff_base_secs: config.feed_retry_backoff_base_secs,
        })
    }

    /// Fetches the full HDB carpark information table.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying paged datastore fetch.
    pub async fn fetch_hdb_information(&self) -> Result<Vec<HdbInformationRow>, FeedError> {
        self.fetch_datastore_records(&self.hdb_information_resource_id)
            .await
    }

    /// Fetches the full carpark rates table.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying paged datastore fetch.
    pub async fn fetch_carpark_rates(&self) -> Result<Vec<RateRow>, FeedError> {
        self.fetch_datastore_records(&self.rates_resource_id).await
    }

    /// Fetches all records of a datastore_search resource, following
    /// `limit`/`offset` pages until a short page signals the end.
    async fn fetch_datastore_records<T: DeserializeOwned>(
        &self,
        resource_id: &str,
    ) -> Result<Vec<T>, FeedError> {
        let mut records: Vec<T> = Vec::new();
        let mut offset = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(FeedError::PaginationLimit {
                    url: format!("{}/api/action/datastore_search", self.datagov_base_url),
                    max_pages: MAX_PAGES,
                });
            }

            let url = format!(
                "{}/api/action/datastore_search?resource_id={resource_id}&limit={DATASTORE_PAGE_LIMIT}&offset={offset}",
                self.datagov_base_url
            );
            let response: DatastoreResponse<T> = self
                .get_json(&url, &format!("datastore resource {resource_id}"), false)
                .await?;

            let batch = response.result.records;
            let batch_len = batch.len();
            records.extend(batch);

            if batch_len < DATASTORE_PAGE_LIMIT {
                break;
            }
            offset += DATASTORE_PAGE_LIMIT;
        }

        tracing::debug!(resource_id, count = records.len(), "datastore fetch complete");
        Ok(records)
    }

    /// Fetches the LTA DataMall availability feed, following `$skip` pages.
    ///
    /// # Errors
    ///
    /// - [`FeedError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`FeedError::NotFound`] — HTTP 404 (not retried).
    /// - [`FeedError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`FeedError::Http`] — network or TLS failure after all retries.
    /// - [`FeedError::Deserialize`] — response body does not match the feed shape.
    /// - [`FeedError::PaginationLimit`] — more than [`MAX_PAGES`] pages.
    pub async fn fetch_datamall_availability(&self) -> Result<Vec<DatamallRow>, FeedError> {
        let mut rows: Vec<DatamallRow> = Vec::new();
        let mut skip = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(FeedError::PaginationLimit {
                    url: format!(
                        "{}/ltaodataservice/CarParkAvailabilityv2",
                        self.datamall_base_url
                    ),
                    max_pages: MAX_PAGES,
                });
            }

            let url = format!(
                "{}/ltaodataservice/CarParkAvailabilityv2?$skip={skip}",
                self.datamall_base_url
            );
            let response: DatamallResponse = self
                .get_json(&url, "DataMall carpark availability", true)
                .await?;

            let batch_len = response.value.len();
            rows.extend(response.value);

            if batch_len < DATAMALL_PAGE_SIZE {
                break;
            }
            skip += DATAMALL_PAGE_SIZE;
        }

        tracing::debug!(count = rows.len(), "DataMall availability fetch complete");
        Ok(rows)
    }

    /// Fetches the data.gov.sg availability feed. Single call; the feed
    /// returns one item carrying the whole record array.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::fetch_datamall_availability`], minus the
    /// pagination limit.
    pub async fn fetch_datagov_availability(&self) -> Result<Vec<AvailabilityRow>, FeedError> {
        let url = format!(
            "{}/v1/transport/carpark-availability",
            self.datagov_base_url
        );
        let response: AvailabilityResponse = self
            .get_json(&url, "data.gov.sg carpark availability", false)
            .await?;

        let rows = response
            .items
            .into_iter()
            .next()
            .map(|item| item.carpark_data)
            .unwrap_or_default();

        tracing::debug!(count = rows.len(), "data.gov.sg availability fetch complete");
        Ok(rows)
    }

    /// Performs a GET with typed status handling and backoff retry, then
    /// deserializes the body.
    ///
    /// `with_account_key` attaches the DataMall `AccountKey` header.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
        with_account_key: bool,
    ) -> Result<T, FeedError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            let context = context.to_owned();
            async move {
                let mut request = self.client.get(&url).header("accept", "application/json");
                if with_account_key {
                    request = request.header("AccountKey", self.datamall_account_key.as_str());
                }
                let response = request.send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(FeedError::RateLimited {
                        host: extract_host(&url),
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(FeedError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(FeedError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| FeedError::Deserialize {
                    context,
                    source: e,
                })
            }
        })
        .await
    }
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
fn extract_host(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(url)
        .to_owned()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
