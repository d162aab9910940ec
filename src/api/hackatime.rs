//! Hackatime REST client.

use super::{build_http_client, decode_response, map_send_error};
use crate::config::ApiConfig;
use crate::error::{AppError, ClientError};
use crate::models::{TodayStatus, UserStats};
use crate::store::{ConfigStore, SettingKey};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Client for the Hackatime API.
#[derive(Debug, Clone)]
pub struct HackatimeClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HackatimeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    pub fn from_store(store: &dyn ConfigStore, api: &ApiConfig) -> Result<Self, AppError> {
        let api_key = store.require(
            SettingKey::HackatimeKey,
            "No Hackatime key found. Please run 'flavor login hackatime <key>' first.",
        )?;
        Ok(Self::new(&api.hackatime_url, &api_key, api.timeout())?)
    }

    /// The base URL extended by `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let invalid =
            || ClientError::Transport(format!("Invalid Hackatime URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        what: &str,
    ) -> Result<T, ClientError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| map_send_error(e, &self.base_url, self.timeout))?;

        decode_response(response, what).await
    }

    /// Coding time for today.
    pub async fn time_today(&self) -> Result<TodayStatus, ClientError> {
        let url = self.endpoint(&[
            "api", "hackatime", "v1", "users", "current", "statusbar", "today",
        ])?;
        self.get(url, "Today's time").await
    }

    /// All-time stats for `username`.
    pub async fn stats(&self, username: &str) -> Result<UserStats, ClientError> {
        let url = self.endpoint(&["api", "v1", "users", username, "stats"])?;
        self.get(url, &format!("Hackatime user '{}'", username)).await
    }
}
