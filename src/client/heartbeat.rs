//! Proxy for the `/Heartbeat` endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::error::{ClientError, ClientResult};
use crate::client::http::{ApiClient, ApiResponse};
use crate::client::timestamp;

#[derive(Deserialize)]
struct ServerTime(#[serde(with = "timestamp")] DateTime<Utc>);

/// Liveness probe against the remote API.
#[derive(Debug, Clone)]
pub struct HeartbeatService {
    api: ApiClient,
}

impl HeartbeatService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /Heartbeat/Get`, returning the server's current time.
    pub async fn get(&self) -> ClientResult<ApiResponse<DateTime<Utc>>> {
        let url = self.api.url(&["Heartbeat", "Get"])?;
        let response: ApiResponse<ServerTime> =
            self.api.send("Heartbeat/Get", self.api.get(url)).await?;
        Ok(response.map(|time| time.0))
    }

    /// Local clock minus server clock, measured against the request midpoint.
    ///
    /// Positive values mean the local clock is ahead.
    pub async fn clock_skew(&self) -> ClientResult<chrono::Duration> {
        let sent = Utc::now();
        let server_time = self
            .get()
            .await?
            .into_result()?
            .ok_or_else(|| ClientError::Decode("Heartbeat/Get: empty body".to_string()))?;
        let received = Utc::now();

        let midpoint = sent + (received - sent) / 2;
        let skew = midpoint - server_time;

        tracing::debug!(skew_ms = skew.num_milliseconds(), "Measured clock skew");
        Ok(skew)
    }
}
