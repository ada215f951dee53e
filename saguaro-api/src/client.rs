use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::cache::{STATUS_CACHE_TTL, StatusCache};
use crate::error::ApiError;
use crate::format;
use crate::models::{AggregateStatus, PlayerRecord, ServerInfoResponse, ServerRow, ServerStatusEntry, StatusMap};
use crate::servers;

/// Servers queried per batch during a full status refresh.
const STATUS_BATCH_SIZE: usize = 5;
/// Pause between status batches. A self-imposed courtesy limit towards the
/// upstream service, not a correctness mechanism.
const BATCH_PAUSE: Duration = Duration::from_secs(1);

const USER_AGENT: &str = concat!("saguaro/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the upstream stats API, without a trailing path.
    pub base_url: String,
    /// Static API key. `None` means lookups fail with a "not configured"
    /// message instead of going out unauthenticated.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Minimum spacing between outbound requests.
    pub request_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.depscian.tech/v2".to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
            request_delay: Duration::from_millis(500),
        }
    }
}

/// Client for the upstream game-server statistics API.
///
/// One instance is built at startup and shared by every command handler; it
/// owns the HTTP connection pool, the request throttle and the server-status
/// cache.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    cache: RwLock<StatusCache>,
    last_request: Mutex<Option<Instant>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            config,
            cache: RwLock::new(StatusCache::default()),
            last_request: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Enforce the minimum spacing between outbound requests.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.config.request_delay {
                tokio::time::sleep(self.config.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Fetch one player's stats. Callers are expected to have validated the
    /// nickname and server ID already; this only checks that an API key is
    /// configured before touching the network.
    pub async fn fetch_player_stats(
        &self,
        nickname: &str,
        server_id: u16,
    ) -> Result<PlayerRecord, ApiError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ApiError::NotConfigured);
        };

        self.throttle().await;

        let server_param = server_id.to_string();
        let response = self
            .http
            .get(self.endpoint("player"))
            .header("X-API-Key", api_key)
            .query(&[("nickname", nickname), ("serverId", server_param.as_str())])
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        tracing::info!(
            nickname,
            server_id,
            status = status.as_u16(),
            "player stats request"
        );

        match status.as_u16() {
            200 => {}
            401 => return Err(ApiError::Unauthorized),
            429 => return Err(ApiError::RateLimited),
            code => return Err(ApiError::Status(code)),
        }

        let data: Value = response
            .json()
            .await
            .map_err(|_| ApiError::MalformedResponse)?;

        if let Some(err) = upstream_error(&data) {
            return Err(err);
        }

        let record: PlayerRecord =
            serde_json::from_value(data).map_err(|_| ApiError::MalformedResponse)?;
        if !record.has_identity() {
            return Err(ApiError::MalformedResponse);
        }
        Ok(record)
    }

    /// Live status for one server. Infallible by design: every failure mode
    /// becomes an error entry, so a batch refresh always produces a full
    /// result set.
    pub async fn fetch_server_status(&self, server_id: u16) -> ServerStatusEntry {
        let name = match servers::server_name(server_id) {
            Some(name) => name.to_string(),
            None => {
                return ServerStatusEntry::error(
                    format!("Server {server_id}"),
                    "unknown server ID",
                );
            }
        };

        let Some(api_key) = self.config.api_key.as_deref() else {
            return ServerStatusEntry::error(name, "API key is not configured");
        };

        self.throttle().await;

        let server_param = server_id.to_string();
        let response = match self
            .http
            .get(self.endpoint("server/info"))
            .query(&[("key", api_key), ("server", server_param.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(server_id, error = %err, "server status request failed");
                let reason = if err.is_timeout() {
                    "timed out"
                } else {
                    "connection error"
                };
                return ServerStatusEntry::error(name, reason);
            }
        };

        match response.status().as_u16() {
            200 => {}
            401 => return ServerStatusEntry::error(name, "invalid API key"),
            429 => {
                tracing::warn!(server_id, "rate limited by the status endpoint");
                return ServerStatusEntry::error(name, "rate limit exceeded");
            }
            code => return ServerStatusEntry::error(name, format!("HTTP {code}")),
        }

        let body: ServerInfoResponse = match response.json().await {
            Ok(body) => body,
            Err(_) => return ServerStatusEntry::error(name, "unexpected response format"),
        };

        if body.status.as_deref() != Some("ok") {
            let reason = body
                .error
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or("upstream API error")
                .to_string();
            return ServerStatusEntry::error(name, reason);
        }

        let server = body.server.unwrap_or_default();
        ServerStatusEntry {
            name,
            online: server.online.unwrap_or(0).max(0) as u32,
            is_online: server.status.as_deref() == Some("online"),
            error: None,
        }
    }

    /// Status for every known server, served from the cache when it holds a
    /// refresh younger than five minutes.
    ///
    /// A refresh queries servers in batches of [`STATUS_BATCH_SIZE`] with a
    /// pause between batches, then publishes the whole result set at once.
    /// Readers never observe a partially refreshed generation; overlapping
    /// refreshes each publish a complete generation and the later one wins.
    pub async fn fetch_all_servers_status(&self) -> StatusMap {
        {
            let cache = self.cache.read().await;
            if cache.is_fresh(STATUS_CACHE_TTL) {
                tracing::debug!("serving server status from cache");
                return cache.snapshot();
            }
        }

        let ids: Vec<u16> = servers::known_server_ids().collect();
        let mut entries = StatusMap::with_capacity(ids.len());

        for (batch_index, batch) in ids.chunks(STATUS_BATCH_SIZE).enumerate() {
            if batch_index > 0 {
                tokio::time::sleep(BATCH_PAUSE).await;
            }
            let results =
                futures::future::join_all(batch.iter().map(|id| self.fetch_server_status(*id)))
                    .await;
            for (id, entry) in batch.iter().zip(results) {
                entries.insert(*id, entry);
            }
        }

        let mut cache = self.cache.write().await;
        cache.replace(entries.clone());
        tracing::info!(servers = entries.len(), "refreshed server status cache");
        entries
    }

    /// One-shot status overview from the aggregate endpoint. Falls back to
    /// the static server list when the endpoint is unreachable or returns
    /// nothing usable.
    pub async fn servers_status_from_api(&self) -> String {
        match self.fetch_aggregate_status().await {
            Ok(rows) if !rows.is_empty() => format::format_server_rows(&rows),
            Ok(_) => {
                tracing::warn!("aggregate status endpoint returned no rows");
                format::server_list_text()
            }
            Err(err) => {
                tracing::warn!(error = %err, "aggregate status fetch failed, using static list");
                format::server_list_text()
            }
        }
    }

    async fn fetch_aggregate_status(&self) -> Result<Vec<ServerRow>, ApiError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ApiError::NotConfigured);
        };

        self.throttle().await;

        let response = self
            .http
            .get(self.endpoint("status"))
            .header("X-API-Key", api_key)
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        match response.status().as_u16() {
            200 => {}
            401 => return Err(ApiError::Unauthorized),
            429 => return Err(ApiError::RateLimited),
            code => return Err(ApiError::Status(code)),
        }

        let body: AggregateStatus = response
            .json()
            .await
            .map_err(|_| ApiError::MalformedResponse)?;
        Ok(body.arizona)
    }
}

/// Detect a semantic error inside an HTTP 200 payload. The upstream signals
/// failures three different ways: an `error_code` field, an `error` field
/// (string or object with a `message`), or `status == "error"`.
fn upstream_error(data: &Value) -> Option<ApiError> {
    fn nested_message(err: &Value) -> String {
        match err {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
            _ => "Unknown error".to_string(),
        }
    }

    if let Some(code) = data.get("error_code") {
        let code = match code {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let message = data
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Some(ApiError::Upstream {
            code: Some(code),
            message,
        });
    }

    if let Some(err) = data.get("error") {
        return Some(ApiError::Upstream {
            code: None,
            message: nested_message(err),
        });
    }

    if data.get("status").and_then(Value::as_str) == Some("error") {
        return Some(ApiError::Upstream {
            code: None,
            message: "Unknown error".to_string(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_error_code_field() {
        let err = upstream_error(&json!({
            "error_code": "FORBIDDEN",
            "error_message": "confirm your IP"
        }))
        .unwrap();
        match err {
            ApiError::Upstream { code, message } => {
                assert_eq!(code.as_deref(), Some("FORBIDDEN"));
                assert_eq!(message, "confirm your IP");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_error_nested_object() {
        let err = upstream_error(&json!({"error": {"message": "player not found"}})).unwrap();
        match err {
            ApiError::Upstream { code, message } => {
                assert_eq!(code, None);
                assert_eq!(message, "player not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_error_plain_string() {
        let err = upstream_error(&json!({"error": "boom"})).unwrap();
        match err {
            ApiError::Upstream { message, .. } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_error_status_flag() {
        assert!(upstream_error(&json!({"status": "error"})).is_some());
    }

    #[test]
    fn test_ordinary_payload_is_not_an_error() {
        assert!(upstream_error(&json!({"id": 1, "level": 2})).is_none());
        // a player payload's own status object must not trip the check
        assert!(upstream_error(&json!({"id": 1, "status": {"online": true}})).is_none());
    }

    #[test]
    fn test_endpoint_joins_cleanly() {
        let client = ApiClient::new(ClientConfig {
            base_url: "http://example.test/v2/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.endpoint("player"), "http://example.test/v2/player");
    }
}
