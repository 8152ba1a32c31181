use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::types::anomaly::AnomaliesResponse;
use crate::types::post::{HelloResponse, PostsResponse};
use crate::types::summary::SummaryResponse;

pub const DEFAULT_TOP_USERS: u32 = 3;
pub const DEFAULT_TOP_WORDS: u32 = 20;

type Query = Vec<(&'static str, String)>;

/// How many users and words the summary endpoint should rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLimits {
    pub top_users: u32,
    pub top_words: u32,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            top_users: DEFAULT_TOP_USERS,
            top_words: DEFAULT_TOP_WORDS,
        }
    }
}

/// Typed client for the insights API. One attempt per call: no retries,
/// caching or timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: http_client(&base_url),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn hello(&self) -> Result<HelloResponse, ApiError> {
        self.get_json("/hello", Vec::new()).await
    }

    pub async fn posts(&self, limit: Option<u32>) -> Result<PostsResponse, ApiError> {
        self.get_json("/posts/", posts_query(limit)).await
    }

    pub async fn posts_by_user(&self, user_id: i64) -> Result<PostsResponse, ApiError> {
        self.get_json(&format!("/posts/{}", user_id), Vec::new()).await
    }

    pub async fn anomalies(
        &self,
        limit: Option<u32>,
        user_id: Option<i64>,
    ) -> Result<AnomaliesResponse, ApiError> {
        self.get_json("/anomalies/", anomalies_query(limit, user_id))
            .await
    }

    pub async fn summary(
        &self,
        limit: Option<u32>,
        limits: SummaryLimits,
    ) -> Result<SummaryResponse, ApiError> {
        self.get_json("/summary/", summary_query(limit, limits)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, ApiError> {
        let url = format!("{}/api{}", self.base_url, path);
        debug!(%url, ?query, "GET");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(&query);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%url, error = %e, "Request failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(ApiError::from_status(status));
        }

        // A body cut off mid-read is a transport failure, not a decode one.
        let body = response.bytes().await.map_err(|e| {
            warn!(%url, error = %e, "Reading response body failed");
            ApiError::from(e)
        })?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Unknown(e.to_string()))
    }
}

/// Loopback targets bypass any system proxy.
fn http_client(base_url: &str) -> reqwest::Client {
    let loopback = reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false);
    let builder = reqwest::Client::builder();
    let builder = if loopback { builder.no_proxy() } else { builder };
    builder.build().unwrap_or_default()
}

// Zero limits and ids are treated as "not set", matching the backend's
// optional query parameters.

fn posts_query(limit: Option<u32>) -> Query {
    let mut query = Vec::new();
    if let Some(limit) = limit.filter(|&l| l > 0) {
        query.push(("limit", limit.to_string()));
    }
    query
}

fn anomalies_query(limit: Option<u32>, user_id: Option<i64>) -> Query {
    let mut query = posts_query(limit);
    if let Some(user_id) = user_id.filter(|&id| id != 0) {
        query.push(("user_id", user_id.to_string()));
    }
    query
}

fn summary_query(limit: Option<u32>, limits: SummaryLimits) -> Query {
    let mut query = posts_query(limit);
    query.push(("top_users", limits.top_users.to_string()));
    query.push(("top_words", limits.top_words.to_string()));
    query
}
