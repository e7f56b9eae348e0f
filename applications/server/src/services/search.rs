//! Video search proxy
//!
//! Forwards a query to the YouTube Data API search endpoint and hands the
//! answer back untouched. Nothing is cached and nothing is retried.

use crate::config::SearchSettings;
use crate::error::{Result, ServerError};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

/// An upstream response relayed to the client as received
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl UpstreamResponse {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ServerError::SearchUnavailable(e.to_string()))?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = (status, self.body).into_response();

        if let Some(value) = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }

        response
    }
}

#[derive(Debug, Clone)]
pub struct SearchProxy {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_results: u32,
}

impl SearchProxy {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            max_results: settings.max_results,
        }
    }

    /// Run a search. Non-2xx answers come back as `ServerError::Upstream`.
    pub async fn search(&self, query: &str) -> Result<UpstreamResponse> {
        let max_results = self.max_results.to_string();
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("key", self.api_key.as_str()),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("videoEmbeddable", "true"),
                ("type", "video"),
            ])
            .send()
            .await
            .map_err(|e| ServerError::SearchUnavailable(e.to_string()))?;

        let upstream = UpstreamResponse::read(response).await?;
        if (200..300).contains(&upstream.status) {
            Ok(upstream)
        } else {
            tracing::warn!(status = upstream.status, "Search API returned an error");
            Err(ServerError::Upstream(upstream))
        }
    }
}
