//! PostgREST gateway
//!
//! Talks to `{url}/rest/v1/{table}`:
//!
//! ```text
//! GET   ?select=*&order=published_at.desc[&is_saved=eq.true]
//! PATCH ?id=eq.<id>   {"is_saved": <bool>}   Prefer: return=representation
//! ```

use super::gateway::{normalize_articles, RemoteGateway};
use crate::articles::{Article, ArticlePatch, FetchFilter};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Remote gateway over HTTP
pub struct RestGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RestGateway {
    /// Build a gateway from remote configuration
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.api_key.clone(),
        })
    }

    /// Full collection endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch_query(filter: FetchFilter) -> Vec<(&'static str, &'static str)> {
        let mut query = vec![("select", "*"), ("order", "published_at.desc")];
        if filter == FetchFilter::SavedOnly {
            query.push(("is_saved", "eq.true"));
        }
        query
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteGateway for RestGateway {
    async fn fetch_articles(&self, filter: FetchFilter) -> Result<Vec<Article>> {
        let request = self
            .client
            .get(&self.endpoint)
            .query(&Self::fetch_query(filter));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!("status {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("failed to read body: {}", e)))?;
        let articles: Vec<Article> = serde_json::from_str(&body)
            .map_err(|e| Error::Network(format!("invalid response: {}", e)))?;

        tracing::debug!(count = articles.len(), %filter, "Fetched articles");
        Ok(normalize_articles(articles))
    }

    async fn set_saved(&self, id: &str, value: bool) -> Result<()> {
        let id_filter = format!("eq.{}", id);
        let request = self
            .client
            .patch(&self.endpoint)
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(&ArticlePatch::saved(value));

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::Mutation(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Mutation(format!("status {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Mutation(format!("failed to read body: {}", e)))?;
        let updated: Vec<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|e| Error::Mutation(format!("invalid response: {}", e)))?;

        if updated.is_empty() {
            return Err(Error::Mutation(format!("article {} no longer exists", id)));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "rest"
    }
}
