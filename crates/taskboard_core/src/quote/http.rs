//! Remote quote provider over HTTP.
//!
//! # Invariants
//! - Exactly one request per `fetch_quote` call; no retry.
//! - Transport errors, non-2xx statuses and undecodable bodies all yield the
//!   fallback quote.

use super::{Quote, QuoteProvider};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://api.quotable.io/random";
pub const QUOTE_MIN_LENGTH: u32 = 50;
pub const QUOTE_MAX_LENGTH: u32 = 200;

#[derive(Debug, Deserialize)]
struct RemoteQuote {
    content: String,
    author: String,
}

/// Fetches a random quote from a quotable-style endpoint.
#[derive(Debug, Clone)]
pub struct HttpQuoteProvider {
    client: Client,
    endpoint: String,
}

impl HttpQuoteProvider {
    /// Builds a provider whose single request is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("event=quote_client_build module=quote status=error error={err}");
                Client::new()
            });

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self) -> reqwest::Result<RemoteQuote> {
        self.client
            .get(&self.endpoint)
            .query(&[("minLength", QUOTE_MIN_LENGTH), ("maxLength", QUOTE_MAX_LENGTH)])
            .send()
            .await?
            .error_for_status()?
            .json::<RemoteQuote>()
            .await
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    async fn fetch_quote(&self) -> Quote {
        let started_at = Instant::now();
        match self.request().await {
            Ok(remote) => {
                info!(
                    "event=quote_fetch module=quote status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Quote::new(remote.content, remote.author)
            }
            Err(err) => {
                warn!(
                    "event=quote_fetch module=quote status=fallback duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Quote::fallback()
            }
        }
    }
}
