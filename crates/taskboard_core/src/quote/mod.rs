//! Inspirational quote retrieval.
//!
//! # Responsibility
//! - Define the `QuoteProvider` capability used by the task list controller.
//! - Own the fixed fallback quote shown when the remote service is unusable.
//!
//! # Invariants
//! - `QuoteProvider::fetch_quote` never fails; failures become the fallback.
//! - A fallback quote always carries `is_fallback == true`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod http;

pub use http::{HttpQuoteProvider, DEFAULT_QUOTE_ENDPOINT, QUOTE_MAX_LENGTH, QUOTE_MIN_LENGTH};

pub const FALLBACK_QUOTE_CONTENT: &str = "With great power comes great responsibility.";
pub const FALLBACK_QUOTE_AUTHOR: &str = "Uncle Ben";

/// One quote as displayed in the quote panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub content: String,
    pub author: String,
    /// Set when the quote is the local fallback rather than a remote result.
    pub is_fallback: bool,
}

impl Quote {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            is_fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            content: FALLBACK_QUOTE_CONTENT.to_string(),
            author: FALLBACK_QUOTE_AUTHOR.to_string(),
            is_fallback: true,
        }
    }
}

/// Quote panel state owned by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QuoteState {
    /// Request issued, not yet resolved.
    #[default]
    Loading,
    Ready(Quote),
}

/// Source of quotes; implementations swallow their own failures.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self) -> Quote;
}

/// Provider that always answers with the same quote.
///
/// Used for offline mode and tests.
#[derive(Debug, Clone)]
pub struct StaticQuoteProvider {
    quote: Quote,
}

impl StaticQuoteProvider {
    pub fn new(quote: Quote) -> Self {
        Self { quote }
    }

    /// Serves the fallback quote, flagged as offline.
    pub fn offline() -> Self {
        Self::new(Quote::fallback())
    }
}

#[async_trait]
impl QuoteProvider for StaticQuoteProvider {
    async fn fetch_quote(&self) -> Quote {
        self.quote.clone()
    }
}
