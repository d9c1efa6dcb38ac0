//! In-memory markup source for tests and offline development.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::MarkupSource;
use super::error::FetchError;

/// Serves canned pages keyed by URL.
///
/// Unknown URLs answer with a 404 [`FetchError::Status`], and URLs registered
/// with [`MockMarkupSource::with_status`] fail with that status.
#[derive(Debug, Clone, Default)]
pub struct MockMarkupSource {
    pages: HashMap<String, Result<String, u16>>,
    fetches: Arc<AtomicUsize>,
}

impl MockMarkupSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` at `url`.
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Ok(markup.into()));
        self
    }

    /// Answer `url` with a non-2xx status.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(url.into(), Err(status));
        self
    }

    /// Number of fetches served so far, including failures.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl MarkupSource for MockMarkupSource {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(Ok(markup)) => Ok(markup.clone()),
            Some(Err(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
