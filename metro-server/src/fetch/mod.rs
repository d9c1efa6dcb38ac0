//! Status page fetching.
//!
//! One GET per board, no retries. The pipeline talks to a [`MarkupSource`]
//! so tests can serve pages from memory.

use std::future::Future;

mod client;
mod error;
mod mock;

pub use client::{ArrivalClient, DEFAULT_TIMEOUT_SECS, FetchConfig};
pub use error::FetchError;
pub use mock::MockMarkupSource;

/// Something that can return the markup behind a lookup URL.
pub trait MarkupSource {
    /// Fetch the page at `url`, returning its body on success.
    fn fetch_markup(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}
