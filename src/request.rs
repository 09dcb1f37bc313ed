//! Request and response carriers exchanged with the engine.
//!
//! The engine's request and response objects are opaque to this crate beyond
//! the fields modeled here: status code, header map, proxy assignment, and
//! the retry metadata bag.

use std::collections::HashMap;

use crate::retry::{RetryContext, TransportFailure};

/// Header set by the hook when the picked proxy carries credentials.
pub const PROXY_AUTHORIZATION: &str = "Proxy-Authorization";

/// The slice of an outbound request this crate reads and mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    /// Credential-stripped `scheme://host:port` the transport should tunnel
    /// through, or None for direct dispatch. Distinct from
    /// `retry.assigned_proxy`, which keeps the full pool identifier so
    /// penalization hits the right key.
    pub proxy_endpoint: Option<String>,
    pub retry: RetryContext,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>, priority: i32) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            proxy_endpoint: None,
            retry: RetryContext::new(priority),
        }
    }

    /// Build the re-issue descriptor: same request, successor retry context,
    /// proxy assignment and auth header cleared for a fresh pick. The engine
    /// must treat this as a brand-new dispatch, exempt from request dedup.
    pub(crate) fn reissue(&self, ctx: RetryContext) -> Self {
        let mut headers = self.headers.clone();
        headers.remove(PROXY_AUTHORIZATION);
        Self {
            url: self.url.clone(),
            headers,
            proxy_endpoint: None,
            retry: ctx,
        }
    }
}

/// The slice of a received response this crate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
}

/// Outcome of `after_receive` / `on_exception`, returned to the engine
/// instead of raising through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep the received response as the lineage's outcome.
    Response(ResponseHead),
    /// Re-enter the scheduling queue with this descriptor.
    Reissue(CrawlRequest),
    /// Surface the transport failure to the engine's own handling.
    Propagate(TransportFailure),
}
