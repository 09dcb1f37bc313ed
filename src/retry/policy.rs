use std::fmt;

use super::classify::TransportFailure;
use super::context::RetryContext;

/// Why a re-issue is being considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryReason {
    HttpStatus(u16),
    Transport(TransportFailure),
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryReason::HttpStatus(code) => write!(f, "http status {code}"),
            RetryReason::Transport(failure) => write!(f, "{failure}"),
        }
    }
}

/// Caps re-issues per lineage and demotes retried work in scheduling order.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of re-issues per lineage (not counting the original).
    pub max_retry_times: u32,
    /// Priority delta applied to every re-issue.
    pub priority_adjust: i32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retry_times: 4,
            priority_adjust: -1,
        }
    }
}

impl RetryPolicy {
    /// Decide whether to re-issue. Returns the successor context, or None
    /// when the caller's veto is set or the lineage is spent. Exhaustion is
    /// not an error: the last response or failure stands as the final
    /// outcome.
    pub fn decide(&self, ctx: &RetryContext, reason: &RetryReason) -> Option<RetryContext> {
        if ctx.dont_retry {
            return None;
        }

        let retries = ctx.retry_count + 1;
        if retries > self.max_retry_times {
            tracing::debug!(retries, %reason, "gave up retrying");
            return None;
        }

        tracing::debug!(retries, %reason, "retrying request");
        Some(ctx.next(self.priority_adjust))
    }
}
