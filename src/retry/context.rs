//! Per-lineage retry metadata.

/// Retry metadata attached to one attempt of a request lineage.
///
/// Contexts are copy-on-retry: [`RetryContext::next`] builds the successor
/// for a re-issue and never mutates the original, so concurrently-racing
/// attempts of the same lineage cannot alias each other's counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RetryContext {
    /// Number of re-issues so far; 0 for the original attempt.
    pub retry_count: u32,
    /// Pool identifier of the proxy used for the most recent attempt, or
    /// None when the attempt bypassed the pool.
    pub assigned_proxy: Option<String>,
    /// Caller-set veto: once true, no retry may be issued for this lineage.
    pub dont_retry: bool,
    /// Scheduling priority; demoted on every retry so retried work sinks in
    /// the queue.
    pub priority: i32,
}

impl RetryContext {
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    /// Successor context for a re-issue: bumped retry count, adjusted
    /// priority, proxy cleared for a fresh pick. The veto flag carries over.
    pub fn next(&self, priority_adjust: i32) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            assigned_proxy: None,
            dont_retry: self.dont_retry,
            priority: self.priority + priority_adjust,
        }
    }
}
