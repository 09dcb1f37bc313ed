//! Retry orchestration: failure classification, per-lineage context, and the
//! re-issue policy.
//!
//! The policy never sleeps or backs off on a timer; a re-issue is an
//! instruction handed back to the engine, throttled only by priority
//! demotion.

mod classify;
mod context;
mod policy;

pub use classify::{classify, TransportFailure, Verdict};
pub use context::RetryContext;
pub use policy::{RetryPolicy, RetryReason};
