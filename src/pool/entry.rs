//! Per-proxy entry and health status.

/// Health status of a pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyStatus {
    /// Eligible for selection.
    Valid,
    /// Chance exhausted; permanently out of rotation, kept for diagnostics.
    Invalid,
}

/// Health state for a single proxy, keyed by its identifier in the pool.
#[derive(Debug, Clone)]
pub struct ProxyEntry {
    pub status: ProxyStatus,
    /// Remaining failure budget. Selectable entries always have `chance > 0`;
    /// it never resets for the lifetime of the pool.
    pub chance: u32,
}

impl ProxyEntry {
    pub(super) fn new(chance: u32) -> Self {
        Self {
            status: ProxyStatus::Valid,
            chance,
        }
    }
}
