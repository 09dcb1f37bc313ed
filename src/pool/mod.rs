//! Shared proxy pool: load, weighted-random pick, penalize.
//!
//! The pool is the only shared mutable state in this crate. It is created
//! once at startup from a proxy-list file and mutated thereafter only through
//! [`ProxyPool::penalize`]. Both `pick` and `penalize` are internally
//! synchronized and hold the lock only for the in-memory mutation, so many
//! in-flight request lineages can call them concurrently.

mod entry;

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::credentials::ProxyUrl;
use crate::error::{Error, Result};

pub use entry::{ProxyEntry, ProxyStatus};

#[derive(Debug)]
struct PoolInner {
    entries: HashMap<String, ProxyEntry>,
}

/// Process-wide pool of upstream proxies with per-proxy failure budgets.
#[derive(Debug)]
pub struct ProxyPool {
    inner: RwLock<PoolInner>,
    use_proxy_probability: f64,
}

impl ProxyPool {
    /// Build a pool from proxy identifiers, one per line. Blank lines are
    /// ignored; malformed identifiers fail the load so the pool never holds
    /// an unparseable key. Every entry starts Valid with the full chance.
    pub fn load<I, S>(lines: I, initial_chance: u32, use_proxy_probability: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if initial_chance == 0 {
            return Err(Error::Configuration(
                "proxy chance must be at least 1".to_string(),
            ));
        }

        let mut entries = HashMap::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            ProxyUrl::parse(line)?;
            entries.insert(line.to_string(), ProxyEntry::new(initial_chance));
        }
        if entries.is_empty() {
            return Err(Error::Configuration(
                "proxy list contains no entries".to_string(),
            ));
        }

        tracing::info!(proxies = entries.len(), "loaded proxy pool");
        Ok(Self {
            inner: RwLock::new(PoolInner { entries }),
            use_proxy_probability,
        })
    }

    /// Build a pool from a UTF-8 proxy-list file.
    pub fn from_file(path: &Path, initial_chance: u32, use_proxy_probability: f64) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if data.lines().all(|line| line.trim().is_empty()) {
            return Err(Error::EmptyProxyList {
                path: path.to_path_buf(),
            });
        }
        Self::load(data.lines(), initial_chance, use_proxy_probability)
    }

    /// Pick a proxy for the next dispatch.
    ///
    /// With the configured probability, returns a uniformly-random Valid
    /// identifier; otherwise `Ok(None)`, meaning "send directly, no proxy".
    /// `PoolExhausted` only when the proxy branch is taken and no Valid entry
    /// remains — callers fall back to direct dispatch.
    pub fn pick(&self) -> Result<Option<String>> {
        self.pick_with_rng(&mut rand::thread_rng())
    }

    /// Like [`ProxyPool::pick`] with an injected RNG, for deterministic tests.
    pub fn pick_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<String>> {
        if rng.gen::<f64>() >= self.use_proxy_probability {
            return Ok(None);
        }

        let inner = self.inner.read();
        let valid: Vec<&String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.status == ProxyStatus::Valid)
            .map(|(id, _)| id)
            .collect();
        match valid.choose(rng) {
            Some(id) => Ok(Some((*id).clone())),
            None => Err(Error::PoolExhausted),
        }
    }

    /// Charge one failure against the identifier's chance. When the budget
    /// reaches zero the entry flips to Invalid in the same critical section,
    /// so no subsequent `pick` can return it. No-op for identifiers that are
    /// absent or already evicted (a concurrent attempt may have penalized the
    /// same proxy first).
    pub fn penalize(&self, identifier: &str) {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get_mut(identifier) {
            if entry.status == ProxyStatus::Invalid {
                return;
            }
            entry.chance = entry.chance.saturating_sub(1);
            if entry.chance == 0 {
                entry.status = ProxyStatus::Invalid;
                tracing::info!(proxy = identifier, "proxy chance exhausted, evicted from rotation");
            } else {
                tracing::debug!(proxy = identifier, chance = entry.chance, "penalized proxy");
            }
        }
    }

    /// Number of entries still eligible for selection.
    pub fn available(&self) -> usize {
        self.inner
            .read()
            .entries
            .values()
            .filter(|e| e.status == ProxyStatus::Valid)
            .count()
    }

    /// Number of evicted entries retained for diagnostics.
    pub fn evicted(&self) -> usize {
        self.inner
            .read()
            .entries
            .values()
            .filter(|e| e.status == ProxyStatus::Invalid)
            .count()
    }

    /// Remaining chance for an identifier, if it was ever loaded.
    pub fn chance(&self, identifier: &str) -> Option<u32> {
        self.inner.read().entries.get(identifier).map(|e| e.chance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(ids: &[&str], chance: u32, probability: f64) -> ProxyPool {
        ProxyPool::load(ids.iter().copied(), chance, probability).unwrap()
    }

    #[test]
    fn load_skips_blank_lines_and_rejects_empty_input() {
        let pool = pool(&["http://p1:8080", "", "  ", "http://p2:8080"], 2, 1.0);
        assert_eq!(pool.available(), 2);

        assert!(matches!(
            ProxyPool::load(["", "  "], 2, 1.0),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn load_rejects_malformed_identifiers() {
        assert!(matches!(
            ProxyPool::load(["http://p1:8080", "http://"], 2, 1.0),
            Err(Error::MalformedProxyUrl { .. })
        ));
    }

    #[test]
    fn load_rejects_zero_chance() {
        assert!(matches!(
            ProxyPool::load(["http://p1:8080"], 0, 1.0),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn from_file_reads_list_and_flags_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxies.txt");
        std::fs::write(&path, "http://p1:8080\n\nhttp://p2:8080\n").unwrap();
        let pool = ProxyPool::from_file(&path, 2, 1.0).unwrap();
        assert_eq!(pool.available(), 2);

        let empty = dir.path().join("empty.txt");
        std::fs::write(&empty, "\n\n").unwrap();
        assert!(matches!(
            ProxyPool::from_file(&empty, 2, 1.0),
            Err(Error::EmptyProxyList { .. })
        ));

        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            ProxyPool::from_file(&missing, 2, 1.0),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn pick_with_probability_one_always_returns_a_proxy() {
        let pool = pool(&["http://p1:8080", "http://p2:8080"], 2, 1.0);
        for _ in 0..100 {
            assert!(pool.pick().unwrap().is_some());
        }
    }

    #[test]
    fn pick_with_probability_zero_always_bypasses() {
        let pool = pool(&["http://p1:8080"], 2, 0.0);
        for _ in 0..100 {
            assert!(pool.pick().unwrap().is_none());
        }
    }

    #[test]
    fn pick_empirical_bypass_rate_tracks_probability() {
        let pool = pool(&["http://p1:8080"], 2, 0.95);
        let trials = 10_000;
        let bypasses = (0..trials)
            .filter(|_| pool.pick().unwrap().is_none())
            .count();
        let rate = bypasses as f64 / trials as f64;
        assert!(
            (0.03..=0.07).contains(&rate),
            "bypass rate {rate} outside 0.05 +/- 0.02"
        );
    }

    #[test]
    fn chance_exhaustion_evicts_after_exact_budget() {
        let pool = pool(&["http://p1:8080", "http://p2:8080"], 3, 1.0);

        pool.penalize("http://p1:8080");
        pool.penalize("http://p1:8080");
        assert_eq!(pool.chance("http://p1:8080"), Some(1));
        assert_eq!(pool.available(), 2);

        pool.penalize("http://p1:8080");
        assert_eq!(pool.chance("http://p1:8080"), Some(0));
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.evicted(), 1);

        // Evicted entries are never selectable again.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let picked = pool.pick_with_rng(&mut rng).unwrap();
            assert_eq!(picked.as_deref(), Some("http://p2:8080"));
        }
    }

    #[test]
    fn penalize_is_a_noop_for_absent_or_evicted_entries() {
        let pool = pool(&["http://p1:8080"], 1, 1.0);
        pool.penalize("http://unknown:1");
        assert_eq!(pool.available(), 1);

        pool.penalize("http://p1:8080");
        assert_eq!(pool.evicted(), 1);
        // A racing lineage may penalize after eviction; chance stays at zero.
        pool.penalize("http://p1:8080");
        assert_eq!(pool.chance("http://p1:8080"), Some(0));
    }

    #[test]
    fn exhausted_pool_surfaces_error_on_proxy_branch() {
        let pool = pool(&["http://p1:8080"], 1, 1.0);
        pool.penalize("http://p1:8080");
        assert!(matches!(pool.pick(), Err(Error::PoolExhausted)));
    }

    #[test]
    fn concurrent_penalize_never_loses_updates() {
        use std::sync::Arc;

        let pool = Arc::new(pool(&["http://p1:8080", "http://p2:8080"], 64, 1.0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..8 {
                        pool.penalize("http://p1:8080");
                        let _ = pool.pick();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // 64 penalizations against a budget of 64: exactly exhausted.
        assert_eq!(pool.chance("http://p1:8080"), Some(0));
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.evicted(), 1);
    }
}
