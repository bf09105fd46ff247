//! Duplicate submission suppression for the approval endpoint.
//!
//! Two windows are kept: a short one keyed by a hash of the request content,
//! catching double clicks, and a long one keyed by the client's
//! `Idempotency-Key` header, catching retries. Expired entries are dropped
//! lazily on every check and each window holds at most `max_entries` entries.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::{Duration, Instant};

use crate::config::DedupePolicy;
use crate::error::{EngineError, EngineResult};

/// In-process store of recently accepted submissions.
#[derive(Debug)]
pub struct RequestDeduplicator {
    content_window: Duration,
    idempotency_window: Duration,
    max_entries: usize,
    content_seen: HashMap<u64, Instant>,
    keys_seen: HashMap<String, Instant>,
}

impl RequestDeduplicator {
    /// Creates an empty store with the windows from `policy`.
    pub fn new(policy: &DedupePolicy) -> Self {
        Self {
            content_window: Duration::from_secs(policy.content_window_seconds),
            idempotency_window: Duration::from_secs(
                policy.idempotency_window_hours.saturating_mul(3600),
            ),
            max_entries: policy.max_entries,
            content_seen: HashMap::new(),
            keys_seen: HashMap::new(),
        }
    }

    /// Accepts a submission, or rejects it if it was already seen.
    ///
    /// An accepted submission is remembered in both windows.
    pub fn check(&mut self, content: &[u8], idempotency_key: Option<&str>) -> EngineResult<()> {
        self.check_at(content, idempotency_key, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    ///
    /// # Example
    ///
    /// ```
    /// use erp_rules_engine::api::RequestDeduplicator;
    /// use erp_rules_engine::config::DedupePolicy;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut dedupe = RequestDeduplicator::new(&DedupePolicy::default());
    /// let start = Instant::now();
    ///
    /// assert!(dedupe.check_at(b"notice", None, start).is_ok());
    /// assert!(dedupe.check_at(b"notice", None, start + Duration::from_secs(5)).is_err());
    /// assert!(dedupe.check_at(b"notice", None, start + Duration::from_secs(11)).is_ok());
    /// ```
    pub fn check_at(
        &mut self,
        content: &[u8],
        idempotency_key: Option<&str>,
        now: Instant,
    ) -> EngineResult<()> {
        self.evict_expired(now);

        if let Some(key) = idempotency_key {
            if self.keys_seen.contains_key(key) {
                return Err(EngineError::DuplicateRequest {
                    reason: format!("idempotency key '{}' already used", key),
                });
            }
        }

        let fingerprint = content_fingerprint(content);
        if self.content_seen.contains_key(&fingerprint) {
            return Err(EngineError::DuplicateRequest {
                reason: format!(
                    "identical request received within {} seconds",
                    self.content_window.as_secs()
                ),
            });
        }

        insert_bounded(&mut self.content_seen, fingerprint, now, self.max_entries);
        if let Some(key) = idempotency_key {
            insert_bounded(&mut self.keys_seen, key.to_string(), now, self.max_entries);
        }
        Ok(())
    }

    /// Number of remembered entries across both windows.
    pub fn len(&self) -> usize {
        self.content_seen.len() + self.keys_seen.len()
    }

    /// Returns true if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_expired(&mut self, now: Instant) {
        let content_window = self.content_window;
        self.content_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) < content_window);
        let idempotency_window = self.idempotency_window;
        self.keys_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) < idempotency_window);
    }
}

fn content_fingerprint(content: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

fn insert_bounded<K>(entries: &mut HashMap<K, Instant>, key: K, now: Instant, max_entries: usize)
where
    K: Eq + Hash + Clone,
{
    if entries.len() >= max_entries {
        if let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, seen)| **seen)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&oldest);
        }
    }
    entries.insert(key, now);
}
