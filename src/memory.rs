//! Topic-keyed memory bank of finished analyses.
//!
//! Keys are matched verbatim (no case or whitespace folding). With the default
//! [`CacheConfig`] nothing is ever evicted or expired.

use crate::types::ClaimAnalysis;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct CacheConfig {
    /// Oldest-inserted topic is dropped once this many are held.
    pub capacity: Option<usize>,
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub topics: Vec<String>,
}

struct Entry {
    claims: Vec<ClaimAnalysis>,
    stored_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    order: VecDeque<String>,
}

impl Inner {
    fn remove(&mut self, topic: &str) {
        self.entries.remove(topic);
        self.order.retain(|t| t != topic);
    }
}

#[derive(Default)]
pub struct ResultCache {
    config: CacheConfig,
    inner: RwLock<Inner>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        Self { config, ..Default::default() }
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.config.ttl.is_some_and(|ttl| entry.stored_at.elapsed() >= ttl)
    }

    /// `None` for an unseen (or expired) topic. A poisoned lock counts as a miss.
    pub fn get(&self, topic: &str) -> Option<Vec<ClaimAnalysis>> {
        let lookup = match self.inner.read() {
            Ok(inner) => inner.entries.get(topic).map(|e| (self.is_expired(e), e.claims.clone())),
            Err(_) => {
                warn!("memory bank lock poisoned, treating as miss");
                None
            }
        };
        match lookup {
            Some((false, claims)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(claims)
            }
            Some((true, _)) => {
                if let Ok(mut inner) = self.inner.write() {
                    // re-check: another request may have refreshed it meanwhile
                    if inner.entries.get(topic).is_some_and(|e| self.is_expired(e)) {
                        inner.remove(topic);
                    }
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Last write wins.
    pub fn store(&self, topic: &str, claims: Vec<ClaimAnalysis>) {
        let Ok(mut inner) = self.inner.write() else {
            warn!("memory bank lock poisoned, dropping store");
            return;
        };
        let entry = Entry { claims, stored_at: Instant::now() };
        if inner.entries.insert(topic.to_string(), entry).is_some() {
            inner.order.retain(|t| t != topic);
        }
        inner.order.push_back(topic.to_string());

        if let Some(cap) = self.config.capacity {
            while inner.order.len() > cap.max(1) {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                    debug!(topic = %oldest, "evicted from memory bank");
                }
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        let (entries, topics) = match self.inner.read() {
            Ok(inner) => (inner.entries.len(), inner.order.iter().cloned().collect()),
            Err(_) => (0, Vec::new()),
        };
        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            topics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Evidence, Verdict};
    use std::sync::Arc;

    fn claims(label: &str) -> Vec<ClaimAnalysis> {
        vec![ClaimAnalysis::new(
            label.into(),
            Verdict::Misinformation,
            0.9,
            "explanation".into(),
            vec![Evidence::new("t", "https://bbc.com/a", "s")],
        )]
    }

    #[test]
    fn store_then_get_round_trips() {
        let cache = ResultCache::default();
        let stored = claims("c1");
        cache.store("topic", stored.clone());
        assert_eq!(cache.get("topic"), Some(stored.clone()));
        // every hit hands out its own copy
        let mut first = cache.get("topic").unwrap();
        first[0].explanation.push_str(" (edited)");
        assert_eq!(cache.get("topic"), Some(stored));
    }

    #[test]
    fn unseen_topic_is_absent_not_empty() {
        let cache = ResultCache::default();
        assert_eq!(cache.get("nothing here"), None);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (0, 1, 0));
    }

    #[test]
    fn keys_are_exact() {
        let cache = ResultCache::default();
        cache.store("Vaccines", claims("c"));
        assert!(cache.get("vaccines").is_none());
        assert!(cache.get("Vaccines ").is_none());
        assert!(cache.get("Vaccines").is_some());
    }

    #[test]
    fn last_write_wins_and_counts_once() {
        let cache = ResultCache::default();
        cache.store("t", claims("first"));
        cache.store("t", claims("second"));
        assert_eq!(cache.get("t").unwrap()[0].claim, "second");
        let stats = cache.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.topics, vec!["t".to_string()]);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn capacity_evicts_oldest_topic() {
        let cache = ResultCache::new(CacheConfig { capacity: Some(2), ttl: None });
        cache.store("a", claims("a"));
        cache.store("b", claims("b"));
        cache.store("c", claims("c"));
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert_eq!(cache.stats().topics, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = ResultCache::new(CacheConfig { capacity: None, ttl: Some(Duration::ZERO) });
        cache.store("a", claims("a"));
        assert!(cache.get("a").is_none());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let cache = Arc::new(ResultCache::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let topic = format!("topic-{}", i % 4);
                    cache.store(&topic, claims(&topic));
                    assert!(cache.get(&topic).is_some());
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.stats().entries, 4);
    }
}
