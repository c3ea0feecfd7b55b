// Tag-invalidated response cache
//
// Responses are stored by request key (method + URL) and filed under zero
// or more topic tags. Invalidating a tag evicts every response carrying it,
// regardless of which endpoint produced the response. Entries also expire
// after their revalidate interval.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use dashmap::DashMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tokio::time::Instant;
use tracing::{debug, trace};
use url::Url;

// ── CacheTag ────────────────────────────────────────────────────────

/// Topic label attached to cached responses.
///
/// Tags model topics, not request identity: a write invalidates every
/// topic whose data it could have changed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CacheTag {
    Profile,
    Bookings,
    BlockedDates,
    Maps,
    Calculations,
    Notifications,
}

// ── CacheKey / CachedResponse ───────────────────────────────────────

/// Identity of a cached request: HTTP method plus full URL (query included).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(method: &reqwest::Method, url: &Url) -> Self {
        Self(format!("{method} {url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw response as received from the backend. Decoding happens per read so
/// one cached body can serve differently-typed callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub body: String,
}

// ── TagCache trait ──────────────────────────────────────────────────

/// Storage seam for the remote client's response cache.
///
/// Implementations must treat an invalidated or expired entry as absent.
/// Races between an invalidation and a concurrent read may serve one stale
/// read; nothing stronger is required.
pub trait TagCache: Send + Sync {
    /// Fresh response for `key`, if any.
    fn get(&self, key: &CacheKey) -> Option<CachedResponse>;

    /// Store `response` under `key`, filed under `tags`. `revalidate` of
    /// `None` means the entry lives until invalidated.
    fn set(
        &self,
        key: CacheKey,
        response: CachedResponse,
        tags: &[CacheTag],
        revalidate: Option<Duration>,
    );

    /// Evict every entry carrying `tag`. Returns the number evicted.
    fn invalidate(&self, tag: CacheTag) -> usize;

    /// Evict everything.
    fn clear(&self);
}

// ── MemoryCache ─────────────────────────────────────────────────────

struct Entry {
    response: CachedResponse,
    tags: Vec<CacheTag>,
    stored_at: Instant,
    revalidate: Option<Duration>,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.revalidate
            .is_none_or(|ttl| now.duration_since(self.stored_at) < ttl)
    }
}

/// In-process [`TagCache`] backed by `DashMap`.
///
/// Primary storage is keyed by request; a secondary index maps each tag to
/// the keys filed under it so invalidation never scans the whole cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, Entry>,
    by_tag: DashMap<CacheTag, HashSet<CacheKey>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, whether or not anything reads it again.
    /// Returns how many were evicted.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|entry| !entry.is_fresh(now))
            .map(|entry| entry.key().clone())
            .collect();
        let purged = expired
            .iter()
            .filter(|key| self.evict_where(key, |entry| !entry.is_fresh(now)))
            .count();
        if purged > 0 {
            debug!(purged, "expired cache entries purged");
        }
        purged
    }

    fn evict(&self, key: &CacheKey) -> bool {
        self.evict_where(key, |_| true)
    }

    /// Remove one entry if `should_evict` holds and drop it from every tag
    /// index it was filed under. Tag sets left empty are removed.
    fn evict_where(&self, key: &CacheKey, should_evict: impl FnOnce(&Entry) -> bool) -> bool {
        let Some((_, entry)) = self.entries.remove_if(key, |_, entry| should_evict(entry)) else {
            return false;
        };
        for tag in &entry.tags {
            let emptied = self.by_tag.get_mut(tag).is_some_and(|mut keys| {
                keys.remove(key);
                keys.is_empty()
            });
            if emptied {
                self.by_tag.remove_if(tag, |_, keys| keys.is_empty());
            }
        }
        true
    }
}

impl TagCache for MemoryCache {
    fn get(&self, key: &CacheKey) -> Option<CachedResponse> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if entry.is_fresh(now) {
                trace!(%key, "cache hit");
                return Some(entry.response.clone());
            }
        }
        debug!(%key, "cache entry expired");
        self.evict_where(key, |entry| !entry.is_fresh(now));
        None
    }

    fn set(
        &self,
        key: CacheKey,
        response: CachedResponse,
        tags: &[CacheTag],
        revalidate: Option<Duration>,
    ) {
        // Re-filing under a different tag set must not leave stale index refs.
        self.evict(&key);
        self.purge_expired();

        for tag in tags {
            self.by_tag.entry(*tag).or_default().insert(key.clone());
        }
        self.entries.insert(
            key,
            Entry {
                response,
                tags: tags.to_vec(),
                stored_at: Instant::now(),
                revalidate,
            },
        );
    }

    fn invalidate(&self, tag: CacheTag) -> usize {
        let Some((_, keys)) = self.by_tag.remove(&tag) else {
            return 0;
        };
        let evicted = keys.iter().filter(|key| self.evict(key)).count();
        debug!(%tag, evicted, "cache tag invalidated");
        evicted
    }

    fn clear(&self) {
        self.entries.clear();
        self.by_tag.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn key(path: &str) -> CacheKey {
        let url = Url::parse(&format!("http://api.test{path}")).unwrap();
        CacheKey::new(&reqwest::Method::GET, &url)
    }

    fn body(s: &str) -> CachedResponse {
        CachedResponse {
            status: 200,
            body: s.into(),
        }
    }

    #[test]
    fn tags_render_in_kebab_case() {
        assert_eq!(CacheTag::BlockedDates.to_string(), "blocked-dates");
        assert_eq!(CacheTag::from_str("notifications").unwrap(), CacheTag::Notifications);
        assert_eq!(CacheTag::iter().count(), 6);
    }

    #[test]
    fn set_then_get_returns_the_response() {
        let cache = MemoryCache::new();
        cache.set(key("/maps"), body("maps-v1"), &[CacheTag::Maps], None);
        assert_eq!(cache.get(&key("/maps")).unwrap().body, "maps-v1");
        assert!(cache.get(&key("/other")).is_none());
    }

    #[test]
    fn invalidate_evicts_every_entry_carrying_the_tag() {
        let cache = MemoryCache::new();
        cache.set(key("/bookings?page=1"), body("a"), &[CacheTag::Bookings], None);
        cache.set(
            key("/bookings/calendar?month=7&year=2025"),
            body("b"),
            &[CacheTag::Bookings],
            None,
        );
        cache.set(key("/maps"), body("c"), &[CacheTag::Maps], None);

        assert_eq!(cache.invalidate(CacheTag::Bookings), 2);
        assert!(cache.get(&key("/bookings?page=1")).is_none());
        assert!(cache.get(&key("/bookings/calendar?month=7&year=2025")).is_none());
        assert_eq!(cache.get(&key("/maps")).unwrap().body, "c");
    }

    #[test]
    fn multi_tag_entry_is_evicted_by_either_tag() {
        let cache = MemoryCache::new();
        let k = key("/blocked-dates?month=7&year=2025");
        cache.set(
            k.clone(),
            body("x"),
            &[CacheTag::BlockedDates, CacheTag::Bookings],
            None,
        );

        assert_eq!(cache.invalidate(CacheTag::Bookings), 1);
        assert!(cache.get(&k).is_none());
        // The other tag's index no longer references the evicted key.
        assert_eq!(cache.invalidate(CacheTag::BlockedDates), 0);
    }

    #[test]
    fn invalidating_unknown_tag_is_a_no_op() {
        let cache = MemoryCache::new();
        assert_eq!(cache.invalidate(CacheTag::Profile), 0);
    }

    #[test]
    fn refiling_a_key_drops_old_tags() {
        let cache = MemoryCache::new();
        let k = key("/users/profile");
        cache.set(k.clone(), body("v1"), &[CacheTag::Maps], None);
        cache.set(k.clone(), body("v2"), &[CacheTag::Profile], None);

        assert_eq!(cache.invalidate(CacheTag::Maps), 0);
        assert_eq!(cache.get(&k).unwrap().body, "v2");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_revalidate_interval() {
        let cache = MemoryCache::new();
        let k = key("/notifications");
        cache.set(
            k.clone(),
            body("n"),
            &[CacheTag::Notifications],
            Some(Duration::from_secs(60)),
        );

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get(&k).is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get(&k).is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_purged_without_being_read() {
        let cache = MemoryCache::new();
        let ttl = Some(Duration::from_secs(60));
        cache.set(key("/bookings?search=a"), body("a"), &[CacheTag::Bookings], ttl);
        cache.set(key("/bookings?search=ab"), body("ab"), &[CacheTag::Bookings], ttl);

        tokio::time::advance(Duration::from_secs(61)).await;
        cache.set(key("/maps"), body("m"), &[CacheTag::Maps], None);

        assert_eq!(cache.len(), 1);
        assert!(!cache.by_tag.contains_key(&CacheTag::Bookings));
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn evicting_the_last_key_drops_the_tag_set() {
        let cache = MemoryCache::new();
        let k = key("/calculations");
        cache.set(k.clone(), body("v1"), &[CacheTag::Calculations], None);
        cache.set(k, body("v2"), &[CacheTag::Maps], None);

        assert!(!cache.by_tag.contains_key(&CacheTag::Calculations));
        assert_eq!(cache.by_tag.len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let cache = MemoryCache::new();
        cache.set(key("/a"), body("a"), &[CacheTag::Maps], None);
        cache.set(key("/b"), body("b"), &[CacheTag::Calculations], None);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.invalidate(CacheTag::Maps), 0);
    }
}
