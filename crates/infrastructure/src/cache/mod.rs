//! In-process results cache built on `moka`.
//!
//! The console keeps four regions with independent lifetimes. Each region is
//! a [`CacheStore`] whose entries are grouped by namespace so that one family
//! (say, instance types) can be dropped without touching the rest.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cirrus_application::ports::{CacheError, CacheStore};
use cirrus_domain::settings::{CacheRegionSettings, CacheSettings};
use moka::future::Cache;
use tracing::debug;

type EntryKey = (String, String);

/// The configured cache regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRegionName {
    /// Seconds-scale data.
    ShortTerm,
    /// Default lifetime.
    DefaultTerm,
    /// Hour-scale data.
    LongTerm,
    /// Slow-changing catalogs.
    ExtraLongTerm,
}

impl CacheRegionName {
    /// Every region, shortest lifetime first.
    pub const ALL: [Self; 4] = [
        Self::ShortTerm,
        Self::DefaultTerm,
        Self::LongTerm,
        Self::ExtraLongTerm,
    ];

    /// Settings-style name of the region.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short_term",
            Self::DefaultTerm => "default_term",
            Self::LongTerm => "long_term",
            Self::ExtraLongTerm => "extra_long_term",
        }
    }
}

impl fmt::Display for CacheRegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One TTL-bounded region. Clones share the same entries.
#[derive(Clone)]
pub struct CacheRegion {
    name: CacheRegionName,
    ttl: Duration,
    entries: Cache<EntryKey, Arc<[u8]>>,
}

impl fmt::Debug for CacheRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegion")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl CacheRegion {
    /// Creates an empty region.
    #[must_use]
    pub fn new(name: CacheRegionName, ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .name(name.as_str())
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { name, ttl, entries }
    }

    /// Region name.
    #[must_use]
    pub const fn name(&self) -> CacheRegionName {
        self.name
    }

    /// Entry lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drops every entry in the region.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    /// Number of live entries once pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl CacheStore for CacheRegion {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entry_key = (namespace.to_string(), key.to_string());
        Ok(self.entries.get(&entry_key).await.map(|value| value.to_vec()))
    }

    async fn set(&self, namespace: &str, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let entry_key = (namespace.to_string(), key.to_string());
        self.entries.insert(entry_key, Arc::from(value)).await;
        Ok(())
    }

    async fn invalidate(&self, namespace: &str) -> Result<(), CacheError> {
        let namespace = namespace.to_string();
        debug!(region = %self.name, namespace = %namespace, "invalidating namespace");
        self.entries
            .invalidate_entries_if(move |(ns, _), _| *ns == namespace)
            .map(|_| ())
            .map_err(|e| CacheError::Backend(e.to_string()))
    }
}

/// The four regions configured from [`CacheSettings`].
#[derive(Debug, Clone)]
pub struct CacheRegions {
    short_term: CacheRegion,
    default_term: CacheRegion,
    long_term: CacheRegion,
    extra_long_term: CacheRegion,
}

impl CacheRegions {
    /// Builds every region with its configured lifetime.
    #[must_use]
    pub fn from_settings(settings: &CacheSettings) -> Self {
        let region = |name, expiry: CacheRegionSettings| {
            CacheRegion::new(name, Duration::from_secs(expiry.expire), settings.max_capacity)
        };
        Self {
            short_term: region(CacheRegionName::ShortTerm, settings.short_term),
            default_term: region(CacheRegionName::DefaultTerm, settings.default_term),
            long_term: region(CacheRegionName::LongTerm, settings.long_term),
            extra_long_term: region(CacheRegionName::ExtraLongTerm, settings.extra_long_term),
        }
    }

    /// Returns a region.
    #[must_use]
    pub const fn region(&self, name: CacheRegionName) -> &CacheRegion {
        match name {
            CacheRegionName::ShortTerm => &self.short_term,
            CacheRegionName::DefaultTerm => &self.default_term,
            CacheRegionName::LongTerm => &self.long_term,
            CacheRegionName::ExtraLongTerm => &self.extra_long_term,
        }
    }

    /// Region used to memoize choice catalogs.
    #[must_use]
    pub fn choices_store(&self) -> CacheRegion {
        self.extra_long_term.clone()
    }

    /// Empties every region, e.g. after the session's credentials expire.
    pub fn invalidate_all(&self) {
        for name in CacheRegionName::ALL {
            self.region(name).invalidate_all();
        }
        debug!("invalidated all cache regions");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region() -> CacheRegion {
        CacheRegion::new(CacheRegionName::DefaultTerm, Duration::from_secs(60), 100)
    }

    #[tokio::test]
    async fn test_get_and_set() {
        let region = region();
        assert_eq!(region.get("zones", "euca").await.unwrap(), None);
        region.set("zones", "euca", b"[1]".to_vec()).await.unwrap();
        assert_eq!(
            region.get("zones", "euca").await.unwrap(),
            Some(b"[1]".to_vec())
        );
        assert_eq!(region.get("zones", "other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalidate_namespace_only() {
        let region = region();
        region.set("instance_types", "euca", b"a".to_vec()).await.unwrap();
        region.set("availability_zones", "euca", b"b".to_vec()).await.unwrap();

        region.invalidate("instance_types").await.unwrap();

        assert_eq!(region.get("instance_types", "euca").await.unwrap(), None);
        assert_eq!(
            region.get("availability_zones", "euca").await.unwrap(),
            Some(b"b".to_vec())
        );
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let region = CacheRegion::new(CacheRegionName::ShortTerm, Duration::from_millis(50), 10);
        region.set("zones", "euca", b"a".to_vec()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(region.get("zones", "euca").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_regions_from_settings() {
        let regions = CacheRegions::from_settings(&CacheSettings::default());
        assert_eq!(
            regions.region(CacheRegionName::ShortTerm).ttl(),
            Duration::from_secs(60)
        );
        assert_eq!(
            regions.region(CacheRegionName::ExtraLongTerm).ttl(),
            Duration::from_secs(43_200)
        );
        assert_eq!(regions.choices_store().name(), CacheRegionName::ExtraLongTerm);
    }

    #[tokio::test]
    async fn test_invalidate_all_regions() {
        let regions = CacheRegions::from_settings(&CacheSettings::default());
        for name in CacheRegionName::ALL {
            regions.region(name).set("ns", "key", vec![1]).await.unwrap();
        }
        regions.invalidate_all();
        for name in CacheRegionName::ALL {
            assert_eq!(regions.region(name).get("ns", "key").await.unwrap(), None);
            assert_eq!(regions.region(name).entry_count().await, 0);
        }
    }
}
