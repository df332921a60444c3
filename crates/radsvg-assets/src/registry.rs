//! Named document registry
//!
//! An explicitly owned, LRU-bounded map from resource name to parsed document.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use radsvg_svg::SvgDocument;
use tracing::debug;

use crate::error::AssetError;
use crate::resolver::{DirectoryResolver, ResourceResolver};

/// Registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of cached documents.
    pub capacity: usize,
    /// Directories searched by [`SvgRegistry::from_config`].
    pub search_paths: Vec<PathBuf>,
    /// Extension tried after the bare name.
    pub extension: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            search_paths: Vec::new(),
            extension: "svg".to_string(),
        }
    }
}

impl RegistryConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Current number of cached documents
    pub count: usize,
}

impl CacheStats {
    /// Get the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

struct Inner {
    cache: LruCache<String, Arc<SvgDocument>>,
    stats: CacheStats,
}

/// Name to document registry with insert-on-first-load and LRU eviction.
///
/// Documents are handed out as `Arc`s, so evicting one never invalidates a document a
/// caller is still rendering. Concurrent `load`s of the same name parse it once.
pub struct SvgRegistry<R> {
    resolver: R,
    inner: Mutex<Inner>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SvgRegistry<DirectoryResolver> {
    /// Registry backed by a [`DirectoryResolver`] over the configured search paths.
    pub fn from_config(config: RegistryConfig) -> Self {
        let resolver = DirectoryResolver::new(config.search_paths, config.extension);
        Self::new(resolver, config.capacity)
    }
}

impl<R: ResourceResolver> SvgRegistry<R> {
    /// Create a registry holding at most `capacity` documents (minimum 1).
    pub fn new(resolver: R, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            resolver,
            inner: Mutex::new(Inner {
                cache: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Return the cached document for `name`, resolving and parsing it on first use.
    ///
    /// Each call counts once in [`CacheStats`]: a miss only for the call that parsed.
    pub fn load(&self, name: &str) -> Result<Arc<SvgDocument>, AssetError> {
        if let Some(doc) = self.lookup(name) {
            return Ok(doc);
        }

        // One parse per name: later callers wait here, then find the cached result.
        let gate = lock(&self.in_flight)
            .entry(name.to_string())
            .or_default()
            .clone();
        let _guard = lock(&gate);

        {
            // Another caller parsed it while we waited: served from cache after all.
            let mut inner = lock(&self.inner);
            if let Some(doc) = inner.cache.get(name).cloned() {
                inner.stats.misses = inner.stats.misses.saturating_sub(1);
                inner.stats.hits += 1;
                debug!(name, "SVG registry hit after wait");
                return Ok(doc);
            }
        }

        let result = self
            .resolver
            .resolve(name)
            .and_then(|data| SvgDocument::parse_bytes(&data).map_err(AssetError::from));

        let outcome = result.map(|doc| {
            let doc = Arc::new(doc);
            self.put(name.to_string(), doc.clone());
            doc
        });
        lock(&self.in_flight).remove(name);
        outcome
    }

    /// Cached document for `name`, without loading. Counts as a hit or miss.
    pub fn get(&self, name: &str) -> Option<Arc<SvgDocument>> {
        self.lookup(name)
    }

    /// Insert or replace a document under `name`.
    pub fn insert(&self, name: impl Into<String>, document: SvgDocument) -> Arc<SvgDocument> {
        let doc = Arc::new(document);
        self.put(name.into(), doc.clone());
        doc
    }

    /// Remove `name`, returning the document if it was cached.
    pub fn evict(&self, name: &str) -> Option<Arc<SvgDocument>> {
        let mut inner = lock(&self.inner);
        let removed = inner.cache.pop(name);
        inner.stats.count = inner.cache.len();
        if removed.is_some() {
            debug!(name, "Evicted SVG document");
        }
        removed
    }

    pub fn clear(&self) {
        let mut inner = lock(&self.inner);
        inner.cache.clear();
        inner.stats.count = 0;
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.inner).cache.contains(name)
    }

    pub fn stats(&self) -> CacheStats {
        lock(&self.inner).stats.clone()
    }

    fn lookup(&self, name: &str) -> Option<Arc<SvgDocument>> {
        let mut inner = lock(&self.inner);
        match inner.cache.get(name).cloned() {
            Some(doc) => {
                inner.stats.hits += 1;
                debug!(name, "SVG registry hit");
                Some(doc)
            }
            None => {
                inner.stats.misses += 1;
                debug!(name, "SVG registry miss");
                None
            }
        }
    }

    fn put(&self, name: String, doc: Arc<SvgDocument>) {
        let mut inner = lock(&self.inner);
        if let Some((evicted, _)) = inner.cache.push(name.clone(), doc) {
            if evicted != name {
                debug!(name = %evicted, "Evicted least recently used SVG document");
            }
        }
        inner.stats.count = inner.cache.len();
    }
}

/// Lock, recovering the data if another thread panicked while holding it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    /// In-memory resolver that counts lookups.
    struct MapResolver {
        sources: HashMap<String, String>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl MapResolver {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                sources: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    impl ResourceResolver for MapResolver {
        fn resolve(&self, name: &str) -> Result<Vec<u8>, AssetError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.sources
                .get(name)
                .map(|s| s.clone().into_bytes())
                .ok_or_else(|| AssetError::NotFound(name.to_string()))
        }
    }

    fn icon(size: u32) -> String {
        format!(r#"<svg width="{size}" height="{size}"/>"#)
    }

    #[test]
    fn test_load_caches() {
        let resolver = MapResolver::new(&[("a", icon(4).as_str())]);
        let registry = SvgRegistry::new(resolver, 4);

        let first = registry.load("a").unwrap();
        let second = registry.load("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.width(), 4);
        assert_eq!(registry.resolver().calls.load(Ordering::SeqCst), 1);

        let stats = registry.stats();
        assert_eq!((stats.hits, stats.misses, stats.count), (1, 1, 1));
        assert!((stats.hit_rate() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_lru_eviction() {
        let (a, b, c) = (icon(1), icon(2), icon(3));
        let resolver = MapResolver::new(&[("a", a.as_str()), ("b", b.as_str()), ("c", c.as_str())]);
        let registry = SvgRegistry::new(resolver, 2);

        registry.load("a").unwrap();
        registry.load("b").unwrap();
        registry.load("a").unwrap();
        registry.load("c").unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(!registry.contains("b"));
        assert!(registry.contains("c"));
    }

    #[test]
    fn test_errors_not_cached() {
        let resolver = MapResolver::new(&[("bad", "<html/>")]);
        let registry = SvgRegistry::new(resolver, 2);

        assert!(matches!(registry.load("missing"), Err(AssetError::NotFound(_))));
        assert!(matches!(registry.load("bad"), Err(AssetError::Parse(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_evict_clear() {
        let registry = SvgRegistry::new(MapResolver::new(&[]), 8);
        let doc = SvgDocument::parse(&icon(9)).unwrap();

        let held = registry.insert("x", doc);
        assert_eq!(registry.get("x").map(|d| d.width()), Some(9));

        let evicted = registry.evict("x").unwrap();
        assert!(Arc::ptr_eq(&held, &evicted));
        assert!(registry.get("x").is_none());
        // Holders keep their document after eviction.
        assert_eq!(held.width(), 9);

        registry.insert("y", SvgDocument::parse(&icon(1)).unwrap());
        registry.clear();
        assert_eq!(registry.stats().count, 0);
    }

    #[test]
    fn test_concurrent_loads_parse_once() {
        let mut resolver = MapResolver::new(&[("shared", icon(16).as_str())]);
        resolver.delay = Duration::from_millis(20);
        let registry = Arc::new(SvgRegistry::new(resolver, 4));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.load("shared").unwrap())
            })
            .collect();
        let docs: Vec<Arc<SvgDocument>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.resolver().calls.load(Ordering::SeqCst), 1);
        assert!(docs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_concurrent_waiters_count_as_hits() {
        let mut resolver = MapResolver::new(&[("shared", icon(24).as_str())]);
        resolver.delay = Duration::from_millis(50);
        let registry = Arc::new(SvgRegistry::new(resolver, 4));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.load("shared").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = registry.stats();
        assert_eq!((stats.hits, stats.misses), (5, 1));
        assert_eq!(registry.resolver().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logo.svg"), icon(32)).unwrap();

        let config = RegistryConfig::default()
            .with_capacity(1)
            .with_search_path(dir.path());
        let registry = SvgRegistry::from_config(config);
        assert_eq!(registry.load("logo").unwrap().height(), 32);
    }
}
