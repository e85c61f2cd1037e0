//! Memoized measurements keyed by scaling-data cache keys.
//!
//! Measuring a candidate means rendering it off-screen and forcing a layout,
//! which is the expensive part of negotiation. The cache remembers the size
//! each keyed candidate produced so that later passes can walk a chain of
//! reductions without touching the rendering layer at all.

use std::collections::HashMap;
use std::sync::Arc;

use horizon_fabric_core::logging::targets;
use parking_lot::{Mutex, MutexGuard};

/// Data describing how much content a [`ResizeGroup`](super::ResizeGroup)
/// should show.
///
/// The shape is entirely up to the caller. The only requirement is an
/// optional cache key: data that returns `None` is measured every time it is
/// considered and never stored.
///
/// # Cache key contract
///
/// Two values that report the same key must render to the same size. The
/// cache does not detect collisions; a shared key for different shapes makes
/// the negotiation commit layouts based on the wrong measurement.
pub trait ScalingData: Clone + PartialEq {
    /// The key used to memoize this value's measurement.
    fn cache_key(&self) -> Option<&str>;
}

/// Mapping from cache key to measured size.
///
/// Entries never expire on their own; they live as long as the cache.
#[derive(Debug, Clone, Default)]
pub struct MeasurementCache {
    measurements: HashMap<String, f32>,
}

impl MeasurementCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the stored size for `data`.
    ///
    /// Returns `None` when `data` has no cache key or the key was never
    /// measured. This never measures anything itself.
    pub fn cached_measurement<D: ScalingData>(&self, data: &D) -> Option<f32> {
        let key = data.cache_key()?;
        let cached = self.measurements.get(key).copied();
        match cached {
            Some(width) => {
                tracing::trace!(target: targets::CACHE, key, width, "measurement cache hit")
            }
            None => tracing::trace!(target: targets::CACHE, key, "measurement cache miss"),
        }
        cached
    }

    /// Store the measured size of `data`, overwriting any previous value.
    ///
    /// Does nothing when `data` has no cache key.
    pub fn add_measurement<D: ScalingData>(&mut self, data: &D, width: f32) {
        if let Some(key) = data.cache_key() {
            self.measurements.insert(key.to_owned(), width);
        }
    }

    /// Number of stored measurements.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether no measurement has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Whether a measurement is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.measurements.contains_key(key)
    }

    /// Forget every stored measurement.
    ///
    /// Call this when something that affects rendering for all keys changes,
    /// such as the font or theme.
    pub fn clear(&mut self) {
        self.measurements.clear();
    }
}

/// A measurement cache that several resolvers can share.
///
/// Resize groups own a private cache by default. Components that render the
/// same logical data family (for example every command bar in a toolbar
/// strip built from the same item set) can opt into sharing one of these so
/// that a measurement taken by one instance is reused by the others.
#[derive(Debug, Clone, Default)]
pub struct SharedMeasurementCache {
    inner: Arc<Mutex<MeasurementCache>>,
}

impl SharedMeasurementCache {
    /// Create a new, empty shared cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing cache, for example one pre-seeded with known sizes.
    pub fn from_cache(cache: MeasurementCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Lock the cache for reading or writing.
    pub fn lock(&self) -> MutexGuard<'_, MeasurementCache> {
        self.inner.lock()
    }

    /// Look up the stored size for `data`.
    pub fn cached_measurement<D: ScalingData>(&self, data: &D) -> Option<f32> {
        self.inner.lock().cached_measurement(data)
    }

    /// Store the measured size of `data`.
    pub fn add_measurement<D: ScalingData>(&self, data: &D, width: f32) {
        self.inner.lock().add_measurement(data, width);
    }

    /// Whether `self` and `other` refer to the same underlying cache.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

static_assertions::assert_impl_all!(SharedMeasurementCache: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Keyed(Option<&'static str>);

    impl ScalingData for Keyed {
        fn cache_key(&self) -> Option<&str> {
            self.0
        }
    }

    #[test]
    fn test_stores_and_returns_keyed_measurements() {
        let mut cache = MeasurementCache::new();
        let data = Keyed(Some("five-items"));

        assert_eq!(cache.cached_measurement(&data), None);
        cache.add_measurement(&data, 120.0);
        assert_eq!(cache.cached_measurement(&data), Some(120.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_overwrites_existing_key() {
        let mut cache = MeasurementCache::new();
        let data = Keyed(Some("k"));

        cache.add_measurement(&data, 10.0);
        cache.add_measurement(&data, 12.5);
        assert_eq!(cache.cached_measurement(&data), Some(12.5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unkeyed_data_is_never_cached() {
        let mut cache = MeasurementCache::new();
        let data = Keyed(None);

        cache.add_measurement(&data, 50.0);
        assert!(cache.is_empty());
        assert_eq!(cache.cached_measurement(&data), None);
    }

    #[test]
    fn test_lookup_is_by_key_not_value() {
        let mut cache = MeasurementCache::new();
        cache.add_measurement(&Keyed(Some("shared")), 33.0);

        assert!(cache.contains_key("shared"));
        assert_eq!(cache.cached_measurement(&Keyed(Some("shared"))), Some(33.0));
        assert_eq!(cache.cached_measurement(&Keyed(Some("other"))), None);
    }

    #[test]
    fn test_clear() {
        let mut cache = MeasurementCache::new();
        cache.add_measurement(&Keyed(Some("a")), 1.0);
        cache.add_measurement(&Keyed(Some("b")), 2.0);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_cache_is_visible_to_clones() {
        let shared = SharedMeasurementCache::new();
        let other = shared.clone();

        shared.add_measurement(&Keyed(Some("wide")), 300.0);
        assert_eq!(other.cached_measurement(&Keyed(Some("wide"))), Some(300.0));
        assert!(shared.ptr_eq(&other));
        assert!(!shared.ptr_eq(&SharedMeasurementCache::new()));
    }
}
