//! Caching layer for reverse geocoding.
//!
//! A screen usually geocodes the same few spots over and over (the user
//! reopening the map from home or work), so labels are cached per
//! coordinate. Coordinates are bucketed at 1e-5 degrees (about a metre),
//! which bounds cardinality without merging distinct places.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::geo::{Coordinate, PlaceLabel};
use crate::geocoding::{GeocodingError, ReverseGeocoder};

/// Cache key: coordinate in 1e-5 degree units.
type CoordinateKey = (i64, i64);

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached labels.
    pub ttl: Duration,

    /// Maximum number of cached labels.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10 * 60),
            max_capacity: 256,
        }
    }
}

fn bucket(coordinate: Coordinate) -> CoordinateKey {
    (
        (coordinate.latitude() * 1e5).round() as i64,
        (coordinate.longitude() * 1e5).round() as i64,
    )
}

/// Reverse geocoder with caching.
///
/// Wraps any [`ReverseGeocoder`]. Only successful lookups are cached.
pub struct CachedGeocoder<G> {
    inner: G,
    labels: MokaCache<CoordinateKey, PlaceLabel>,
}

impl<G: ReverseGeocoder> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let labels = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, labels }
    }

    /// Access the wrapped geocoder for lookups that bypass the cache.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.labels.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.labels.invalidate_all();
    }
}

impl<G: ReverseGeocoder> ReverseGeocoder for CachedGeocoder<G> {
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceLabel, GeocodingError> {
        let key = bucket(coordinate);

        if let Some(label) = self.labels.get(&key).await {
            trace!(%coordinate, "geocode cache hit");
            return Ok(label);
        }

        let label = self.inner.reverse_geocode(coordinate).await?;
        self.labels.insert(key, label.clone()).await;

        Ok(label)
    }
}
