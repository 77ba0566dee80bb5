//! Geocoding and distance.
//!
//! Turns a team's postcode into a distance from a reference location. The
//! lookup service sits behind the [`Geocoder`] trait; the bundled
//! [`LocationTable`] serves lookups from a schedule's `locations.json`.
//!
//! Lookups are memoised by [`CachedGeocoder`], which owns an explicit
//! [`GeoCache`]: loaded when constructed, written back after every new
//! entry. There is no process-wide cache.
//!
//! # Reference
//! Sinnott (1984), "Virtues of the Haversine", Sky and Telescope 68(2)

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::models::Team;
use crate::validation::{Diagnostic, DiagnosticKind};

/// Mean Earth radius (m), IUGG.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude (degrees north).
    pub lat: f64,
    /// Longitude (degrees east).
    pub lon: f64,
}

/// Great-circle distance between two points (m).
pub fn haversine_m(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Resolves a free-text location query to coordinates.
pub trait Geocoder {
    /// Looks up `query`. `None` when the location is unknown.
    fn geocode(&mut self, query: &str) -> Option<Coordinates>;
}

/// Offline geocoder backed by a fixed table.
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    entries: HashMap<String, Coordinates>,
}

impl LocationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a location.
    pub fn with_location(mut self, query: impl Into<String>, at: Coordinates) -> Self {
        self.entries.insert(query.into(), at);
        self
    }

    /// Reads a `{ "<query>": { "lat": .., "lon": .. } }` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    /// Number of known locations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for LocationTable {
    fn geocode(&mut self, query: &str) -> Option<Coordinates> {
        self.entries.get(query).copied()
    }
}

/// Persisted query → coordinates cache.
#[derive(Debug, Clone, Default)]
pub struct GeoCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, Coordinates>,
}

impl GeoCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache from `path`. A missing file gives an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    /// Cached coordinates for `query`.
    pub fn get(&self, query: &str) -> Option<Coordinates> {
        self.entries.get(query).copied()
    }

    /// Stores an entry and saves the cache.
    pub fn insert(&mut self, query: impl Into<String>, at: Coordinates) -> Result<(), ConfigError> {
        self.entries.insert(query.into(), at);
        self.save()
    }

    /// Writes the cache to its file, if it has one.
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&self.entries).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(path, raw).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoising wrapper around another geocoder.
///
/// Each distinct query reaches the inner geocoder at most once per process.
/// Hits are persisted through the cache; misses are only remembered in memory.
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: GeoCache,
    misses: HashSet<String>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Wraps `inner` with `cache`.
    pub fn new(inner: G, cache: GeoCache) -> Self {
        Self {
            inner,
            cache,
            misses: HashSet::new(),
        }
    }

    /// The underlying cache.
    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn geocode(&mut self, query: &str) -> Option<Coordinates> {
        if let Some(hit) = self.cache.get(query) {
            return Some(hit);
        }
        if self.misses.contains(query) {
            return None;
        }

        debug!(query, "geocoding");
        match self.inner.geocode(query) {
            Some(at) => {
                if let Err(e) = self.cache.insert(query, at) {
                    warn!(error = %e, "could not save geocoding cache");
                }
                Some(at)
            }
            None => {
                self.misses.insert(query.to_string());
                None
            }
        }
    }
}

/// Distances (m) from `reference` to each non-arranged team's postcode.
///
/// Teams whose distance cannot be determined are left out of the map and
/// reported as [`DiagnosticKind::MissingDistance`]; they are still matched,
/// just without a speed check.
pub fn resolve_distances<G: Geocoder>(
    teams: &[Team],
    reference: &str,
    geocoder: &mut G,
) -> (HashMap<String, f64>, Vec<Diagnostic>) {
    let mut distances = HashMap::new();
    let mut diagnostics = Vec::new();

    let Some(origin) = geocoder.geocode(reference) else {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::MissingDistance,
            reference,
            "reference location not found; distances unknown",
        ));
        return (distances, diagnostics);
    };

    for team in teams.iter().filter(|t| !t.arranged) {
        let located = team.postcode.as_deref().and_then(|p| geocoder.geocode(p));
        match located {
            Some(at) => {
                distances.insert(team.id.clone(), haversine_m(origin, at));
            }
            None => diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingDistance,
                &team.id,
                "has no distance",
            )),
        }
    }

    (distances, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: Coordinates = Coordinates { lat: 51.5074, lon: -0.1278 };
    const PARIS: Coordinates = Coordinates { lat: 48.8566, lon: 2.3522 };

    /// Counts lookups that reach it.
    struct Counting {
        table: LocationTable,
        calls: usize,
    }

    impl Geocoder for Counting {
        fn geocode(&mut self, query: &str) -> Option<Coordinates> {
            self.calls += 1;
            self.table.geocode(query)
        }
    }

    #[test]
    fn test_haversine_known_pair() {
        let d = haversine_m(LONDON, PARIS);
        // ~343.5 km
        assert!((d - 343_500.0).abs() < 3_500.0, "got {d}");
        assert_eq!(haversine_m(LONDON, LONDON), 0.0);
        assert!((haversine_m(PARIS, LONDON) - d).abs() < 1e-6);
    }

    #[test]
    fn test_cached_geocoder_looks_up_once() {
        let inner = Counting {
            table: LocationTable::new().with_location("SW1A 1AA", LONDON),
            calls: 0,
        };
        let mut geo = CachedGeocoder::new(inner, GeoCache::in_memory());

        assert_eq!(geo.geocode("SW1A 1AA"), Some(LONDON));
        assert_eq!(geo.geocode("SW1A 1AA"), Some(LONDON));
        assert_eq!(geo.geocode("nowhere"), None);
        assert_eq!(geo.geocode("nowhere"), None);
        assert_eq!(geo.inner.calls, 2);
        assert_eq!(geo.cache().len(), 1);
    }

    #[test]
    fn test_cache_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let cache = GeoCache::load(&path).unwrap();
        assert!(cache.is_empty());
        let mut geo = CachedGeocoder::new(LocationTable::new().with_location("75001", PARIS), cache);
        geo.geocode("75001");

        let reloaded = GeoCache::load(&path).unwrap();
        assert_eq!(reloaded.get("75001"), Some(PARIS));
    }

    #[test]
    fn test_location_table_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations.json");
        std::fs::write(&path, r#"{"SW1A 1AA": {"lat": 51.5074, "lon": -0.1278}}"#).unwrap();
        let mut table = LocationTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.geocode("SW1A 1AA"), Some(LONDON));

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(LocationTable::load(&path), Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_resolve_distances() {
        let teams = vec![
            Team::new("PAR").with_postcode("75001"),
            Team::new("LON").with_postcode("SW1A 1AA"),
            Team::new("UNK").with_postcode("00000"),
            Team::new("NOP"),
            Team::new("ARR").with_arranged(true).with_postcode("75001"),
        ];
        let mut geo = LocationTable::new()
            .with_location("75001", PARIS)
            .with_location("SW1A 1AA", LONDON);

        let (distances, diagnostics) = resolve_distances(&teams, "SW1A 1AA", &mut geo);
        assert_eq!(distances.len(), 2);
        assert_eq!(distances["LON"], 0.0);
        assert!(distances["PAR"] > 300_000.0);
        let missing: Vec<&str> = diagnostics.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(missing, vec!["UNK", "NOP"]);
    }

    #[test]
    fn test_resolve_distances_unknown_reference() {
        let teams = vec![Team::new("PAR").with_postcode("75001")];
        let mut geo = LocationTable::new().with_location("75001", PARIS);
        let (distances, diagnostics) = resolve_distances(&teams, "Atlantis", &mut geo);
        assert!(distances.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingDistance);
    }
}
