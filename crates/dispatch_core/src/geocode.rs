//! Pluggable geocoding/routing collaborator.
//!
//! Two implementations, selectable via [`GeocoderKind`]:
//!
//! - **`OfflineGeocoder`**: No network. Reverse/forward lookups return
//!   `None` (callers fall back to raw coordinate labels) and routes are the
//!   straight two-point line. Zero dependencies, always available.
//! - **`LiveGeocoder`** (feature `live-geo`): Nominatim reverse/forward
//!   lookups plus OSRM driving routes over HTTP, with bounded timeouts and
//!   one retry on the route call.
//!
//! Every failure path degrades to `None`; ride creation must never fail
//! because this collaborator is unreachable.

use serde::{Deserialize, Serialize};

use crate::geo::Coord;

/// A forward-geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coord: Coord,
    pub address: String,
}

/// Capability consumed by the dispatch engine; implementations must be
/// `Send + Sync` so one instance can serve concurrent callers.
pub trait Geocoder: Send + Sync {
    /// Human-readable address for a coordinate, if one can be resolved.
    fn reverse(&self, coord: Coord) -> Option<String>;

    /// Coordinate and address for a free-text query, if one can be resolved.
    fn forward(&self, query: &str) -> Option<Place>;

    /// Drivable polyline between two coordinates. `None` means the caller
    /// should draw the straight line itself.
    fn route(&self, from: Coord, to: Coord) -> Option<Vec<Coord>>;
}

/// Which geocoding backend to use.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub enum GeocoderKind {
    /// Coordinate-label fallback behaviour, no network.
    #[default]
    Offline,
    /// Nominatim + OSRM HTTP endpoints.
    #[cfg(feature = "live-geo")]
    Live {
        nominatim_endpoint: String,
        osrm_endpoint: String,
    },
}

/// Build the geocoder described by `kind`.
pub fn build_geocoder(kind: &GeocoderKind) -> Box<dyn Geocoder> {
    match kind {
        GeocoderKind::Offline => Box::new(OfflineGeocoder),
        #[cfg(feature = "live-geo")]
        GeocoderKind::Live {
            nominatim_endpoint,
            osrm_endpoint,
        } => Box::new(live::LiveGeocoder::new(nominatim_endpoint, osrm_endpoint)),
    }
}

/// Offline fallback: no addresses, straight-line routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGeocoder;

impl Geocoder for OfflineGeocoder {
    fn reverse(&self, _coord: Coord) -> Option<String> {
        None
    }

    fn forward(&self, _query: &str) -> Option<Place> {
        None
    }

    fn route(&self, from: Coord, to: Coord) -> Option<Vec<Coord>> {
        Some(vec![from, to])
    }
}

#[cfg(feature = "live-geo")]
pub mod live {
    //! Nominatim/OSRM HTTP client with an LRU cache on reverse lookups.

    use std::num::NonZeroUsize;
    use std::sync::Mutex;
    use std::time::Duration;

    use lru::LruCache;
    use reqwest::{blocking::Client, Url};
    use serde::Deserialize;
    use tracing::warn;

    use super::{Geocoder, Place};
    use crate::geo::Coord;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
    const ROUTE_RETRIES: usize = 1;
    const REVERSE_CACHE_SIZE: usize = 1_000;

    #[derive(Deserialize)]
    struct NominatimReverse {
        display_name: Option<String>,
    }

    #[derive(Deserialize)]
    struct NominatimSearchHit {
        lat: String,
        lon: String,
        display_name: String,
    }

    #[derive(Deserialize)]
    struct OsrmRouteResponse {
        #[serde(default)]
        routes: Vec<OsrmRoute>,
    }

    #[derive(Deserialize)]
    struct OsrmRoute {
        geometry: OsrmGeometry,
    }

    #[derive(Deserialize)]
    struct OsrmGeometry {
        #[serde(rename = "type")]
        kind: String,
        /// GeoJSON order: `[lon, lat]`.
        coordinates: Vec<[f64; 2]>,
    }

    /// Thin blocking client over Nominatim (addresses) and OSRM (routes).
    #[derive(Debug)]
    pub struct LiveGeocoder {
        client: Client,
        nominatim: String,
        osrm: String,
        reverse_cache: Mutex<LruCache<(i64, i64), String>>,
    }

    impl LiveGeocoder {
        /// Create a client for the given endpoints
        /// (e.g. `https://nominatim.openstreetmap.org`,
        /// `https://router.project-osrm.org`).
        pub fn new(nominatim_endpoint: &str, osrm_endpoint: &str) -> Self {
            let client = Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(concat!("dispatch_core/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("failed to build geocoding client");
            Self {
                client,
                nominatim: nominatim_endpoint.trim_end_matches('/').to_string(),
                osrm: osrm_endpoint.trim_end_matches('/').to_string(),
                reverse_cache: Mutex::new(LruCache::new(
                    NonZeroUsize::new(REVERSE_CACHE_SIZE).expect("cache size must be non-zero"),
                )),
            }
        }

        /// Cache key at ~1m precision; nearby lookups share an address.
        fn cache_key(coord: Coord) -> (i64, i64) {
            ((coord.lat * 1e5) as i64, (coord.lon * 1e5) as i64)
        }

        fn fetch_reverse(&self, coord: Coord) -> Option<String> {
            let mut url = Url::parse(&format!("{}/reverse", self.nominatim)).ok()?;
            url.query_pairs_mut()
                .append_pair("format", "jsonv2")
                .append_pair("lat", &format!("{:.6}", coord.lat))
                .append_pair("lon", &format!("{:.6}", coord.lon));

            let response = match self.client.get(url).send().and_then(|r| r.error_for_status()) {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, "reverse geocode request failed");
                    return None;
                }
            };
            match response.json::<NominatimReverse>() {
                Ok(parsed) => parsed.display_name,
                Err(err) => {
                    warn!(error = %err, "reverse geocode response was not valid JSON");
                    None
                }
            }
        }

        fn fetch_route(&self, from: Coord, to: Coord) -> Option<Vec<Coord>> {
            let url = Url::parse(&format!(
                "{}/route/v1/driving/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
                self.osrm, from.lon, from.lat, to.lon, to.lat
            ))
            .ok()?;

            let response = match self
                .client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
            {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, "route request failed");
                    return None;
                }
            };
            let parsed: OsrmRouteResponse = match response.json() {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(error = %err, "route response was not valid JSON");
                    return None;
                }
            };
            let route = parsed.routes.into_iter().next()?;
            if route.geometry.kind != "LineString" {
                warn!(kind = %route.geometry.kind, "route geometry was not a LineString");
                return None;
            }
            Some(
                route
                    .geometry
                    .coordinates
                    .into_iter()
                    .map(|[lon, lat]| Coord::new(lat, lon))
                    .collect(),
            )
        }
    }

    impl Geocoder for LiveGeocoder {
        fn reverse(&self, coord: Coord) -> Option<String> {
            let key = Self::cache_key(coord);
            if let Ok(mut cache) = self.reverse_cache.lock() {
                if let Some(hit) = cache.get(&key) {
                    return Some(hit.clone());
                }
            }
            let address = self.fetch_reverse(coord)?;
            if let Ok(mut cache) = self.reverse_cache.lock() {
                cache.put(key, address.clone());
            }
            Some(address)
        }

        fn forward(&self, query: &str) -> Option<Place> {
            let mut url = Url::parse(&format!("{}/search", self.nominatim)).ok()?;
            url.query_pairs_mut()
                .append_pair("format", "jsonv2")
                .append_pair("q", query)
                .append_pair("limit", "1");

            let response = match self
                .client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
            {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, query, "forward geocode request failed");
                    return None;
                }
            };
            let hits: Vec<NominatimSearchHit> = match response.json() {
                Ok(hits) => hits,
                Err(err) => {
                    warn!(error = %err, "forward geocode response was not valid JSON");
                    return None;
                }
            };
            let hit = hits.into_iter().next()?;
            let lat = hit.lat.parse().ok()?;
            let lon = hit.lon.parse().ok()?;
            Some(Place {
                coord: Coord::new(lat, lon),
                address: hit.display_name,
            })
        }

        fn route(&self, from: Coord, to: Coord) -> Option<Vec<Coord>> {
            for attempt in 0..=ROUTE_RETRIES {
                if let Some(polyline) = self.fetch_route(from, to) {
                    return Some(polyline);
                }
                if attempt < ROUTE_RETRIES {
                    std::thread::sleep(Duration::from_millis(500));
                }
            }
            None
        }
    }
}
