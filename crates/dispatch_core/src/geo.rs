//! Geographic primitives: coordinates, haversine distance, service-area check.
//!
//! Everything here is pure and deterministic; no I/O, no shared state. The
//! service area is a fixed rectangular approximation of the operating region
//! (Nepal), checked before any paid computation happens.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kathmandu city center; fixture anchor for tests and demos.
pub const KATHMANDU_CENTER: Coord = Coord {
    lat: 27.7172,
    lon: 85.3240,
};

/// Operating region bounding box (Nepal).
pub const SERVICE_AREA: BoundingBox = BoundingBox {
    lat_min: 26.347,
    lat_max: 30.447,
    lon_min: 80.058,
    lon_max: 88.201,
};

/// A WGS-84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Plain coordinate label, used when no geocoded address is available.
    pub fn label(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lon)
    }
}

/// Axis-aligned lat/lon rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, coord: Coord) -> bool {
        (self.lat_min..=self.lat_max).contains(&coord.lat)
            && (self.lon_min..=self.lon_max).contains(&coord.lon)
    }
}

/// Great-circle distance between two coordinates in kilometres (haversine).
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    let (lat1, lon1) = (a.lat.to_radians(), a.lon.to_radians());
    let (lat2, lon2) = (b.lat.to_radians(), b.lon.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Whether a coordinate falls inside the operating region.
pub fn in_service_area(coord: Coord) -> bool {
    SERVICE_AREA.contains(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_km(KATHMANDU_CENTER, KATHMANDU_CENTER), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let bhaktapur = Coord::new(27.6710, 85.4298);
        let there = distance_km(KATHMANDU_CENTER, bhaktapur);
        let back = distance_km(bhaktapur, KATHMANDU_CENTER);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn kathmandu_to_bhaktapur_is_about_eleven_km() {
        let bhaktapur = Coord::new(27.6710, 85.4298);
        let d = distance_km(KATHMANDU_CENTER, bhaktapur);
        assert!(
            (11.0..12.5).contains(&d),
            "expected roughly 11-12 km, got {d}"
        );
    }

    #[test]
    fn service_area_accepts_kathmandu_and_rejects_delhi() {
        assert!(in_service_area(KATHMANDU_CENTER));
        assert!(!in_service_area(Coord::new(28.6139, 77.2090)));
    }

    #[test]
    fn service_area_boundary_is_inclusive() {
        assert!(in_service_area(Coord::new(26.347, 80.058)));
        assert!(in_service_area(Coord::new(30.447, 88.201)));
        assert!(!in_service_area(Coord::new(30.448, 85.0)));
    }

    #[test]
    fn coordinate_label_has_five_decimals() {
        assert_eq!(KATHMANDU_CENTER.label(), "27.71720, 85.32400");
    }
}
