//! Test helpers: fixture coordinates and pre-wired engines.
//!
//! Shared by unit tests and benchmarks to avoid repeating directory setup.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::clock::FixedClock;
use crate::engine::DispatchEngine;
use crate::geo::Coord;
use crate::geocode::OfflineGeocoder;
use crate::model::{DriverId, RiderId};
use crate::notify::InMemorySink;

/// Kathmandu city center.
pub const KATHMANDU: Coord = Coord {
    lat: 27.7172,
    lon: 85.3240,
};

/// Bhaktapur, roughly 11.5 km from [`KATHMANDU`] by great circle.
pub const BHAKTAPUR: Coord = Coord {
    lat: 27.6710,
    lon: 85.4298,
};

/// A fixed "now" so schedule validation is deterministic:
/// 2026-03-14 09:30:00.
///
/// # Panics
///
/// Panics if the constant is invalid (should never happen).
pub fn fixed_now() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
        .expect("valid fixture date")
        .and_hms_opt(9, 30, 0)
        .expect("valid fixture time")
}

/// Engine wired with the offline geocoder, an in-memory sink and the fixed
/// clock. The returned sink handle observes delivered notifications.
pub fn test_engine() -> (DispatchEngine, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let engine = DispatchEngine::new(
        Box::new(OfflineGeocoder),
        sink.clone(),
        Box::new(FixedClock(fixed_now())),
    );
    (engine, sink)
}

/// [`test_engine`] plus one registered rider and two idle drivers.
///
/// # Panics
///
/// Panics if registration fails (should never happen on a fresh engine).
pub fn seeded_engine() -> (DispatchEngine, Arc<InMemorySink>, RiderId, DriverId, DriverId) {
    let (engine, sink) = test_engine();
    let rider = engine
        .register_rider("Asha", "asha@example.com", "hash")
        .expect("fresh engine accepts first rider")
        .id;
    let driver_a = engine
        .register_driver("Bikram", "bikram@example.com", "BA-12-345", "hash")
        .expect("fresh engine accepts first driver")
        .id;
    let driver_b = engine
        .register_driver("Chet", "chet@example.com", "BA-22-222", "hash")
        .expect("fresh engine accepts second driver")
        .id;
    (engine, sink, rider, driver_a, driver_b)
}
