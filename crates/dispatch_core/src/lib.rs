pub mod clock;
pub mod engine;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod model;
pub mod notify;
pub mod pricing;
pub mod store;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
