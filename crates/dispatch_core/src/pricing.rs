//! Trip pricing: fixed per-kilometre rates per service tier.

use serde::{Deserialize, Serialize};

/// Per-kilometre rate for the standard tier (currency units).
pub const STANDARD_RATE_PER_KM: f64 = 30.0;

/// Per-kilometre rate for the comfort tier (currency units).
pub const COMFORT_RATE_PER_KM: f64 = 45.0;

/// Named pricing class with a fixed per-kilometre rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Standard,
    Comfort,
}

impl Tier {
    pub fn rate_per_km(self) -> f64 {
        match self {
            Tier::Standard => STANDARD_RATE_PER_KM,
            Tier::Comfort => COMFORT_RATE_PER_KM,
        }
    }
}

/// Fare for a trip: `distance_km * rate`. Full precision; round only when
/// rendering with [`display_amount`].
pub fn fare(distance_km: f64, tier: Tier) -> f64 {
    distance_km * tier.rate_per_km()
}

/// Two-decimal amount for presentation boundaries.
pub fn display_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
