//! Error kinds for dispatch operations.
//!
//! Contention outcomes (`DriverBusy`, `RideNotAvailable`) and the idempotent
//! `AlreadyTerminal` are expected results of normal concurrent use, reported
//! to the losing caller for a retry-or-inform decision. Validation failures
//! are detected before any mutation and leave stored state untouched.

use thiserror::Error;

use crate::model::{DriverId, RideId, RideStatus, RiderId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Pickup or destination falls outside the operating region.
    #[error("location is outside the service area")]
    OutOfServiceArea,

    /// Schedule failed to parse or lies in the past.
    #[error("invalid schedule: {reason}")]
    InvalidSchedule { reason: String },

    /// The driver already holds an accepted ride.
    #[error("driver {driver} already has an active ride")]
    DriverBusy { driver: DriverId },

    /// The ride left `Requested` before this caller got to it; typically the
    /// other side of a lost accept race.
    #[error("ride {ride} is no longer available")]
    RideNotAvailable { ride: RideId },

    /// The requested status change is not an edge of the state machine.
    #[error("ride {ride} cannot move from {from} to {to}")]
    InvalidTransition {
        ride: RideId,
        from: RideStatus,
        to: RideStatus,
    },

    /// Cancel hit a ride that already reached a terminal state; non-fatal,
    /// the cancel is a no-op.
    #[error("ride {ride} is already in terminal state {status}")]
    AlreadyTerminal { ride: RideId, status: RideStatus },

    /// Completion attempted by a driver other than the one bound to the ride.
    #[error("driver {driver} is not assigned to ride {ride}")]
    NotAssignedDriver { ride: RideId, driver: DriverId },

    /// Rating submitted before the ride completed.
    #[error("ride {ride} is not completed")]
    RideNotCompleted { ride: RideId },

    /// Stars outside the 1-5 range.
    #[error("rating must be between 1 and 5, got {stars}")]
    InvalidRating { stars: u8 },

    #[error("no ride with id {0}")]
    UnknownRide(RideId),

    #[error("no driver with id {0}")]
    UnknownDriver(DriverId),

    #[error("no rider with id {0}")]
    UnknownRider(RiderId),

    #[error("email {0:?} is already registered")]
    DuplicateEmail(String),

    #[error("license number {0:?} is already registered")]
    DuplicateLicense(String),
}

/// Reported alongside a committed assignment when the notification side
/// channel failed. Never rolls the assignment back.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("assignment committed but notification delivery failed: {reason}")]
pub struct NotificationDeliveryWarning {
    pub reason: String,
}
