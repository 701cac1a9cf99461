//! Entity records: riders, drivers, rides, ratings, notifications.
//!
//! These are explicit tagged records, never positional rows. The ride state
//! machine lives on [`RideStatus`]; the busy-flag invariant ties
//! [`Driver::busy`] to holding exactly one ride in `Accepted` status.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::Coord;
use crate::pricing::Tier;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered rider.
    RiderId
);
entity_id!(
    /// Identifier of a registered driver.
    DriverId
);
entity_id!(
    /// Identifier of a ride, allocated at creation and never reused.
    RideId
);
entity_id!(
    /// Identifier of an appended notification.
    NotificationId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    pub name: String,
    pub email: String,
    /// Opaque; verification belongs to the identity collaborator.
    pub credential_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub credential_hash: String,
    /// True iff `current_ride` references a ride in `Accepted` status.
    pub busy: bool,
    pub current_ride: Option<RideId>,
}

/// Ride lifecycle states. `Completed`, `Cancelled` and `Rejected` are
/// terminal; no transition leaves them and nothing revisits `Requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    Requested,
    Accepted,
    Completed,
    Cancelled,
    Rejected,
}

impl RideStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RideStatus::Completed | RideStatus::Cancelled | RideStatus::Rejected
        )
    }

    /// The transition table of the ride state machine.
    pub fn can_transition_to(self, next: RideStatus) -> bool {
        matches!(
            (self, next),
            (
                RideStatus::Requested,
                RideStatus::Accepted | RideStatus::Rejected | RideStatus::Cancelled
            ) | (
                RideStatus::Accepted,
                RideStatus::Completed | RideStatus::Cancelled
            )
        )
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RideStatus::Requested => "Requested",
            RideStatus::Accepted => "Accepted",
            RideStatus::Completed => "Completed",
            RideStatus::Cancelled => "Cancelled",
            RideStatus::Rejected => "Rejected",
        };
        f.write_str(name)
    }
}

/// A future pickup slot, already parsed and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl Schedule {
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// One transportation request from creation to terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    pub id: RideId,
    pub rider: RiderId,
    /// Set on assignment, cleared never; a cancelled accepted ride keeps the
    /// driver reference for the record while the driver itself is freed.
    pub driver: Option<DriverId>,
    pub pickup_label: String,
    pub dest_label: String,
    pub pickup: Coord,
    pub dest: Coord,
    pub distance_km: f64,
    pub fare: f64,
    pub tier: Tier,
    pub status: RideStatus,
    pub schedule: Option<Schedule>,
    pub assigned_by_admin: bool,
    /// 1-5 stars, present only once the ride is completed and rated.
    pub rating: Option<u8>,
}

/// Driver rating, tied 1:1 to a completed ride; last write wins on resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub ride: RideId,
    pub driver: DriverId,
    pub stars: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    Driver(DriverId),
    Rider(RiderId),
}

/// Append-only message record; never mutated after the append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: Recipient,
    pub ride: RideId,
    pub message: String,
    pub created_at: NaiveDateTime,
}
