//! In-memory transactional record store for the directory and ride tables.
//!
//! One `RwLock` guards every table, which makes it a strict superset of the
//! per-(ride, driver) transaction scope the transitions need: accept, assign,
//! cancel and complete take the write lock, re-validate their preconditions
//! against the locked state, then apply every field write before releasing.
//! A torn state (ride updated, driver flag not) is therefore unobservable.
//! Reads take the read lock and return cloned projections.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::DispatchError;
use crate::model::{
    Driver, DriverId, NotificationId, Rating, Ride, RideId, RideStatus, Rider, RiderId,
};

#[derive(Debug, Default)]
struct Tables {
    riders: HashMap<RiderId, Rider>,
    drivers: HashMap<DriverId, Driver>,
    rides: BTreeMap<RideId, Ride>,
    ratings: HashMap<RideId, Rating>,
}

/// Fields the dispatch engine supplies for a new ride; the store allocates
/// the id and stamps the initial `Requested` status.
#[derive(Debug, Clone)]
pub struct NewRide {
    pub rider: RiderId,
    pub pickup: crate::geo::Coord,
    pub dest: crate::geo::Coord,
    pub pickup_label: String,
    pub dest_label: String,
    pub distance_km: f64,
    pub fare: f64,
    pub tier: crate::pricing::Tier,
    pub schedule: Option<crate::model::Schedule>,
}

#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
    next_rider: AtomicU64,
    next_driver: AtomicU64,
    next_ride: AtomicU64,
    next_notification: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another caller panicked mid-operation;
    // recover the guard rather than cascading the panic.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    // -----------------------------------------------------------------------
    // Directory
    // -----------------------------------------------------------------------

    /// Register a rider; email must be unique across the whole directory.
    pub fn register_rider(
        &self,
        name: &str,
        email: &str,
        credential_hash: &str,
    ) -> Result<Rider, DispatchError> {
        let mut tables = self.write();
        if email_taken(&tables, email) {
            return Err(DispatchError::DuplicateEmail(email.to_string()));
        }
        let id = RiderId(self.next_rider.fetch_add(1, Ordering::Relaxed) + 1);
        let rider = Rider {
            id,
            name: name.to_string(),
            email: email.to_string(),
            credential_hash: credential_hash.to_string(),
        };
        tables.riders.insert(id, rider.clone());
        Ok(rider)
    }

    /// Register a driver; email and license number must both be unique.
    pub fn register_driver(
        &self,
        name: &str,
        email: &str,
        license_number: &str,
        credential_hash: &str,
    ) -> Result<Driver, DispatchError> {
        let mut tables = self.write();
        if email_taken(&tables, email) {
            return Err(DispatchError::DuplicateEmail(email.to_string()));
        }
        if tables
            .drivers
            .values()
            .any(|d| d.license_number == license_number)
        {
            return Err(DispatchError::DuplicateLicense(license_number.to_string()));
        }
        let id = DriverId(self.next_driver.fetch_add(1, Ordering::Relaxed) + 1);
        let driver = Driver {
            id,
            name: name.to_string(),
            email: email.to_string(),
            license_number: license_number.to_string(),
            credential_hash: credential_hash.to_string(),
            busy: false,
            current_ride: None,
        };
        tables.drivers.insert(id, driver.clone());
        Ok(driver)
    }

    // -----------------------------------------------------------------------
    // Ride transitions
    // -----------------------------------------------------------------------

    /// Insert a new ride in `Requested` status. The sole creation path.
    pub fn create_ride(&self, new: NewRide) -> Result<Ride, DispatchError> {
        let mut tables = self.write();
        if !tables.riders.contains_key(&new.rider) {
            return Err(DispatchError::UnknownRider(new.rider));
        }
        let id = RideId(self.next_ride.fetch_add(1, Ordering::Relaxed) + 1);
        let ride = Ride {
            id,
            rider: new.rider,
            driver: None,
            pickup_label: new.pickup_label,
            dest_label: new.dest_label,
            pickup: new.pickup,
            dest: new.dest,
            distance_km: new.distance_km,
            fare: new.fare,
            tier: new.tier,
            status: RideStatus::Requested,
            schedule: new.schedule,
            assigned_by_admin: false,
            rating: None,
        };
        tables.rides.insert(id, ride.clone());
        Ok(ride)
    }

    /// Check-and-set binding a driver to a requested ride. Both preconditions
    /// are validated under the write lock immediately before the writes, so
    /// of two racing callers exactly one wins; the loser sees
    /// `RideNotAvailable` (ride gone) or `DriverBusy` (driver gone).
    pub fn accept(
        &self,
        ride_id: RideId,
        driver_id: DriverId,
        by_admin: bool,
    ) -> Result<Ride, DispatchError> {
        let mut tables = self.write();
        let driver = tables
            .drivers
            .get(&driver_id)
            .ok_or(DispatchError::UnknownDriver(driver_id))?;
        if driver.busy {
            return Err(DispatchError::DriverBusy { driver: driver_id });
        }
        let ride = tables
            .rides
            .get_mut(&ride_id)
            .ok_or(DispatchError::UnknownRide(ride_id))?;
        if ride.status != RideStatus::Requested {
            return Err(DispatchError::RideNotAvailable { ride: ride_id });
        }

        // All three records move together or not at all.
        ride.status = RideStatus::Accepted;
        ride.driver = Some(driver_id);
        if by_admin {
            ride.assigned_by_admin = true;
        }
        let snapshot = ride.clone();
        let driver = tables
            .drivers
            .get_mut(&driver_id)
            .expect("driver checked under this lock");
        driver.busy = true;
        driver.current_ride = Some(ride_id);
        Ok(snapshot)
    }

    /// `Requested -> Rejected`. No driver was ever bound, so only the ride
    /// row changes.
    pub fn reject(&self, ride_id: RideId) -> Result<Ride, DispatchError> {
        let mut tables = self.write();
        let ride = tables
            .rides
            .get_mut(&ride_id)
            .ok_or(DispatchError::UnknownRide(ride_id))?;
        if ride.status != RideStatus::Requested {
            return Err(DispatchError::InvalidTransition {
                ride: ride_id,
                from: ride.status,
                to: RideStatus::Rejected,
            });
        }
        ride.status = RideStatus::Rejected;
        Ok(ride.clone())
    }

    /// `Requested|Accepted -> Cancelled`, freeing a bound driver in the same
    /// write. Terminal rides report `AlreadyTerminal` and stay untouched.
    pub fn cancel(&self, ride_id: RideId) -> Result<Ride, DispatchError> {
        let mut tables = self.write();
        let ride = tables
            .rides
            .get_mut(&ride_id)
            .ok_or(DispatchError::UnknownRide(ride_id))?;
        if ride.status.is_terminal() {
            return Err(DispatchError::AlreadyTerminal {
                ride: ride_id,
                status: ride.status,
            });
        }
        ride.status = RideStatus::Cancelled;
        let bound = ride.driver;
        let snapshot = ride.clone();
        if let Some(driver_id) = bound {
            if let Some(driver) = tables.drivers.get_mut(&driver_id) {
                driver.busy = false;
                driver.current_ride = None;
            }
        }
        Ok(snapshot)
    }

    /// `Accepted -> Completed`, permitted only to the bound driver; frees the
    /// driver in the same write.
    pub fn complete(&self, ride_id: RideId, driver_id: DriverId) -> Result<Ride, DispatchError> {
        let mut tables = self.write();
        let ride = tables
            .rides
            .get_mut(&ride_id)
            .ok_or(DispatchError::UnknownRide(ride_id))?;
        if ride.status != RideStatus::Accepted {
            return Err(DispatchError::InvalidTransition {
                ride: ride_id,
                from: ride.status,
                to: RideStatus::Completed,
            });
        }
        if ride.driver != Some(driver_id) {
            return Err(DispatchError::NotAssignedDriver {
                ride: ride_id,
                driver: driver_id,
            });
        }
        ride.status = RideStatus::Completed;
        let snapshot = ride.clone();
        if let Some(driver) = tables.drivers.get_mut(&driver_id) {
            driver.busy = false;
            driver.current_ride = None;
        }
        Ok(snapshot)
    }

    /// Upsert the rating of a completed ride; last write wins. Attribution
    /// goes to the driver bound at completion, never re-resolved.
    pub fn upsert_rating(
        &self,
        ride_id: RideId,
        stars: u8,
        comment: &str,
    ) -> Result<Rating, DispatchError> {
        let mut tables = self.write();
        let ride = tables
            .rides
            .get_mut(&ride_id)
            .ok_or(DispatchError::UnknownRide(ride_id))?;
        if ride.status != RideStatus::Completed {
            return Err(DispatchError::RideNotCompleted { ride: ride_id });
        }
        // A completed ride always carries its driver.
        let driver = match ride.driver {
            Some(d) => d,
            None => return Err(DispatchError::RideNotCompleted { ride: ride_id }),
        };
        ride.rating = Some(stars);
        let rating = Rating {
            ride: ride_id,
            driver,
            stars,
            comment: comment.to_string(),
        };
        tables.ratings.insert(ride_id, rating.clone());
        Ok(rating)
    }

    // -----------------------------------------------------------------------
    // Queries (cloned projections)
    // -----------------------------------------------------------------------

    pub fn rider(&self, id: RiderId) -> Result<Rider, DispatchError> {
        self.read()
            .riders
            .get(&id)
            .cloned()
            .ok_or(DispatchError::UnknownRider(id))
    }

    pub fn driver(&self, id: DriverId) -> Result<Driver, DispatchError> {
        self.read()
            .drivers
            .get(&id)
            .cloned()
            .ok_or(DispatchError::UnknownDriver(id))
    }

    pub fn ride(&self, id: RideId) -> Result<Ride, DispatchError> {
        self.read()
            .rides
            .get(&id)
            .cloned()
            .ok_or(DispatchError::UnknownRide(id))
    }

    pub fn rating(&self, ride: RideId) -> Option<Rating> {
        self.read().ratings.get(&ride).cloned()
    }

    /// Every ride, newest first (administrative view).
    pub fn all_rides(&self) -> Vec<Ride> {
        self.read().rides.values().rev().cloned().collect()
    }

    pub fn all_drivers(&self) -> Vec<Driver> {
        let mut drivers: Vec<_> = self.read().drivers.values().cloned().collect();
        drivers.sort_by_key(|d| d.id);
        drivers
    }

    /// Pending rides as seen by one driver, or by the administrative view
    /// when no driver context is given.
    ///
    /// A busy driver only sees the ride they already hold, so their board
    /// reflects the one active trip and never new requests. An idle driver
    /// (and the admin) sees all `Requested` rides, newest first.
    pub fn pending_rides(&self, driver: Option<DriverId>) -> Result<Vec<Ride>, DispatchError> {
        let tables = self.read();
        if let Some(driver_id) = driver {
            let driver = tables
                .drivers
                .get(&driver_id)
                .ok_or(DispatchError::UnknownDriver(driver_id))?;
            if driver.busy {
                let held = driver
                    .current_ride
                    .and_then(|id| tables.rides.get(&id))
                    .filter(|r| r.status == RideStatus::Accepted)
                    .cloned();
                return Ok(held.into_iter().collect());
            }
        }
        Ok(tables
            .rides
            .values()
            .rev()
            .filter(|r| r.status == RideStatus::Requested)
            .cloned()
            .collect())
    }

    /// The rider's most recent ride still worth showing: requested, underway
    /// or completed-but-possibly-unrated.
    pub fn active_ride(&self, rider: RiderId) -> Result<Option<Ride>, DispatchError> {
        let tables = self.read();
        if !tables.riders.contains_key(&rider) {
            return Err(DispatchError::UnknownRider(rider));
        }
        Ok(tables
            .rides
            .values()
            .rev()
            .find(|r| {
                r.rider == rider
                    && matches!(
                        r.status,
                        RideStatus::Requested | RideStatus::Accepted | RideStatus::Completed
                    )
            })
            .cloned())
    }

    pub fn next_notification_id(&self) -> NotificationId {
        NotificationId(self.next_notification.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

fn email_taken(tables: &Tables, email: &str) -> bool {
    tables.riders.values().any(|r| r.email == email)
        || tables.drivers.values().any(|d| d.email == email)
}
