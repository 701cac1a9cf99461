//! Dispatch engine: ride lifecycle orchestration.
//!
//! The engine is the only writer of ride state. It validates requests before
//! any mutation, delegates every multi-entity transition to the store's
//! locked check-and-set operations, and emits notification side effects
//! strictly after the transition commits. Presentation layers poll the
//! read-only projections; nothing here pushes.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{DispatchError, NotificationDeliveryWarning};
use crate::geo::{self, Coord};
use crate::geocode::Geocoder;
use crate::model::{
    Driver, DriverId, Notification, Rating, Recipient, Ride, RideId, RideStatus, Rider, RiderId,
    Schedule,
};
use crate::notify::NotificationSink;
use crate::pricing::{self, Tier};
use crate::store::{NewRide, Store};

/// Raw schedule fields as entered by the rider; `YYYY-MM-DD` and `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInput {
    pub date: String,
    pub time: String,
}

/// A rider's trip request.
#[derive(Debug, Clone)]
pub struct RideRequest {
    pub rider: RiderId,
    pub pickup: Coord,
    pub destination: Coord,
    pub tier: Tier,
    pub schedule: Option<ScheduleInput>,
}

/// Who asked for a cancellation; recorded in the log, not in the ride row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelActor {
    Rider,
    Driver,
    Admin,
}

/// Result of a committed push-assignment. A delivery warning means the
/// notifications did not all land; the assignment itself stands.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignOutcome {
    pub ride: Ride,
    pub warning: Option<NotificationDeliveryWarning>,
}

/// Advisory predicate for the presentation layer's rating gate: the ride is
/// done but the rider has not rated it yet. The engine never blocks on it.
pub fn rating_required(ride: &Ride) -> bool {
    ride.status == RideStatus::Completed && ride.rating.is_none()
}

pub struct DispatchEngine {
    store: Store,
    geocoder: Box<dyn Geocoder>,
    sink: Arc<dyn NotificationSink>,
    clock: Box<dyn Clock>,
}

impl DispatchEngine {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        sink: Arc<dyn NotificationSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            store: Store::new(),
            geocoder,
            sink,
            clock,
        }
    }

    // -----------------------------------------------------------------------
    // Directory
    // -----------------------------------------------------------------------

    pub fn register_rider(
        &self,
        name: &str,
        email: &str,
        credential_hash: &str,
    ) -> Result<Rider, DispatchError> {
        let rider = self.store.register_rider(name, email, credential_hash)?;
        info!(rider = %rider.id, "rider registered");
        Ok(rider)
    }

    pub fn register_driver(
        &self,
        name: &str,
        email: &str,
        license_number: &str,
        credential_hash: &str,
    ) -> Result<Driver, DispatchError> {
        let driver = self
            .store
            .register_driver(name, email, license_number, credential_hash)?;
        info!(driver = %driver.id, "driver registered");
        Ok(driver)
    }

    // -----------------------------------------------------------------------
    // Ride lifecycle
    // -----------------------------------------------------------------------

    /// Create a ride in `Requested` status and return its id. The sole
    /// creation path: validates the service area and the schedule before any
    /// mutation, prices the trip, and resolves endpoint labels through the
    /// geocoder with a coordinate-label fallback.
    pub fn create_ride(&self, request: RideRequest) -> Result<RideId, DispatchError> {
        if !geo::in_service_area(request.pickup) || !geo::in_service_area(request.destination) {
            return Err(DispatchError::OutOfServiceArea);
        }
        let schedule = match &request.schedule {
            Some(input) => Some(self.validate_schedule(input)?),
            None => None,
        };

        let pickup_label = self.resolve_label(request.pickup);
        let dest_label = self.resolve_label(request.destination);
        let distance_km = geo::distance_km(request.pickup, request.destination);
        let fare = pricing::fare(distance_km, request.tier);

        let ride = self.store.create_ride(NewRide {
            rider: request.rider,
            pickup: request.pickup,
            dest: request.destination,
            pickup_label,
            dest_label,
            distance_km,
            fare,
            tier: request.tier,
            schedule,
        })?;
        info!(
            ride = %ride.id,
            rider = %ride.rider,
            distance_km,
            fare,
            "ride requested"
        );
        Ok(ride.id)
    }

    /// Driver self-accept. The store re-validates both preconditions (ride
    /// still `Requested`, driver still idle) under its write lock, so of two
    /// racing drivers exactly one wins and the other gets
    /// [`DispatchError::RideNotAvailable`].
    pub fn driver_accept(&self, driver: DriverId, ride: RideId) -> Result<Ride, DispatchError> {
        // Fast-fail pre-check; the authoritative check repeats under the lock.
        if self.store.driver(driver)?.busy {
            return Err(DispatchError::DriverBusy { driver });
        }
        let accepted = self.store.accept(ride, driver, false)?;
        info!(ride = %ride, driver = %driver, "ride accepted");
        Ok(accepted)
    }

    /// `Requested -> Rejected`. No driver state is touched; none was bound.
    pub fn driver_reject(&self, ride: RideId) -> Result<Ride, DispatchError> {
        let rejected = self.store.reject(ride)?;
        info!(ride = %ride, "ride rejected");
        Ok(rejected)
    }

    /// Administrative push-assignment. Same busy/availability checks as
    /// [`Self::driver_accept`], plus the `assigned_by_admin` mark and one
    /// notification each to the driver and the rider. Notifications are
    /// emitted only after the transition commits; a delivery failure is
    /// reported as a warning in the outcome and never rolls the
    /// assignment back.
    pub fn admin_assign(
        &self,
        ride: RideId,
        driver: DriverId,
    ) -> Result<AssignOutcome, DispatchError> {
        let assigned = self.store.accept(ride, driver, true)?;
        info!(ride = %ride, driver = %driver, "ride assigned by admin");

        let warning = self.notify_assignment(&assigned, driver);
        if let Some(w) = &warning {
            warn!(ride = %ride, reason = %w.reason, "assignment notifications undelivered");
        }
        Ok(AssignOutcome {
            ride: assigned,
            warning,
        })
    }

    /// Cancel a ride that is still `Requested` or `Accepted`, freeing a
    /// bound driver in the same transaction. Idempotent: a ride already in a
    /// terminal state reports [`DispatchError::AlreadyTerminal`], which
    /// callers treat as information, not failure, since a rider or admin may
    /// race this against a driver's completion.
    pub fn cancel(&self, ride: RideId, actor: CancelActor) -> Result<Ride, DispatchError> {
        let cancelled = self.store.cancel(ride)?;
        info!(ride = %ride, ?actor, "ride cancelled");
        Ok(cancelled)
    }

    /// `Accepted -> Completed`, only by the bound driver; frees the driver.
    /// Rating is a downstream gate, never a precondition here.
    pub fn complete(&self, ride: RideId, driver: DriverId) -> Result<Ride, DispatchError> {
        let completed = self.store.complete(ride, driver)?;
        info!(ride = %ride, driver = %driver, "ride completed");
        Ok(completed)
    }

    /// Upsert the 1-5 star rating of a completed ride. Resubmission is
    /// last-write-wins; attribution sticks to the driver bound at completion.
    pub fn submit_rating(
        &self,
        ride: RideId,
        stars: u8,
        comment: Option<&str>,
    ) -> Result<Rating, DispatchError> {
        if !(1..=5).contains(&stars) {
            return Err(DispatchError::InvalidRating { stars });
        }
        let rating = self
            .store
            .upsert_rating(ride, stars, comment.unwrap_or_default())?;
        info!(ride = %ride, stars, "rating submitted");
        Ok(rating)
    }

    // -----------------------------------------------------------------------
    // Read projections (polled by presentation layers)
    // -----------------------------------------------------------------------

    /// Pending board for a driver, or the administrative view when no driver
    /// context is given. A busy driver sees only the ride they hold.
    pub fn list_pending(&self, driver: Option<DriverId>) -> Result<Vec<Ride>, DispatchError> {
        self.store.pending_rides(driver)
    }

    /// Every ride, newest first.
    pub fn all_rides(&self) -> Vec<Ride> {
        self.store.all_rides()
    }

    pub fn all_drivers(&self) -> Vec<Driver> {
        self.store.all_drivers()
    }

    /// The rider's most recent requested, underway or completed ride.
    pub fn active_ride(&self, rider: RiderId) -> Result<Option<Ride>, DispatchError> {
        self.store.active_ride(rider)
    }

    pub fn ride(&self, ride: RideId) -> Result<Ride, DispatchError> {
        self.store.ride(ride)
    }

    pub fn driver(&self, driver: DriverId) -> Result<Driver, DispatchError> {
        self.store.driver(driver)
    }

    pub fn rating(&self, ride: RideId) -> Option<Rating> {
        self.store.rating(ride)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn resolve_label(&self, coord: Coord) -> String {
        match self.geocoder.reverse(coord) {
            Some(address) => address,
            None => {
                debug!(lat = coord.lat, lon = coord.lon, "no address, using coordinate label");
                coord.label()
            }
        }
    }

    /// Parse and validate a schedule against "now". The date must not be in
    /// the past, and a same-day booking must also be ahead of the current
    /// time of day.
    fn validate_schedule(&self, input: &ScheduleInput) -> Result<Schedule, DispatchError> {
        let date = NaiveDate::parse_from_str(input.date.trim(), "%Y-%m-%d").map_err(|_| {
            DispatchError::InvalidSchedule {
                reason: format!("date must be YYYY-MM-DD, got {:?}", input.date),
            }
        })?;
        let time = NaiveTime::parse_from_str(input.time.trim(), "%H:%M").map_err(|_| {
            DispatchError::InvalidSchedule {
                reason: format!("time must be HH:MM (24h), got {:?}", input.time),
            }
        })?;
        let now = self.clock.now();
        if date < now.date() {
            return Err(DispatchError::InvalidSchedule {
                reason: "pickup date is in the past".to_string(),
            });
        }
        if date == now.date() && time < now.time() {
            return Err(DispatchError::InvalidSchedule {
                reason: "pickup time has already passed today".to_string(),
            });
        }
        Ok(Schedule { date, time })
    }

    fn notify_assignment(
        &self,
        ride: &Ride,
        driver: DriverId,
    ) -> Option<NotificationDeliveryWarning> {
        let created_at = self.clock.now();
        let notifications = [
            Notification {
                id: self.store.next_notification_id(),
                recipient: Recipient::Driver(driver),
                ride: ride.id,
                message: format!("You have been assigned to ride #{} by admin", ride.id),
                created_at,
            },
            Notification {
                id: self.store.next_notification_id(),
                recipient: Recipient::Rider(ride.rider),
                ride: ride.id,
                message: format!("Your ride #{} has been assigned a driver by admin", ride.id),
                created_at,
            },
        ];

        let mut failures = Vec::new();
        for notification in &notifications {
            if let Err(err) = self.sink.deliver(notification) {
                failures.push(err.to_string());
            }
        }
        if failures.is_empty() {
            None
        } else {
            Some(NotificationDeliveryWarning {
                reason: failures.join("; "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::clock::FixedClock;
    use crate::geocode::OfflineGeocoder;
    use crate::notify::{NotificationSink, SinkError};
    use crate::test_helpers::{fixed_now, seeded_engine as seeded, BHAKTAPUR, KATHMANDU};

    fn request(rider: RiderId) -> RideRequest {
        RideRequest {
            rider,
            pickup: KATHMANDU,
            destination: BHAKTAPUR,
            tier: Tier::Standard,
            schedule: None,
        }
    }

    /// `driver.busy == true` iff the driver holds exactly one accepted ride.
    fn assert_busy_invariant(engine: &DispatchEngine) {
        for driver in engine.all_drivers() {
            let accepted: Vec<_> = engine
                .all_rides()
                .into_iter()
                .filter(|r| r.driver == Some(driver.id) && r.status == RideStatus::Accepted)
                .collect();
            if driver.busy {
                assert_eq!(accepted.len(), 1, "busy driver must hold one accepted ride");
                assert_eq!(driver.current_ride, Some(accepted[0].id));
            } else {
                assert!(accepted.is_empty(), "idle driver must hold no accepted ride");
                assert_eq!(driver.current_ride, None);
            }
        }
    }

    #[test]
    fn kathmandu_scenario_end_to_end() {
        let (engine, _sink, rider, driver_a, driver_b) = seeded();

        let ride_id = engine.create_ride(request(rider)).expect("create");
        let ride = engine.ride(ride_id).expect("ride");
        assert_eq!(ride.status, RideStatus::Requested);
        assert!((ride.fare - ride.distance_km * 30.0).abs() < 1e-9);
        assert!(ride.fare > 0.0);

        // Both drivers race for the same ride; exactly one wins.
        let results = [
            engine.driver_accept(driver_a, ride_id),
            engine.driver_accept(driver_b, ride_id),
        ];
        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(DispatchError::RideNotAvailable { .. })
        )));
        assert_busy_invariant(&engine);

        let winner = engine.ride(ride_id).expect("ride").driver.expect("driver");
        let completed = engine.complete(ride_id, winner).expect("complete");
        assert_eq!(completed.status, RideStatus::Completed);
        assert!(!engine.driver(winner).expect("driver").busy);
        assert_busy_invariant(&engine);

        assert!(rating_required(&completed));
        engine.submit_rating(ride_id, 5, None).expect("rating");
        let rated = engine.ride(ride_id).expect("ride");
        assert!(!rating_required(&rated));
        assert_eq!(rated.rating, Some(5));
        let rating = engine.rating(ride_id).expect("rating record");
        assert_eq!(rating.driver, winner);
        assert_eq!(rating.stars, 5);
    }

    #[test]
    fn concurrent_accepts_yield_exactly_one_winner() {
        let (engine, _sink, rider, driver_a, driver_b) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");

        let engine = Arc::new(engine);
        let barrier = Arc::new(std::sync::Barrier::new(2));
        let handles: Vec<_> = [driver_a, driver_b]
            .into_iter()
            .map(|driver| {
                let engine = engine.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    engine.driver_accept(driver, ride_id)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("accept thread"))
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        let losers = results
            .iter()
            .filter(|r| matches!(r, Err(DispatchError::RideNotAvailable { .. })))
            .count();
        assert_eq!((winners, losers), (1, 1));
        assert_busy_invariant(&engine);
    }

    #[test]
    fn cancel_is_idempotent() {
        let (engine, _sink, rider, driver, _) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");
        engine.driver_accept(driver, ride_id).expect("accept");

        let cancelled = engine.cancel(ride_id, CancelActor::Rider).expect("cancel");
        assert_eq!(cancelled.status, RideStatus::Cancelled);
        assert!(!engine.driver(driver).expect("driver").busy);
        assert_busy_invariant(&engine);

        let err = engine
            .cancel(ride_id, CancelActor::Rider)
            .expect_err("second cancel");
        assert_eq!(
            err,
            DispatchError::AlreadyTerminal {
                ride: ride_id,
                status: RideStatus::Cancelled,
            }
        );
        assert_eq!(
            engine.ride(ride_id).expect("ride").status,
            RideStatus::Cancelled
        );
    }

    #[test]
    fn admin_assign_notifies_driver_and_rider() {
        let (engine, sink, rider, driver, _) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");

        let outcome = engine.admin_assign(ride_id, driver).expect("assign");
        assert_eq!(outcome.ride.status, RideStatus::Accepted);
        assert!(outcome.ride.assigned_by_admin);
        assert_eq!(outcome.warning, None);
        assert_busy_invariant(&engine);

        let to_driver = sink.for_recipient(Recipient::Driver(driver));
        assert_eq!(to_driver.len(), 1);
        assert_eq!(
            to_driver[0].message,
            format!("You have been assigned to ride #{ride_id} by admin")
        );
        let to_rider = sink.for_recipient(Recipient::Rider(rider));
        assert_eq!(to_rider.len(), 1);
        assert_eq!(
            to_rider[0].message,
            format!("Your ride #{ride_id} has been assigned a driver by admin")
        );
    }

    #[test]
    fn admin_assign_to_busy_driver_emits_nothing() {
        let (engine, sink, rider, driver, _) = seeded();
        let first = engine.create_ride(request(rider)).expect("create");
        let second = engine.create_ride(request(rider)).expect("create");
        engine.driver_accept(driver, first).expect("accept");

        let err = engine.admin_assign(second, driver).expect_err("busy");
        assert_eq!(err, DispatchError::DriverBusy { driver });
        assert!(sink.is_empty());
        assert_eq!(
            engine.ride(second).expect("ride").status,
            RideStatus::Requested
        );
    }

    /// Sink that always fails; the assignment must still stand.
    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn deliver(&self, _notification: &Notification) -> Result<(), SinkError> {
            Err(SinkError("sink offline".to_string()))
        }
    }

    #[test]
    fn delivery_failure_warns_but_assignment_stands() {
        let engine = DispatchEngine::new(
            Box::new(OfflineGeocoder),
            Arc::new(FailingSink),
            Box::new(FixedClock(fixed_now())),
        );
        let rider = engine
            .register_rider("Asha", "asha@example.com", "hash")
            .expect("rider")
            .id;
        let driver = engine
            .register_driver("Bikram", "bikram@example.com", "BA-12-345", "hash")
            .expect("driver")
            .id;
        let ride_id = engine.create_ride(request(rider)).expect("create");

        let outcome = engine.admin_assign(ride_id, driver).expect("assign");
        let warning = outcome.warning.expect("delivery warning");
        assert!(warning.reason.contains("sink offline"));
        assert_eq!(
            engine.ride(ride_id).expect("ride").status,
            RideStatus::Accepted
        );
        assert!(engine.driver(driver).expect("driver").busy);
    }

    #[test]
    fn out_of_area_endpoints_are_rejected_before_any_mutation() {
        let (engine, _sink, rider, _, _) = seeded();
        let delhi = Coord::new(28.6139, 77.2090);

        for (pickup, dest) in [(delhi, BHAKTAPUR), (KATHMANDU, delhi)] {
            let err = engine
                .create_ride(RideRequest {
                    rider,
                    pickup,
                    destination: dest,
                    tier: Tier::Standard,
                    schedule: None,
                })
                .expect_err("out of area");
            assert_eq!(err, DispatchError::OutOfServiceArea);
        }
        assert!(engine.all_rides().is_empty());
    }

    #[test]
    fn schedule_validation_closes_the_same_day_gap() {
        let (engine, _sink, rider, _, _) = seeded();

        let cases = [
            ("2026-03-13", "10:00", "past date"),
            ("2026-03-14", "09:00", "same-day past time"),
            ("14-03-2026", "10:00", "bad date format"),
            ("2026-03-14", "25:61", "bad time format"),
            ("2026-02-30", "10:00", "impossible calendar date"),
        ];
        for (date, time, what) in cases {
            let err = engine
                .create_ride(RideRequest {
                    schedule: Some(ScheduleInput {
                        date: date.to_string(),
                        time: time.to_string(),
                    }),
                    ..request(rider)
                })
                .expect_err(what);
            assert!(
                matches!(err, DispatchError::InvalidSchedule { .. }),
                "{what}: {err}"
            );
        }
        assert!(engine.all_rides().is_empty());

        // Same-day but later today is fine; so is tomorrow.
        for (date, time) in [("2026-03-14", "09:31"), ("2026-03-15", "00:00")] {
            let ride_id = engine
                .create_ride(RideRequest {
                    schedule: Some(ScheduleInput {
                        date: date.to_string(),
                        time: time.to_string(),
                    }),
                    ..request(rider)
                })
                .expect("valid schedule");
            let ride = engine.ride(ride_id).expect("ride");
            assert!(ride.schedule.is_some());
        }
    }

    #[test]
    fn rating_gate_rejects_non_completed_and_bad_stars() {
        let (engine, _sink, rider, driver, _) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");

        let err = engine.submit_rating(ride_id, 4, None).expect_err("not done");
        assert_eq!(err, DispatchError::RideNotCompleted { ride: ride_id });

        engine.driver_accept(driver, ride_id).expect("accept");
        engine.complete(ride_id, driver).expect("complete");

        for stars in [0, 6] {
            let err = engine.submit_rating(ride_id, stars, None).expect_err("range");
            assert_eq!(err, DispatchError::InvalidRating { stars });
        }
        assert_eq!(engine.ride(ride_id).expect("ride").rating, None);

        // Resubmission is last-write-wins.
        engine.submit_rating(ride_id, 3, Some("ok")).expect("first");
        let updated = engine.submit_rating(ride_id, 4, None).expect("resubmit");
        assert_eq!(updated.stars, 4);
        assert_eq!(engine.ride(ride_id).expect("ride").rating, Some(4));
    }

    #[test]
    fn complete_requires_the_bound_driver() {
        let (engine, _sink, rider, driver_a, driver_b) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");
        engine.driver_accept(driver_a, ride_id).expect("accept");

        let err = engine.complete(ride_id, driver_b).expect_err("wrong driver");
        assert_eq!(
            err,
            DispatchError::NotAssignedDriver {
                ride: ride_id,
                driver: driver_b,
            }
        );
        assert_eq!(
            engine.ride(ride_id).expect("ride").status,
            RideStatus::Accepted
        );
        assert_busy_invariant(&engine);
    }

    #[test]
    fn reject_does_not_touch_driver_state() {
        let (engine, _sink, rider, driver, _) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");

        let rejected = engine.driver_reject(ride_id).expect("reject");
        assert_eq!(rejected.status, RideStatus::Rejected);
        assert_eq!(rejected.driver, None);
        assert!(!engine.driver(driver).expect("driver").busy);

        let err = engine.driver_reject(ride_id).expect_err("terminal");
        assert!(matches!(err, DispatchError::InvalidTransition { .. }));
    }

    #[test]
    fn offline_labels_fall_back_to_coordinates() {
        let (engine, _sink, rider, _, _) = seeded();
        let ride_id = engine.create_ride(request(rider)).expect("create");
        let ride = engine.ride(ride_id).expect("ride");
        assert_eq!(ride.pickup_label, "27.71720, 85.32400");
        assert_eq!(ride.dest_label, "27.67100, 85.42980");
    }

    #[test]
    fn busy_driver_board_shows_their_trip_after_completion_nothing_held() {
        let (engine, _sink, rider, driver, _) = seeded();
        let held = engine.create_ride(request(rider)).expect("create");
        engine.create_ride(request(rider)).expect("create");
        engine.driver_accept(driver, held).expect("accept");

        let board = engine.list_pending(Some(driver)).expect("board");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, held);

        engine.complete(held, driver).expect("complete");
        let board = engine.list_pending(Some(driver)).expect("board");
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].status, RideStatus::Requested);
    }

    #[test]
    fn active_ride_tracks_the_rider_flow() {
        let (engine, _sink, rider, driver, _) = seeded();
        assert_eq!(engine.active_ride(rider).expect("query"), None);

        let ride_id = engine.create_ride(request(rider)).expect("create");
        let active = engine.active_ride(rider).expect("query").expect("active");
        assert_eq!(active.id, ride_id);

        engine.driver_accept(driver, ride_id).expect("accept");
        engine.complete(ride_id, driver).expect("complete");
        // Completed rides stay visible so the rating gate can fire.
        let active = engine.active_ride(rider).expect("query").expect("active");
        assert!(rating_required(&active));
    }
}
