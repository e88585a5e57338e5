use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::{
    error::AttendanceError,
    model::{
        analytics::AnalyticsSummary,
        geofence::{GeoFence, NewGeoFence},
        location::Location,
        role::Role,
        time_entry::{EntryFilter, TimeEntry},
        user::{NewUser, User},
    },
    service::{
        analytics,
        clock::{Clock, SystemClock},
        fences::FenceRegistry,
        ledger::AttendanceLedger,
        store::{EntryStore, InMemoryStore},
        users::UserDirectory,
    },
};

/// How strictly the active geofence gates clocking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockPolicy {
    /// Reject clock-ins that carry no location. When off, a missing location
    /// skips the geofence check.
    pub require_location_on_clock_in: bool,
    /// Apply the geofence check to clock-outs that carry a location.
    pub enforce_geofence_on_clock_out: bool,
}

struct State<S> {
    ledger: AttendanceLedger<S>,
    fences: FenceRegistry,
    users: UserDirectory,
}

/// Composition root for the attendance core.
///
/// All state sits behind one lock, so each clock-in, clock-out and fence swap
/// runs its check and its write as a single step.
pub struct AttendanceService<S = InMemoryStore> {
    state: RwLock<State<S>>,
    clock: Arc<dyn Clock>,
    policy: ClockPolicy,
}

impl AttendanceService<InMemoryStore> {
    pub fn new(policy: ClockPolicy) -> Self {
        Self::with_parts(InMemoryStore::default(), Arc::new(SystemClock), policy)
    }
}

impl<S: EntryStore> AttendanceService<S> {
    pub fn with_parts(store: S, clock: Arc<dyn Clock>, policy: ClockPolicy) -> Self {
        Self {
            state: RwLock::new(State {
                ledger: AttendanceLedger::new(store),
                fences: FenceRegistry::default(),
                users: UserDirectory::default(),
            }),
            clock,
            policy,
        }
    }

    pub fn record_clock_in(
        &self,
        user_id: &str,
        location: Option<Location>,
        note: Option<String>,
    ) -> Result<TimeEntry, AttendanceError> {
        if user_id.trim().is_empty() {
            return Err(AttendanceError::Validation(
                "User ID is required".to_string(),
            ));
        }
        if let Some(location) = &location {
            location.validate()?;
        }

        let mut state = self.state.write();
        if state.users.get(user_id).is_none() {
            return Err(AttendanceError::UnknownUser);
        }

        match (&location, state.fences.active()) {
            (None, _) if self.policy.require_location_on_clock_in => {
                warn!(user_id, "Clock-in rejected: no location supplied");
                return Err(AttendanceError::LocationRequired);
            }
            (Some(location), Some(fence)) => {
                if let Err(e) = fence.check(location) {
                    warn!(user_id, %location, fence_id = %fence.id, error = %e, "Clock-in rejected");
                    return Err(e);
                }
            }
            _ => {}
        }

        let now = self.clock.now();
        state.ledger.clock_in(user_id, location, note, now)
    }

    pub fn record_clock_out(
        &self,
        entry_id: &str,
        location: Option<Location>,
        note: Option<String>,
    ) -> Result<TimeEntry, AttendanceError> {
        if let Some(location) = &location {
            location.validate()?;
        }

        let mut state = self.state.write();
        if self.policy.enforce_geofence_on_clock_out {
            if let (Some(location), Some(fence)) = (&location, state.fences.active()) {
                if let Err(e) = fence.check(location) {
                    warn!(entry_id, %location, fence_id = %fence.id, error = %e, "Clock-out rejected");
                    return Err(e);
                }
            }
        }

        let now = self.clock.now();
        state.ledger.clock_out(entry_id, location, note, now)
    }

    pub fn query_entries(&self, filter: &EntryFilter) -> Vec<TimeEntry> {
        self.state.read().ledger.query(filter, self.clock.now())
    }

    pub fn open_entry_for(&self, user_id: &str) -> Option<TimeEntry> {
        self.state.read().ledger.open_entry_for(user_id)
    }

    pub fn compute_analytics(&self, window_days: u32) -> AnalyticsSummary {
        let state = self.state.read();
        let now = self.clock.now();
        let entries = state.ledger.query(&EntryFilter::default(), now);
        analytics::summarize(&entries, &state.users, window_days, now)
    }

    pub fn replace_active_fence(&self, new: NewGeoFence) -> Result<GeoFence, AttendanceError> {
        let now = self.clock.now();
        self.state.write().fences.replace_active(new, now)
    }

    pub fn active_fence(&self) -> Option<GeoFence> {
        self.state.read().fences.active().cloned()
    }

    pub fn fence_history(&self) -> Vec<GeoFence> {
        self.state.read().fences.history().to_vec()
    }

    pub fn list_users(&self, role: Option<Role>) -> Vec<User> {
        self.state.read().users.list(role)
    }

    pub fn create_user(&self, new: NewUser) -> Result<User, AttendanceError> {
        let now = self.clock.now();
        self.state.write().users.create(new, now)
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Runs `f` with write access to every part of the state at once.
    pub(crate) fn with_state<R>(
        &self,
        f: impl FnOnce(&mut AttendanceLedger<S>, &mut FenceRegistry, &mut UserDirectory) -> R,
    ) -> R {
        let mut guard = self.state.write();
        let state = &mut *guard;
        f(&mut state.ledger, &mut state.fences, &mut state.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::time_entry::EntryStatus,
        service::clock::ManualClock,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn nine_am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    fn london() -> Location {
        Location::new(51.5074, -0.1278).unwrap()
    }

    fn service(policy: ClockPolicy) -> (AttendanceService, Arc<ManualClock>, String) {
        let clock = Arc::new(ManualClock::new(nine_am()));
        let service = AttendanceService::with_parts(InMemoryStore::default(), clock.clone(), policy);
        let user = service
            .create_user(NewUser {
                name: "Alice".into(),
                email: "alice@example.com".into(),
                role: Role::CareWorker,
            })
            .unwrap();
        service
            .replace_active_fence(NewGeoFence {
                name: "Main Office".into(),
                center: london(),
                radius_km: 2.0,
            })
            .unwrap();
        (service, clock, user.id)
    }

    #[test]
    fn clock_in_inside_fence_succeeds() {
        let (service, _, user) = service(ClockPolicy::default());
        let entry = service
            .record_clock_in(&user, Some(london()), Some("start".into()))
            .unwrap();
        assert_eq!(entry.clock_in.time, nine_am());
        assert_eq!(entry.clock_in.location, Some(london()));
    }

    #[test]
    fn clock_in_outside_fence_is_rejected_before_the_ledger() {
        let (service, _, user) = service(ClockPolicy::default());
        let far = Location::new(51.60, -0.20).unwrap();

        match service.record_clock_in(&user, Some(far), None) {
            Err(AttendanceError::OutsideGeofence {
                distance_km,
                radius_km,
                fence_name,
            }) => {
                assert!((distance_km - 11.44).abs() < 0.05);
                assert_eq!(radius_km, 2.0);
                assert_eq!(fence_name, "Main Office");
            }
            other => panic!("expected OutsideGeofence, got {other:?}"),
        }
        assert!(service.query_entries(&EntryFilter::default()).is_empty());
    }

    #[test]
    fn missing_location_skips_fence_unless_required() {
        let (lenient, _, user) = service(ClockPolicy::default());
        assert!(lenient.record_clock_in(&user, None, None).is_ok());

        let (strict, _, user) = service(ClockPolicy {
            require_location_on_clock_in: true,
            ..ClockPolicy::default()
        });
        assert_eq!(
            strict.record_clock_in(&user, None, None).unwrap_err(),
            AttendanceError::LocationRequired
        );
        assert!(strict.record_clock_in(&user, Some(london()), None).is_ok());
    }

    #[test]
    fn no_active_fence_allows_any_location() {
        let clock = Arc::new(ManualClock::new(nine_am()));
        let service =
            AttendanceService::with_parts(InMemoryStore::default(), clock, ClockPolicy::default());
        let user = service
            .create_user(NewUser {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                role: Role::CareWorker,
            })
            .unwrap();
        let far = Location::new(-33.8688, 151.2093).unwrap();
        assert!(service.record_clock_in(&user.id, Some(far), None).is_ok());
    }

    #[test]
    fn unknown_user_cannot_clock_in() {
        let (service, _, _) = service(ClockPolicy::default());
        assert_eq!(
            service.record_clock_in("ghost", None, None).unwrap_err(),
            AttendanceError::UnknownUser
        );
        assert!(matches!(
            service.record_clock_in("  ", None, None),
            Err(AttendanceError::Validation(_))
        ));
    }

    #[test]
    fn nine_to_five_is_eight_hours() {
        let (service, clock, user) = service(ClockPolicy::default());
        let entry = service.record_clock_in(&user, None, None).unwrap();

        clock.set(Utc.with_ymd_and_hms(2026, 3, 2, 17, 0, 0).unwrap());
        let closed = service.record_clock_out(&entry.id, None, None).unwrap();
        assert_eq!(closed.total_hours, Some(8.0));

        clock.advance(Duration::hours(3));
        assert_eq!(
            service.record_clock_out(&entry.id, None, None).unwrap_err(),
            AttendanceError::AlreadyClockedOut
        );
        let stored = service.query_entries(&EntryFilter::for_user(&user));
        assert_eq!(stored[0].total_hours, Some(8.0));
    }

    #[test]
    fn clock_out_ignores_fence_by_default() {
        let far = Location::new(51.60, -0.20).unwrap();

        let (lenient, clock, user) = service(ClockPolicy::default());
        let entry = lenient.record_clock_in(&user, Some(london()), None).unwrap();
        clock.advance(Duration::hours(1));
        assert!(lenient.record_clock_out(&entry.id, Some(far), None).is_ok());

        let (strict, clock, user) = service(ClockPolicy {
            enforce_geofence_on_clock_out: true,
            ..ClockPolicy::default()
        });
        let entry = strict.record_clock_in(&user, Some(london()), None).unwrap();
        clock.advance(Duration::hours(1));
        assert!(matches!(
            strict.record_clock_out(&entry.id, Some(far), None),
            Err(AttendanceError::OutsideGeofence { .. })
        ));
        assert!(strict.open_entry_for(&user).is_some());
        assert!(strict.record_clock_out(&entry.id, Some(london()), None).is_ok());
    }

    #[test]
    fn query_open_after_one_open_and_one_closed() {
        let (service, clock, user) = service(ClockPolicy::default());
        let other = service
            .create_user(NewUser {
                name: "Jane".into(),
                email: "jane@example.com".into(),
                role: Role::CareWorker,
            })
            .unwrap();

        let first = service.record_clock_in(&user, None, None).unwrap();
        clock.advance(Duration::hours(1));
        service.record_clock_out(&first.id, None, None).unwrap();
        let open = service.record_clock_in(&other.id, None, None).unwrap();

        let result =
            service.query_entries(&EntryFilter::default().with_status(EntryStatus::Open));
        assert_eq!(result, vec![open]);
    }

    #[test]
    fn analytics_only_counts_closed_entries() {
        let (service, clock, user) = service(ClockPolicy::default());
        let entry = service.record_clock_in(&user, None, None).unwrap();
        clock.advance(Duration::hours(6));
        service.record_clock_out(&entry.id, None, None).unwrap();
        service.record_clock_in(&user, None, None).unwrap();

        let summary = service.compute_analytics(7);
        assert_eq!(summary.total_entries, 1);
        assert_eq!(summary.total_hours, 6.0);
        assert_eq!(summary.user_stats[0].user_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn concurrent_clock_ins_open_one_entry() {
        let (service, _, user) = service(ClockPolicy::default());
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let user = user.clone();
                std::thread::spawn(move || service.record_clock_in(&user, None, None).is_ok())
            })
            .collect();
        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(
            service
                .query_entries(&EntryFilter::for_user(&user).with_status(EntryStatus::Open))
                .len(),
            1
        );
    }
}
