use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AttendanceError,
    model::{
        location::Location,
        time_entry::{ClockEvent, EntryFilter, TimeEntry},
    },
    service::store::{EntryStore, InMemoryStore},
    utils::time::format_hours,
};

/// Owns every time entry and enforces the open/closed lifecycle.
///
/// A user has at most one open entry at a time. An entry moves from open to
/// closed exactly once and is never touched again.
#[derive(Debug, Default)]
pub struct AttendanceLedger<S = InMemoryStore> {
    store: S,
}

impl<S: EntryStore> AttendanceLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a new entry for `user_id` stamped at `at`.
    ///
    /// Geofence checks are the caller's job and must happen before this.
    pub fn clock_in(
        &mut self,
        user_id: &str,
        location: Option<Location>,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<TimeEntry, AttendanceError> {
        if let Some(open) = self.store.open_entry_for(user_id) {
            warn!(user_id, entry_id = %open.id, "Clock-in rejected: entry already open");
            return Err(AttendanceError::AlreadyClockedIn);
        }

        let entry = TimeEntry::open(
            format!("entry-{}", Uuid::new_v4()),
            user_id.to_string(),
            ClockEvent::new(at, location, note),
        );
        self.store.put(entry.clone());

        info!(user_id, entry_id = %entry.id, "Clocked in");
        Ok(entry)
    }

    pub fn clock_out(
        &mut self,
        entry_id: &str,
        location: Option<Location>,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<TimeEntry, AttendanceError> {
        let mut entry = self.store.get(entry_id).ok_or(AttendanceError::NotFound)?;

        let clamped = entry.close(ClockEvent::new(at, location, note))?;
        if clamped {
            warn!(
                entry_id,
                clock_in = %entry.clock_in.time,
                clock_out = %at,
                "Clock-out precedes clock-in, recording zero hours"
            );
        }
        self.store.put(entry.clone());

        info!(
            entry_id,
            user_id = %entry.user_id,
            total = %format_hours(entry.total_hours.unwrap_or_default()),
            "Clocked out"
        );
        Ok(entry)
    }

    /// Matching entries, most recent clock-in first.
    pub fn query(&self, filter: &EntryFilter, now: DateTime<Utc>) -> Vec<TimeEntry> {
        let mut entries: Vec<TimeEntry> = self
            .store
            .all()
            .into_iter()
            .filter(|e| filter.matches(e, now))
            .collect();
        entries.sort_by(|a, b| {
            b.clock_in
                .time
                .cmp(&a.clock_in.time)
                .then_with(|| a.id.cmp(&b.id))
        });
        entries
    }

    pub fn get(&self, entry_id: &str) -> Option<TimeEntry> {
        self.store.get(entry_id)
    }

    pub fn open_entry_for(&self, user_id: &str) -> Option<TimeEntry> {
        self.store.open_entry_for(user_id)
    }
}
