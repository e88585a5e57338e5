use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AttendanceError, model::location::Location, utils::time::hours_between};

/// One side of a work session: when it happened, where and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockEvent {
    #[schema(example = "2026-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[schema(example = "Starting morning shift")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ClockEvent {
    /// Blank notes are dropped.
    pub fn new(time: DateTime<Utc>, location: Option<Location>, note: Option<String>) -> Self {
        Self {
            time,
            location,
            note: note.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[serde(alias = "active")]
    Open,
    #[serde(alias = "completed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[schema(example = "entry-1")]
    pub id: String,
    #[schema(example = "user-1")]
    pub user_id: String,
    pub clock_in: ClockEvent,
    pub clock_out: Option<ClockEvent>,
    #[schema(example = 8.0)]
    pub total_hours: Option<f64>,
    #[schema(example = "2026-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn open(id: String, user_id: String, clock_in: ClockEvent) -> Self {
        let created_at = clock_in.time;
        Self {
            id,
            user_id,
            clock_in,
            clock_out: None,
            total_hours: None,
            created_at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    pub fn status(&self) -> EntryStatus {
        if self.is_open() {
            EntryStatus::Open
        } else {
            EntryStatus::Closed
        }
    }

    /// Closes the entry and fixes `total_hours` for good.
    ///
    /// A clock-out stamped before the clock-in (clock skew) yields zero hours
    /// rather than a negative duration; the caller gets `true` back in that
    /// case so it can be reported.
    pub fn close(&mut self, clock_out: ClockEvent) -> Result<bool, AttendanceError> {
        if !self.is_open() {
            return Err(AttendanceError::AlreadyClockedOut);
        }

        let elapsed = hours_between(self.clock_in.time, clock_out.time);
        let clamped = elapsed < 0.0;

        self.total_hours = Some(elapsed.max(0.0));
        self.clock_out = Some(clock_out);
        Ok(clamped)
    }
}

/// Filters for listing entries. Every supplied filter must match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EntryFilter {
    /// Only entries belonging to this user
    #[param(example = "user-1")]
    pub user_id: Option<String>,
    /// `open`/`active` or `closed`/`completed`
    pub status: Option<EntryStatus>,
    /// Only entries clocked in within the trailing N days; 0 means no window
    #[serde(rename = "days")]
    #[param(example = 7)]
    pub since_days: Option<u32>,
}

impl EntryFilter {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn within_days(mut self, days: u32) -> Self {
        self.since_days = Some(days);
        self
    }

    pub fn matches(&self, entry: &TimeEntry, now: DateTime<Utc>) -> bool {
        if let Some(user_id) = &self.user_id {
            if &entry.user_id != user_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status() != status {
                return false;
            }
        }
        // A zero-day window means no window at all.
        let days = self.since_days.filter(|d| *d > 0);
        if let Some(cutoff) = days.and_then(|days| window_start(now, days)) {
            if entry.clock_in.time < cutoff {
                return false;
            }
        }
        true
    }
}

/// Start of the trailing `days * 24h` window ending at `now`; `None` when the
/// window reaches past the representable range.
pub fn window_start(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(chrono::Duration::days(i64::from(days)))
}
