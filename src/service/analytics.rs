use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    model::{
        analytics::{AnalyticsSummary, DailyStat, UserStat},
        time_entry::{TimeEntry, window_start},
    },
    service::users::UserDirectory,
};

#[derive(Default)]
struct Bucket<'a> {
    hours: f64,
    entries: usize,
    users: BTreeSet<&'a str>,
}

impl<'a> Bucket<'a> {
    fn add(&mut self, user_id: &'a str, hours: f64) {
        self.hours += hours;
        self.entries += 1;
        self.users.insert(user_id);
    }
}

/// Reduces closed entries clocked in within the trailing `window_days`.
pub fn summarize(
    entries: &[TimeEntry],
    users: &UserDirectory,
    window_days: u32,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let cutoff = window_start(now, window_days);
    let closed = entries.iter().filter_map(|e| {
        let hours = e.total_hours?;
        match cutoff {
            Some(cutoff) if e.clock_in.time < cutoff => None,
            _ => Some((e, hours)),
        }
    });

    let mut overall = Bucket::default();
    let mut by_day: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    let mut by_user: BTreeMap<&str, Bucket> = BTreeMap::new();

    for (entry, hours) in closed {
        let user_id = entry.user_id.as_str();
        overall.add(user_id, hours);
        by_day
            .entry(entry.clock_in.time.date_naive())
            .or_default()
            .add(user_id, hours);
        by_user.entry(user_id).or_default().add(user_id, hours);
    }

    let daily_stats = by_day
        .into_iter()
        .map(|(date, b)| DailyStat {
            date,
            total_hours: b.hours,
            unique_users: b.users.len(),
            total_entries: b.entries,
        })
        .collect();

    let mut user_stats: Vec<UserStat> = by_user
        .into_iter()
        .map(|(user_id, b)| UserStat {
            user_id: user_id.to_string(),
            user_name: users.get(user_id).map(|u| u.name.clone()),
            total_hours: b.hours,
            total_entries: b.entries,
            average_hours_per_entry: b.hours / b.entries as f64,
        })
        .collect();
    // Stable sort keeps ties in user-id order.
    user_stats.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    AnalyticsSummary {
        window_days,
        total_entries: overall.entries,
        total_hours: overall.hours,
        average_hours_per_day: if window_days > 0 {
            overall.hours / f64::from(window_days)
        } else {
            0.0
        },
        unique_users_count: overall.users.len(),
        daily_stats,
        user_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        role::Role,
        time_entry::ClockEvent,
        user::User,
    };
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn shift(id: &str, user: &str, start: DateTime<Utc>, hours: i64) -> TimeEntry {
        let mut entry = TimeEntry::open(
            id.to_string(),
            user.to_string(),
            ClockEvent::new(start, None, None),
        );
        entry
            .close(ClockEvent::new(start + Duration::hours(hours), None, None))
            .unwrap();
        entry
    }

    fn directory() -> UserDirectory {
        let mut users = UserDirectory::default();
        users.insert(User {
            id: "user-1".into(),
            name: "John Doe".into(),
            email: "john@example.com".into(),
            role: Role::CareWorker,
            created_at: now(),
        });
        users
    }

    #[test]
    fn aggregates_by_day_and_user() {
        let day1 = Utc.with_ymd_and_hms(2026, 3, 8, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 3, 9, 8, 0, 0).unwrap();
        let entries = vec![
            shift("e1", "user-1", day1, 8),
            shift("e2", "user-2", day1, 4),
            shift("e3", "user-2", day2, 8),
            // Still open, ignored.
            TimeEntry::open("e4".into(), "user-3".into(), ClockEvent::new(day2, None, None)),
            // Outside the window, ignored.
            shift("e5", "user-1", now() - Duration::days(30), 8),
        ];

        let summary = summarize(&entries, &directory(), 7, now());

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.total_hours, 20.0);
        assert_eq!(summary.unique_users_count, 2);
        assert!((summary.average_hours_per_day - 20.0 / 7.0).abs() < 1e-9);

        assert_eq!(summary.daily_stats.len(), 2);
        assert_eq!(summary.daily_stats[0].date, day1.date_naive());
        assert_eq!(summary.daily_stats[0].total_hours, 12.0);
        assert_eq!(summary.daily_stats[0].unique_users, 2);
        assert_eq!(summary.daily_stats[0].total_entries, 2);
        assert_eq!(summary.daily_stats[1].date, day2.date_naive());

        assert_eq!(summary.user_stats[0].user_id, "user-2");
        assert_eq!(summary.user_stats[0].total_hours, 12.0);
        assert_eq!(summary.user_stats[0].average_hours_per_entry, 6.0);
        assert_eq!(summary.user_stats[0].user_name, None);
        assert_eq!(summary.user_stats[1].user_id, "user-1");
        assert_eq!(summary.user_stats[1].user_name.as_deref(), Some("John Doe"));
    }

    #[test]
    fn empty_and_zero_window() {
        let summary = summarize(&[], &directory(), 0, now());
        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.average_hours_per_day, 0.0);
        assert!(summary.daily_stats.is_empty());
        assert!(summary.user_stats.is_empty());
    }
}
