//! Demo users, fence and shifts for running the service without a backend.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::info;

use crate::{
    error::AttendanceError,
    model::{geofence::NewGeoFence, location::Location, role::Role, user::User},
    service::{AttendanceService, EntryStore},
};

struct DemoShift {
    user_id: &'static str,
    days_ago: i64,
    start_hour: u32,
    end_hour: u32,
    clock_in_note: &'static str,
    clock_out_note: &'static str,
}

const SHIFTS: [DemoShift; 2] = [
    DemoShift {
        user_id: "user-1",
        days_ago: 2,
        start_hour: 9,
        end_hour: 17,
        clock_in_note: "Starting morning shift",
        clock_out_note: "End of shift",
    },
    DemoShift {
        user_id: "user-2",
        days_ago: 1,
        start_hour: 8,
        end_hour: 16,
        clock_in_note: "Early start today",
        clock_out_note: "Finished early",
    },
];

fn at_hour(day: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
    day.date_naive().and_time(time).and_utc()
}

pub fn load_demo_data<S: EntryStore>(service: &AttendanceService<S>) -> Result<(), AttendanceError> {
    let now = service.now();
    let office = Location::new(51.5074, -0.1278)?;

    service.with_state(|ledger, fences, users| {
        for (id, name, email, role) in [
            ("user-1", "John Doe", "john.doe@example.com", Role::CareWorker),
            ("user-2", "Jane Smith", "jane.smith@example.com", Role::CareWorker),
            ("manager-1", "Mike Manager", "mike.manager@example.com", Role::Manager),
        ] {
            users.insert(User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role,
                created_at: now,
            });
        }

        fences.install(
            "fence-1".to_string(),
            NewGeoFence {
                name: "Main Office".to_string(),
                center: office,
                radius_km: 2.0,
            },
            now,
        );

        for shift in &SHIFTS {
            let day = now - Duration::days(shift.days_ago);
            let entry = ledger.clock_in(
                shift.user_id,
                Some(office),
                Some(shift.clock_in_note.to_string()),
                at_hour(day, shift.start_hour),
            )?;
            ledger.clock_out(
                &entry.id,
                Some(office),
                Some(shift.clock_out_note.to_string()),
                at_hour(day, shift.end_hour),
            )?;
        }
        Ok::<_, AttendanceError>(())
    })?;

    info!("Demo data loaded");
    Ok(())
}
