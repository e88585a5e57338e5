pub mod analytics;
pub mod geofence;
pub mod location;
pub mod role;
pub mod time_entry;
pub mod user;
