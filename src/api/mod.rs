pub mod analytics;
pub mod perimeter;
pub mod time_entries;
pub mod users;
