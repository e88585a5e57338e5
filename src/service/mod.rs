pub mod analytics;
pub mod attendance;
pub mod clock;
pub mod fences;
pub mod ledger;
pub mod store;
pub mod users;

pub use attendance::{AttendanceService, ClockPolicy};
pub use clock::{Clock, ManualClock, SystemClock};
pub use ledger::AttendanceLedger;
pub use store::{EntryStore, InMemoryStore};
