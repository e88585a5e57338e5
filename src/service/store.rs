use std::collections::HashMap;

use crate::model::time_entry::TimeEntry;

/// Storage for time entries, keyed by entry id.
///
/// The ledger is the only writer. Values are handed out owned so a backend
/// that is not in-process can sit behind the same interface.
pub trait EntryStore: Send + Sync {
    fn get(&self, id: &str) -> Option<TimeEntry>;

    /// Inserts or replaces the entry with the same id.
    fn put(&mut self, entry: TimeEntry);

    fn all(&self) -> Vec<TimeEntry>;

    fn open_entry_for(&self, user_id: &str) -> Option<TimeEntry> {
        self.all()
            .into_iter()
            .find(|e| e.user_id == user_id && e.is_open())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: HashMap<String, TimeEntry>,
}

impl EntryStore for InMemoryStore {
    fn get(&self, id: &str) -> Option<TimeEntry> {
        self.entries.get(id).cloned()
    }

    fn put(&mut self, entry: TimeEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    fn all(&self) -> Vec<TimeEntry> {
        self.entries.values().cloned().collect()
    }

    fn open_entry_for(&self, user_id: &str) -> Option<TimeEntry> {
        self.entries
            .values()
            .find(|e| e.user_id == user_id && e.is_open())
            .cloned()
    }
}
