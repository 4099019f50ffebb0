//! Observable store events
//!
//! Events are explicit and typed. Each carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events in a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Store constructed
    StoreOpened,
    /// Category registered (implicitly or explicitly)
    CategoryCreated,
    /// Record appended to a category
    RecordCreated,
    /// `create` hit an existing id and merged instead of appending
    RecordMerged,
    /// Record merged by `update`
    RecordUpdated,
    /// `update` found no record with the given id
    UpdateMissed,
    /// Record removed
    RecordRemoved,
    /// `remove` skipped an unknown id
    RemoveSkipped,
    /// Category emptied by `clean`
    CategoryCleaned,
    /// Argument or record rejected for its JSON type
    TypeRejected,
    /// Operation needed a category that does not exist
    CategoryMissing,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::CategoryCreated => "CATEGORY_CREATED",
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordMerged => "RECORD_MERGED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::UpdateMissed => "UPDATE_MISSED",
            Event::RecordRemoved => "RECORD_REMOVED",
            Event::RemoveSkipped => "REMOVE_SKIPPED",
            Event::CategoryCleaned => "CATEGORY_CLEANED",
            Event::TypeRejected => "TYPE_REJECTED",
            Event::CategoryMissing => "CATEGORY_MISSING",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreOpened | Event::CategoryCreated | Event::CategoryCleaned => Severity::Info,
            Event::RecordCreated
            | Event::RecordMerged
            | Event::RecordUpdated
            | Event::RecordRemoved
            | Event::UpdateMissed
            | Event::RemoveSkipped => Severity::Trace,
            Event::TypeRejected | Event::CategoryMissing => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
