use std::sync::atomic::{AtomicU32, Ordering};

use crate::record::FinalizedRecord;

/// Per-session intake state: the case counter and the finalized records
/// accumulated so far. Owned by the caller and passed in explicitly, so
/// independent sessions (and tests) never share state.
///
/// The counter is atomic: drafts for independent records may be finalized
/// from parallel tasks without handing out duplicate numbers.
#[derive(Debug)]
pub struct Session {
    next_case: AtomicU32,
    cases: Vec<FinalizedRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            next_case: AtomicU32::new(1),
            cases: Vec::new(),
        }
    }

    /// Claim the next case number. Numbers start at 1 and are never reused
    /// within a session, even if the record is later abandoned.
    pub fn next_case_number(&self) -> u32 {
        self.next_case.fetch_add(1, Ordering::SeqCst)
    }

    /// Append a finalized record to the session collection.
    pub fn commit(&mut self, record: FinalizedRecord) {
        self.cases.push(record);
    }

    pub fn cases(&self) -> &[FinalizedRecord] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
