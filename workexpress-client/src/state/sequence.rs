//! Last-write-wins sequencing for searches

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter for searches.
///
/// Every search takes a ticket; only the holder of the newest ticket may
/// publish its result.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    generation: AtomicU64,
}

/// Ticket handed out by [`SearchSequencer::begin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search, superseding all earlier tickets
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }

    /// Supersede whatever is in flight without starting a new search
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let seq = SearchSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));
        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        seq.invalidate();
        assert!(!seq.is_current(second));
    }
}
