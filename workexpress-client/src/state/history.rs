//! Recent-search history with a JSON file store

use std::collections::VecDeque;
use std::path::Path;

use crate::ClientResult;

/// Default number of searches kept
pub const DEFAULT_CAPACITY: usize = 5;

/// Recent tracking searches, most recent first.
///
/// Re-running a search moves it to the front instead of duplicating it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentSearches {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RecentSearches {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a search. Blank queries are ignored.
    pub fn push(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }
        self.entries.retain(|e| !e.eq_ignore_ascii_case(query));
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.capacity);
    }

    pub fn remove(&mut self, query: &str) {
        self.entries.retain(|e| !e.eq_ignore_ascii_case(query.trim()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a JSON array of strings. A missing file loads as empty.
    pub fn load(path: impl AsRef<Path>, capacity: usize) -> ClientResult<Self> {
        let path = path.as_ref();
        let mut history = Self::new(capacity);
        if !path.exists() {
            return Ok(history);
        }
        let raw = std::fs::read_to_string(path)?;
        let saved: Vec<String> = match serde_json::from_str(&raw) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Discarding unreadable search history");
                return Ok(history);
            }
        };
        // Saved most-recent-first; push oldest first to keep that order
        for query in saved.iter().rev() {
            history.push(query);
        }
        Ok(history)
    }

    /// Save as a JSON array of strings, most recent first
    pub fn save(&self, path: impl AsRef<Path>) -> ClientResult<()> {
        let entries: Vec<&str> = self.entries().collect();
        std::fs::write(path, serde_json::to_string(&entries)?)?;
        Ok(())
    }
}
