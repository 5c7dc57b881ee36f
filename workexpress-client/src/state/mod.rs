//! Client-side request state
//!
//! Small building blocks the UI layer uses to keep requests honest:
//! in-flight guards, last-write-wins search sequencing, debouncing and the
//! recent-search history.

mod debounce;
mod history;
mod mutation;
mod sequence;

pub use debounce::Debouncer;
pub use history::RecentSearches;
pub use mutation::{InFlightGuard, InFlightSet, MutationState};
pub use sequence::{SearchSequencer, SearchTicket};
