//! Roster loading: eligible delegates from config or a JSON file.

mod loader;

pub use loader::{DEFAULT_DELEGATES, RosterLoadError, RosterLoader};
