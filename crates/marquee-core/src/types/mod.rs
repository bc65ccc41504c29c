//! Core types for query cache operations

mod entry;
mod options;
mod state;
mod stats;

pub use entry::CacheEntry;
pub use options::{QueryOptions, QueryOpts};
pub use state::{FetchStatus, QueryState};
pub use stats::QueryStats;
