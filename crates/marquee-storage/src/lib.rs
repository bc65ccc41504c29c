//! marquee-storage: Durable store backends for marquee

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "file")]
pub mod file;

mod typed;

#[cfg(feature = "memory")]
pub use memory::MemoryStore;

#[cfg(feature = "file")]
pub use file::FileStore;

pub use typed::{DEFAULT_PREFIX, TypedStore};
