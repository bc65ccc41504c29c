//! In-memory durable store

mod store;

pub use store::MemoryStore;
