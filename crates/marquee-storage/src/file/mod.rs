//! JSON-file durable store

mod store;

pub use store::FileStore;
