//! marquee-core: Core traits and types for the marquee catalog layer
//!
//! This crate provides the error taxonomy, cache key canonicalization,
//! query state types and the durable store trait shared by the rest of
//! the marquee workspace.

mod error;
mod traits;
mod types;

pub use error::{Error, Result};
pub use traits::*;
pub use types::*;
