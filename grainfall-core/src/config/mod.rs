//! Configuration types
//!
//! Board-agnostic simulation tuning, loadable from TOML text and storable as
//! postcard binary data.

#[cfg(feature = "serde")]
pub mod storage;
pub mod toml;
pub mod types;

pub use types::*;
