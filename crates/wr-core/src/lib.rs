//! wedding-registry/crates/wr-core/src/lib.rs
//!
//! The central domain logic and interface definitions for the wedding registry.

pub mod models;
pub mod submissions;
pub mod totals;
pub mod ledger;
pub mod traits;
pub mod error;
pub mod service;

// Re-exporting for easier access in other crates
pub use models::*;
pub use submissions::*;
pub use totals::*;
pub use traits::*;
pub use error::*;
