//! Electricity generation-mix dashboard core.
//!
//! Reconciles annual generation, interchange and renewable-capacity data
//! for U.S. states and the nation into one queryable model, and formats it
//! for display.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod mix;
pub mod region;
pub mod report;
pub mod source;

pub use error::{Error, Result};
