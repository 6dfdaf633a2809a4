//! Shared building blocks for the viewing activity analyzer.
//!
//! Holds the error type, the record types that flow through the pipeline,
//! the user selectors, timezone and duration helpers, display formatting and
//! CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod selection;
pub mod settings;
pub mod time_utils;

pub use error::{Result, ViewingError};
