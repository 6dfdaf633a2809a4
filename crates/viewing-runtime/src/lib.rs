//! Session layer for the viewing activity analyzer.
//!
//! Holds one loaded export with its per-timezone table cache, the
//! caller-owned analysis history, and chart export to disk.

pub mod export;
pub mod history;
pub mod session;

pub use viewing_core as core;
pub use viewing_data as data;
