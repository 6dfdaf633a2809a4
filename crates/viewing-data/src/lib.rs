//! Data layer for the viewing activity analyzer.
//!
//! Loads a Netflix `ViewingActivity.csv` export, localizes and classifies its
//! rows, filters them by profile, content type and title, and aggregates them
//! into chart artifacts.

pub mod aggregator;
pub mod analysis;
pub mod chart;
pub mod classifier;
pub mod filters;
pub mod localizer;
pub mod reader;
pub mod titles;

pub use viewing_core as core;
