//! Terminal UI layer for the viewing activity analyzer.
//!
//! Provides themes, the header and selector components, chart and table
//! renderers, and the interactive application loop built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use viewing_core as core;
