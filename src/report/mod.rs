//! Report generation module - Aggregation and rendering of task status.
//!
//! This module handles:
//! - Converting the counter tree and error table into a `StatusSummary`
//! - Rendering the summary as ordered report lines
//! - Export to JSON
//!
//! Printing is left to the caller.
//!
//! # Module Organization
//!
//! - `types` - Summary and line types (StatusSummary, Share, ReportLine)
//! - `stats` - Percentage computation and aggregation
//! - `lines` - Line-oriented rendering
//! - `export` - JSON export

mod export;
mod lines;
mod stats;
mod types;

// Re-export types
pub use types::{ReportLine, StatusSummary};

// Re-export aggregation functions
pub use stats::summarize;

// Re-export rendering functions
pub use lines::{render, render_summary, server_message_lines};

// Re-export export functions
pub use export::{export_json_summary, print_json_summary};
