//! Report type definitions for the rendering model.
//!
//! `StatusSummary` holds every number the report shows, already converted
//! to percentages of the task's job total. `ReportLine` is one line of the
//! human-readable rendering of that summary.

use crate::types::SubStatus;
use serde::Serialize;
use std::fmt;

/// Share of the task's jobs carrying one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: u64,
    /// Percentage of the global total, rounded to one decimal
    pub percent: f64,
}

/// Error-table row attributed to a site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteErrorShare {
    pub exit_code: String,
    pub error_list: String,
    pub count: u64,
    pub percent: f64,
}

/// Detail block for one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSummary {
    pub name: String,
    pub states: Vec<Share>,
    pub errors: Vec<SiteErrorShare>,
}

/// Breakdown of one sub-status, `first` and `retry` excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub status: SubStatus,
    pub shares: Vec<Share>,
}

/// Global error-table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorShare {
    pub exit_code: String,
    pub count: u64,
    pub percent: f64,
}

/// Everything the status report displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSummary {
    pub task_status: String,
    /// Messages the server attached to a failed request
    pub server_messages: Vec<String>,
    pub total: u64,
    /// Display buckets of `jobsPerState` with a positive count
    pub states: Vec<Share>,
    pub sites: Vec<String>,
    /// Present only when site detail was requested
    pub site_details: Option<Vec<SiteSummary>>,
    pub breakdowns: Vec<Breakdown>,
    pub resubmissions: u64,
    pub resubmission_percent: Option<f64>,
    /// Present only when failure detail was requested and errors were fetched
    pub errors: Option<Vec<ErrorShare>>,
}

/// One line of the rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// Indentation level, four spaces each
    pub depth: usize,
    /// Prefix shown before `text` when printed
    pub caption: Option<&'static str>,
    pub text: String,
}

impl ReportLine {
    pub fn new(depth: usize, text: impl Into<String>) -> Self {
        ReportLine { depth, caption: None, text: text.into() }
    }

    pub fn captioned(caption: &'static str, text: impl Into<String>) -> Self {
        ReportLine { depth: 0, caption: Some(caption), text: text.into() }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}", "", width = self.depth * 4)?;
        if let Some(caption) = self.caption {
            write!(f, "{}", caption)?;
        }
        write!(f, "{}", self.text)
    }
}
