//! Line-oriented rendering of a status summary.
//!
//! Produces the report as a sequence of `ReportLine`s in a fixed order:
//! task status, overall states, site count, site details, sub-status
//! breakdowns, resubmissions, error list. Nothing is printed here.

use super::stats::{MAX_LISTED_SITES, format_percent, summarize};
use super::types::{ReportLine, Share, StatusSummary};
use crate::types::{CounterTree, DetailFlags, ErrorTable};

/// Shown instead of the state breakdown when no display state has jobs yet.
pub const BEING_SUBMITTED: &str = "jobs are being submitted";

/// Shown when site detail was requested but the server knows no sites.
pub const NO_SITE_INFO: &str = "Information per site are not available.";

/// Aggregate and render in one step.
pub fn render(counters: &CounterTree, flags: &DetailFlags, errors: Option<&ErrorTable>) -> Vec<ReportLine> {
    render_summary(&summarize(counters, flags, errors))
}

fn share_line(depth: usize, share: &Share) -> ReportLine {
    ReportLine::new(depth, format!("{} {}", share.label, format_percent(share.percent)))
}

/// Messages the server attached to a failed request, shown after the report.
///
/// Empty when there are no messages.
pub fn server_message_lines(messages: &[String]) -> Vec<ReportLine> {
    if messages.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![ReportLine::new(0, "Server Messages:")];
    lines.extend(messages.iter().map(|m| ReportLine::new(1, m.clone())));
    lines
}

/// Render an already aggregated summary.
pub fn render_summary(summary: &StatusSummary) -> Vec<ReportLine> {
    let mut lines = vec![ReportLine::captioned("Task status:\t\t", summary.task_status.clone())];

    if summary.states.is_empty() {
        lines.push(ReportLine::new(1, BEING_SUBMITTED));
    } else {
        lines.extend(summary.states.iter().map(|s| share_line(1, s)));
    }

    let site_count = summary.sites.len();
    if site_count == 0 || site_count > MAX_LISTED_SITES {
        lines.push(ReportLine::new(0, format!("Using {} site(s)", site_count)));
    } else {
        lines.push(ReportLine::new(0, format!("Using {} site(s): {}", site_count, summary.sites.join(", "))));
    }

    if let Some(site_details) = &summary.site_details {
        if site_details.is_empty() {
            lines.push(ReportLine::new(0, NO_SITE_INFO));
        }
        for site in site_details {
            lines.push(ReportLine::new(0, format!("{}:", site.name)));
            lines.extend(site.states.iter().map(|s| share_line(1, s)));
            for err in &site.errors {
                lines.push(ReportLine::new(
                    1,
                    format!(
                        "{} with exit code {}. Error list: {}",
                        format_percent(err.percent),
                        err.exit_code,
                        err.error_list
                    ),
                ));
            }
        }
    }

    for breakdown in &summary.breakdowns {
        lines.push(ReportLine::new(0, format!("{} breakdown:", breakdown.status.as_str())));
        lines.extend(breakdown.shares.iter().map(|s| share_line(1, s)));
    }

    if let Some(pct) = summary.resubmission_percent {
        lines.push(ReportLine::new(0, format!("{} using the automatic resubmission", format_percent(pct))));
    }

    if let Some(errors) = &summary.errors {
        lines.push(ReportLine::new(0, "List of errors:"));
        for err in errors {
            lines.push(ReportLine::new(1, format!("{} have exit code {}", format_percent(err.percent), err.exit_code)));
        }
    }

    lines
}

#[cfg(test)]
#[path = "lines_test.rs"]
mod lines_test;
