//! Status aggregation.
//!
//! Turns the counter tree and the optional error table into a
//! `StatusSummary`. Every percentage is relative to the task's global job
//! total, including the per-site and per-sub-status ones.

use super::types::{Breakdown, ErrorShare, Share, SiteErrorShare, SiteSummary, StatusSummary};
use crate::types::{CounterTree, DetailFlags, ErrorTable, META_BUCKETS, SubStatus};

/// Site names are listed only up to this many sites.
pub const MAX_LISTED_SITES: usize = 4;

/// Percentage of `count` in `total`, rounded half away from zero to one decimal.
///
/// Returns `None` when `total` is zero.
pub fn percent(count: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let raw = count as f64 * 100.0 / total as f64;
    Some((raw * 10.0).round() / 10.0)
}

/// Render a percentage the way every report line shows it.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn share(label: &str, count: u64, total: u64) -> Option<Share> {
    percent(count, total).map(|percent| Share { label: label.to_string(), count, percent })
}

/// Aggregate counters into a summary.
///
/// # Arguments
/// * `counters` - Parsed task summary
/// * `flags` - Requested detail sections
/// * `errors` - Error breakdown, when it was fetched
pub fn summarize(counters: &CounterTree, flags: &DetailFlags, errors: Option<&ErrorTable>) -> StatusSummary {
    let total = counters.total();

    let states = counters
        .jobs_per_state
        .iter()
        .filter(|(label, count)| *count > 0 && !META_BUCKETS.contains(label))
        .filter_map(|(label, count)| share(label, count, total))
        .collect();

    let sites = counters.details_per_site.iter().map(|s| s.name.clone()).collect();

    let site_details = flags.site.then(|| {
        counters
            .details_per_site
            .iter()
            .map(|site| SiteSummary {
                name: site.name.clone(),
                states: site
                    .first_bucket()
                    .map(|bucket| {
                        bucket
                            .iter()
                            .filter(|(_, c)| *c > 0)
                            .filter_map(|(l, c)| share(l, c, total))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default(),
                errors: errors
                    .map(|table| {
                        table
                            .rows_for_site(&site.name)
                            .filter_map(|row| {
                                percent(row.value, total).map(|percent| SiteErrorShare {
                                    exit_code: row.exit_code.clone(),
                                    error_list: row.error_list.clone(),
                                    count: row.value,
                                    percent,
                                })
                            })
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default(),
            })
            .collect()
    });

    let mut resubmissions: u64 = 0;
    let mut breakdowns = Vec::new();
    for status in SubStatus::ORDERED {
        let Some(details) = counters.sub_status(status) else {
            continue;
        };
        if let Some(retry) = details.get("retry") {
            resubmissions = resubmissions.saturating_add(retry);
        }
        if flags.is_requested(status) {
            let shares = details
                .iter()
                .filter(|(label, _)| *label != "first" && *label != "retry")
                .filter_map(|(label, count)| share(label, count, total))
                .collect();
            breakdowns.push(Breakdown { status, shares });
        }
    }

    let resubmission_percent = if resubmissions > 0 { percent(resubmissions, total) } else { None };

    let errors = match errors {
        Some(table) if flags.failure => Some(
            table
                .rows
                .iter()
                .filter_map(|row| {
                    percent(row.value, total).map(|percent| ErrorShare {
                        exit_code: row.exit_code.clone(),
                        count: row.value,
                        percent,
                    })
                })
                .collect(),
        ),
        _ => None,
    };

    StatusSummary {
        task_status: counters.campaign_status.clone(),
        server_messages: counters.request_messages.clone(),
        total,
        states,
        sites,
        site_details,
        breakdowns,
        resubmissions,
        resubmission_percent,
        errors,
    }
}
