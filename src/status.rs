/// The status command pipeline
///
/// Fetch the task summary, fetch the error breakdown when a section needs
/// it, then aggregate. Any non-200 answer aborts before a single report line
/// exists.
use crate::api::{FetchResponse, StatusClient};
use crate::error::{Result, StatusError};
use crate::report::{self, ReportLine, StatusSummary};
use crate::types::{CounterTree, DetailFlags, ErrorTable};
use log::debug;

fn ensure_success(task: &str, response: &FetchResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(StatusError::Communication {
        task: task.to_string(),
        status: response.status,
        body: response.body.to_string(),
        reason: response.reason.clone(),
    })
}

/// Fetch and parse everything the report for `task` needs
fn fetch_inputs(
    client: &dyn StatusClient,
    task: &str,
    flags: &DetailFlags,
) -> Result<(CounterTree, Option<ErrorTable>)> {
    debug!("Looking up detailed status of task {}", task);
    let summary = client.fetch_task_summary(task)?;
    ensure_success(task, &summary)?;
    debug!("{}", summary.body);

    // The error breakdown is only worth a request when a section shows it
    let errors = if flags.wants_errors() {
        let response = client.fetch_error_breakdown(task, flags.short_format())?;
        ensure_success(task, &response)?;
        debug!("{}", response.body);
        Some(ErrorTable::from_response(&response.body, flags.short_format())?)
    } else {
        None
    };

    let counters = CounterTree::from_response(&summary.body)?;
    debug!("campaign {} is {}", counters.campaign, counters.campaign_status);
    if let Some(table) = &errors {
        debug!("{} error rows ({} format)", table.rows.len(), if table.short_format { "short" } else { "full" });
    }

    Ok((counters, errors))
}

/// Query the server for `task` and aggregate the answer
pub fn fetch_report(client: &dyn StatusClient, task: &str, flags: &DetailFlags) -> Result<StatusSummary> {
    let (counters, errors) = fetch_inputs(client, task, flags)?;
    Ok(report::summarize(&counters, flags, errors.as_ref()))
}

/// Query the server for `task` and render the report lines
///
/// Server messages of a failed request follow the report itself.
pub fn fetch_and_render(client: &dyn StatusClient, task: &str, flags: &DetailFlags) -> Result<Vec<ReportLine>> {
    let (counters, errors) = fetch_inputs(client, task, flags)?;
    let mut lines = report::render(&counters, flags, errors.as_ref());
    lines.extend(report::server_message_lines(&counters.request_messages));
    Ok(lines)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;
