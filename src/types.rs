/// Core data structures for task status reports
///
/// This module defines the counter tree returned by the task summary query,
/// the error table returned by the error breakdown query, and the detail
/// flags selecting which breakdowns get rendered. Every structure is parsed
/// once from a response body and then only read.
use crate::error::{Result, StatusError};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Buckets of `jobsPerState` that are bookkeeping, not display states
pub const META_BUCKETS: [&str; 3] = ["total", "first", "retry"];

/// Positions inside the summary `result` list
const CAMPAIGN: usize = 0;
const CAMPAIGN_STATUS: usize = 1;
const JOBS_PER_STATE: usize = 2;
const DETAILS_PER_STATE: usize = 3;
const DETAILS_PER_SITE: usize = 4;

/// Positions inside an error row `key`
const EXIT_CODE: usize = 2;
const ERROR_LIST: usize = 3;
const SITE: usize = 4;

/// One of the four coarse lifecycle buckets with a detailed breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubStatus {
    Submitted,
    Failure,
    Queued,
    Success,
}

impl SubStatus {
    /// Order in which retry counts are collected and breakdowns are printed
    pub const ORDERED: [SubStatus; 4] = [SubStatus::Submitted, SubStatus::Failure, SubStatus::Queued, SubStatus::Success];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubStatus::Submitted => "submitted",
            SubStatus::Failure => "failure",
            SubStatus::Queued => "queued",
            SubStatus::Success => "success",
        }
    }
}

/// Label/count pairs in the order the server sent them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Counts(Vec<(String, u64)>);

impl Counts {
    pub fn get(&self, label: &str) -> Option<u64> {
        self.0.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(l, c)| (l.as_str(), *c))
    }

    fn from_value(value: &Value, what: &str) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Counts::default()),
            other => return Err(StatusError::Malformed(format!("{} is not an object: {}", what, other))),
        };

        let mut entries = Vec::with_capacity(map.len());
        for (label, count) in map {
            let count = count_value(count)
                .ok_or_else(|| StatusError::Malformed(format!("{}[{}] is not a count: {}", what, label, count)))?;
            entries.push((label.clone(), count));
        }
        Ok(Counts(entries))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Counts(iter.into_iter().map(|(l, c)| (l.into(), c)).collect())
    }
}

/// Counts may arrive as integers or as integral floats
fn count_value(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| value.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
}

/// Text form of a key component: strings verbatim, anything else as JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-site job counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteDetail {
    pub name: String,
    /// Breakdown buckets; only the first one is rendered
    pub buckets: Vec<Counts>,
}

impl SiteDetail {
    pub fn first_bucket(&self) -> Option<&Counts> {
        self.buckets.first()
    }
}

/// Result of a task summary query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterTree {
    pub campaign: String,
    pub campaign_status: String,
    pub jobs_per_state: Counts,
    pub details_per_state: HashMap<String, Counts>,
    pub details_per_site: Vec<SiteDetail>,
    /// Server messages attached to a failed request
    pub request_messages: Vec<String>,
}

impl CounterTree {
    /// Parse a summary response body
    pub fn from_response(body: &Value) -> Result<Self> {
        let result = body
            .get("result")
            .and_then(Value::as_array)
            .ok_or_else(|| StatusError::Malformed("summary has no 'result' list".to_string()))?;

        if result.len() <= DETAILS_PER_SITE {
            return Err(StatusError::Malformed(format!(
                "summary 'result' has {} entries, expected at least {}",
                result.len(),
                DETAILS_PER_SITE + 1
            )));
        }

        let mut details_per_state = HashMap::new();
        if let Some(states) = result[DETAILS_PER_STATE].as_object() {
            for (name, counts) in states {
                details_per_state.insert(name.clone(), Counts::from_value(counts, name)?);
            }
        }

        let mut details_per_site = Vec::new();
        if let Some(sites) = result[DETAILS_PER_SITE].as_object() {
            for (name, detail) in sites {
                let buckets = match detail {
                    Value::Array(items) => {
                        items.iter().map(|b| Counts::from_value(b, name)).collect::<Result<Vec<_>>>()?
                    }
                    other => vec![Counts::from_value(other, name)?],
                };
                details_per_site.push(SiteDetail { name: name.clone(), buckets });
            }
        }

        Ok(CounterTree {
            campaign: value_text(&result[CAMPAIGN]),
            campaign_status: value_text(&result[CAMPAIGN_STATUS]),
            jobs_per_state: Counts::from_value(&result[JOBS_PER_STATE], "jobsPerState")?,
            details_per_state,
            details_per_site,
            request_messages: request_messages(body),
        })
    }

    /// Denominator for every percentage in the report
    ///
    /// The server's `total` bucket when present, otherwise the sum of all
    /// display buckets.
    pub fn total(&self) -> u64 {
        self.jobs_per_state.get("total").unwrap_or_else(|| {
            self.jobs_per_state.iter().filter(|(l, _)| !META_BUCKETS.contains(l)).map(|(_, c)| c).sum()
        })
    }

    pub fn sub_status(&self, status: SubStatus) -> Option<&Counts> {
        self.details_per_state.get(status.as_str())
    }
}

/// Messages from `requestDetails` when the server marked the request as failed
fn request_messages(body: &Value) -> Vec<String> {
    let Some(details) = body.get("requestDetails") else {
        return Vec::new();
    };
    if details.get("RequestStatus").and_then(Value::as_str) != Some("failed") {
        return Vec::new();
    }

    let mut messages = Vec::new();
    if let Some(groups) = details.get("RequestMessages").and_then(Value::as_array) {
        for group in groups {
            match group {
                Value::Array(items) => messages.extend(items.iter().map(value_text)),
                other => messages.push(value_text(other)),
            }
        }
    }
    messages
}

/// One row of the error breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRow {
    pub exit_code: String,
    pub error_list: String,
    pub site: Option<String>,
    pub value: u64,
}

/// Result of an error breakdown query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTable {
    pub short_format: bool,
    /// Rows of the primary result list
    pub rows: Vec<ErrorRow>,
}

impl ErrorTable {
    /// Parse an error breakdown response body
    ///
    /// A body without results yields an empty table.
    pub fn from_response(body: &Value, short_format: bool) -> Result<Self> {
        let primary = match body.get("result").and_then(Value::as_array).and_then(|r| r.first()) {
            Some(Value::Array(rows)) => rows,
            Some(Value::Null) | None => return Ok(ErrorTable { short_format, rows: Vec::new() }),
            Some(other) => {
                return Err(StatusError::Malformed(format!("error result list is not a list: {}", other)));
            }
        };

        let mut rows = Vec::with_capacity(primary.len());
        for row in primary {
            let key = row
                .get("key")
                .and_then(Value::as_array)
                .ok_or_else(|| StatusError::Malformed(format!("error row has no 'key' list: {}", row)))?;
            let exit_code = key
                .get(EXIT_CODE)
                .map(value_text)
                .ok_or_else(|| StatusError::Malformed(format!("error row key has no exit code: {}", row)))?;
            let value = row
                .get("value")
                .and_then(count_value)
                .ok_or_else(|| StatusError::Malformed(format!("error row has no count: {}", row)))?;

            rows.push(ErrorRow {
                exit_code,
                error_list: key.get(ERROR_LIST).map(value_text).unwrap_or_default(),
                site: key.get(SITE).filter(|v| !v.is_null()).map(value_text),
                value,
            });
        }

        Ok(ErrorTable { short_format, rows })
    }

    pub fn rows_for_site<'a>(&'a self, site: &'a str) -> impl Iterator<Item = &'a ErrorRow> {
        self.rows.iter().filter(move |r| r.site.as_deref() == Some(site))
    }
}

/// Which breakdowns the caller asked for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailFlags {
    pub submitted: bool,
    pub failure: bool,
    pub queued: bool,
    pub success: bool,
    pub site: bool,
}

impl DetailFlags {
    pub fn is_requested(&self, status: SubStatus) -> bool {
        match status {
            SubStatus::Submitted => self.submitted,
            SubStatus::Failure => self.failure,
            SubStatus::Queued => self.queued,
            SubStatus::Success => self.success,
        }
    }

    /// Whether the error breakdown has to be fetched at all
    pub fn wants_errors(&self) -> bool {
        self.site || self.failure
    }

    /// Failure detail asks for the global summary, site detail for site-qualified rows
    pub fn short_format(&self) -> bool {
        self.failure
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
