/// Compact job index notation
///
/// Turns a list of job indices such as `[1, 2, 3, 5, 7, 8, 9]` into
/// `1-3,5,7-9` for commands that address many jobs at once.
use std::fmt;

/// A run of consecutive job indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRange {
    Single(i64),
    Span { low: i64, high: i64 },
}

impl fmt::Display for JobRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRange::Single(n) => write!(f, "{}", n),
            JobRange::Span { low, high } => write!(f, "{}-{}", low, high),
        }
    }
}

/// Ordered runs, rendered as `a-b,c,...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeList(pub Vec<JobRange>);

impl fmt::Display for RangeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}

/// Group sorted job indices into runs of consecutive values
///
/// A run continues only while each index is exactly one more than the
/// previous one, so a repeated index starts a new run: `[1, 1, 2]` gives
/// `1,1-2`.
///
/// # Panics
/// Panics if `jobs` is empty. Callers must pass at least one index.
pub fn compress(jobs: &[i64]) -> RangeList {
    assert!(!jobs.is_empty(), "compress requires at least one job index");

    let mut sorted = jobs.to_vec();
    sorted.sort_unstable();

    let mut ranges = Vec::new();
    let mut low = sorted[0];
    let mut high = sorted[0];
    for &job in &sorted[1..] {
        if high + 1 == job {
            high = job;
        } else {
            ranges.push(to_range(low, high));
            low = job;
            high = job;
        }
    }
    ranges.push(to_range(low, high));

    RangeList(ranges)
}

fn to_range(low: i64, high: i64) -> JobRange {
    if low == high { JobRange::Single(low) } else { JobRange::Span { low, high } }
}

/// Render job indices as compact range notation, e.g. `1-3,5,7-9`
///
/// # Panics
/// Panics if `jobs` is empty.
pub fn readable_range(jobs: &[i64]) -> String {
    compress(jobs).to_string()
}

/// Parse `ranges` arguments: whitespace- or comma-separated integers
pub fn parse_indices(args: &[String]) -> Result<Vec<i64>, String> {
    args.iter()
        .flat_map(|a| a.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<i64>().map_err(|e| format!("Invalid job index '{}': {}", t, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_runs() {
        assert_eq!(readable_range(&[1, 2, 3, 5, 7, 8, 9]), "1-3,5,7-9");
    }

    #[test]
    fn test_single_index() {
        assert_eq!(readable_range(&[4]), "4");
    }

    #[test]
    fn test_no_consecutive_indices() {
        assert_eq!(readable_range(&[1, 3, 5]), "1,3,5");
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        assert_eq!(readable_range(&[3, 1, 2]), "1-3");
        assert_eq!(readable_range(&[9, 7, 1, 8, 2]), "1-2,7-9");
    }

    #[test]
    fn test_duplicate_index_starts_new_run() {
        assert_eq!(readable_range(&[1, 1, 2]), "1,1-2");
        assert_eq!(
            compress(&[1, 1, 2]),
            RangeList(vec![JobRange::Single(1), JobRange::Span { low: 1, high: 2 }])
        );
    }

    #[test]
    fn test_input_slice_is_untouched() {
        let jobs = vec![5, 4];
        assert_eq!(readable_range(&jobs), "4-5");
        assert_eq!(jobs, vec![5, 4]);
    }

    #[test]
    #[should_panic(expected = "at least one job index")]
    fn test_empty_input_panics() {
        readable_range(&[]);
    }

    #[test]
    fn test_parse_indices_accepts_commas_and_spaces() {
        let args = vec!["3,1".to_string(), "2".to_string(), "10,".to_string()];
        assert_eq!(parse_indices(&args), Ok(vec![3, 1, 2, 10]));
        assert!(parse_indices(&["x".to_string()]).is_err());
    }
}
