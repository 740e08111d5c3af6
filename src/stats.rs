//! Percentile statistics over merge durations, sliced by diff size.
//!
//! The collected pulls are sorted once, ascending by merge duration; every
//! bucket report filters the pre-sorted entries, so slice order is always
//! duration order. Percentiles are nearest-rank (no interpolation).

use chrono::Duration;
use thiserror::Error;

use crate::collector::MergedPull;

/// Percentiles included in every report.
const REPORTED_PERCENTILES: [usize; 4] = [60, 70, 80, 90];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no pull requests matched filter '{0}'")]
    EmptyBucket(String),
    #[error("pull request #{number} was merged before it was created")]
    NegativeDuration { number: u64 },
}

/// A half-open diff-size interval `[min, max)`; an absent bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Bucket {
    /// The unfiltered bucket: every diff size matches.
    pub const ALL: Bucket = Bucket {
        min: None,
        max: None,
    };

    pub fn below(max: u64) -> Self {
        Bucket {
            min: None,
            max: Some(max),
        }
    }

    pub fn at_least(min: u64) -> Self {
        Bucket {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: u64, max: u64) -> Self {
        Bucket {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn contains(&self, diff_lines: u64) -> bool {
        self.min.is_none_or(|min| diff_lines >= min) && self.max.is_none_or(|max| diff_lines < max)
    }

    /// Human description of the active filter, used in report headers.
    pub fn label(&self) -> String {
        match (self.min, self.max) {
            (None, None) => "all sizes".to_string(),
            (None, Some(max)) => format!("< {max} lines"),
            (Some(min), None) => format!(">= {min} lines"),
            (Some(min), Some(max)) => format!("{min}-{max} lines"),
        }
    }
}

/// The size slices reported after the unfiltered block.
pub fn size_buckets() -> Vec<Bucket> {
    vec![
        Bucket::below(20),
        Bucket::between(20, 50),
        Bucket::between(50, 200),
        Bucket::between(200, 500),
        Bucket::at_least(500),
    ]
}

/// A merged pull request paired with its merge duration.
#[derive(Debug, Clone)]
pub struct DurationEntry {
    pub duration: Duration,
    pub pull: MergedPull,
}

/// The full collected sample, sorted ascending by merge duration.
#[derive(Debug, Clone)]
pub struct DurationSample {
    entries: Vec<DurationEntry>,
}

/// Aggregate statistics for one slice of the sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub count: usize,
    /// Description of the active size filter.
    pub filter: String,
    pub median: Duration,
    pub p60: Duration,
    pub p70: Duration,
    pub p80: Duration,
    pub p90: Duration,
    pub average: Duration,
}

impl DurationSample {
    /// Builds the sample, failing if any pull claims a merge before creation.
    pub fn from_pulls(pulls: Vec<MergedPull>) -> Result<Self, StatsError> {
        let mut entries = Vec::with_capacity(pulls.len());
        for pull in pulls {
            let duration = pull.merged_at - pull.created_at;
            if duration < Duration::zero() {
                return Err(StatsError::NegativeDuration {
                    number: pull.number,
                });
            }
            entries.push(DurationEntry { duration, pull });
        }
        entries.sort_by_key(|entry| entry.duration);
        Ok(Self { entries })
    }

    /// All entries, ascending by duration.
    pub fn entries(&self) -> &[DurationEntry] {
        &self.entries
    }

    /// Computes aggregate statistics for the entries matching `bucket`.
    ///
    /// An empty slice is an explicit error; the caller decides whether to
    /// skip the bucket or abort.
    pub fn report(&self, bucket: Bucket) -> Result<StatsReport, StatsError> {
        let durations: Vec<Duration> = self
            .entries
            .iter()
            .filter(|entry| bucket.contains(entry.pull.diff_lines))
            .map(|entry| entry.duration)
            .collect();
        if durations.is_empty() {
            return Err(StatsError::EmptyBucket(bucket.label()));
        }

        let count = durations.len();
        let total_secs: f64 = durations.iter().map(secs).sum();
        let average = Duration::milliseconds((total_secs / count as f64 * 1000.0).round() as i64);
        let [p60, p70, p80, p90] = REPORTED_PERCENTILES.map(|p| percentile(&durations, p));

        Ok(StatsReport {
            count,
            filter: bucket.label(),
            median: durations[count / 2],
            p60,
            p70,
            p80,
            p90,
            average,
        })
    }
}

fn secs(duration: &Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

/// Nearest-rank percentile: the element at index `p * n / 100` of an
/// ascending, non-empty sample. `p` must lie in `[0, 100)`; `p = 100` would
/// index one past the end.
fn percentile(sorted: &[Duration], p: usize) -> Duration {
    assert!(p < 100, "percentile must lie in [0, 100), got {p}");
    sorted[p * sorted.len() / 100]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pull(number: u64, diff_lines: u64, merge_hours: i64) -> MergedPull {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        MergedPull {
            number,
            created_at,
            merged_at: created_at + Duration::hours(merge_hours),
            diff_lines,
        }
    }

    fn sample(merge_hours: &[i64]) -> DurationSample {
        let pulls = merge_hours
            .iter()
            .enumerate()
            .map(|(i, hours)| pull(i as u64 + 1, 10, *hours))
            .collect();
        DurationSample::from_pulls(pulls).unwrap()
    }

    #[test]
    fn percentile_uses_nearest_rank_index() {
        let durations: Vec<Duration> = (0..10).map(Duration::hours).collect();
        assert_eq!(percentile(&durations, 60), Duration::hours(6));
        assert_eq!(percentile(&durations, 90), Duration::hours(9));
        assert_eq!(percentile(&durations, 0), Duration::hours(0));
    }

    #[test]
    #[should_panic(expected = "percentile must lie in [0, 100)")]
    fn percentile_rejects_one_hundred() {
        let durations = vec![Duration::hours(1)];
        percentile(&durations, 100);
    }

    #[test]
    fn median_is_the_upper_median() {
        let five = sample(&[1, 2, 3, 4, 5]);
        assert_eq!(
            five.report(Bucket::ALL).unwrap().median,
            Duration::hours(3)
        );

        let four = sample(&[1, 2, 3, 4]);
        assert_eq!(
            four.report(Bucket::ALL).unwrap().median,
            Duration::hours(3)
        );
    }

    #[test]
    fn sample_is_sorted_regardless_of_input_order() {
        let sorted = sample(&[5, 1, 4, 2, 3]);
        let hours: Vec<i64> = sorted
            .entries()
            .iter()
            .map(|e| e.duration.num_hours())
            .collect();
        assert_eq!(hours, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let broken = MergedPull {
            number: 7,
            created_at,
            merged_at: created_at - Duration::minutes(1),
            diff_lines: 10,
        };
        assert_eq!(
            DurationSample::from_pulls(vec![broken]).unwrap_err(),
            StatsError::NegativeDuration { number: 7 }
        );
    }

    #[test]
    fn buckets_partition_by_diff_size() {
        let sizes = [5u64, 15, 25, 60, 250, 600];
        let pulls = sizes
            .iter()
            .enumerate()
            .map(|(i, size)| pull(i as u64 + 1, *size, i as i64 + 1))
            .collect();
        let sample = DurationSample::from_pulls(pulls).unwrap();

        let counts: Vec<usize> = size_buckets()
            .into_iter()
            .map(|bucket| sample.report(bucket).unwrap().count)
            .collect();
        assert_eq!(counts, vec![2, 1, 1, 1, 1]);
        assert_eq!(sample.report(Bucket::ALL).unwrap().count, sizes.len());

        // Every record lands in exactly one size bucket.
        for size in sizes {
            let matching = size_buckets()
                .into_iter()
                .filter(|bucket| bucket.contains(size))
                .count();
            assert_eq!(matching, 1, "size {size}");
        }
    }

    #[test]
    fn bucket_bounds_are_half_open() {
        let bucket = Bucket::between(20, 50);
        assert!(bucket.contains(20));
        assert!(bucket.contains(49));
        assert!(!bucket.contains(50));
        assert!(!bucket.contains(19));
    }

    #[test]
    fn bucket_labels_describe_the_filter() {
        assert_eq!(Bucket::ALL.label(), "all sizes");
        assert_eq!(Bucket::below(20).label(), "< 20 lines");
        assert_eq!(Bucket::at_least(500).label(), ">= 500 lines");
        assert_eq!(Bucket::between(20, 50).label(), "20-50 lines");
    }

    #[test]
    fn empty_bucket_is_an_explicit_error() {
        let sample = sample(&[1, 2, 3]);
        assert_eq!(
            sample.report(Bucket::at_least(500)).unwrap_err(),
            StatsError::EmptyBucket(">= 500 lines".to_string())
        );
    }

    #[test]
    fn average_matches_the_arithmetic_mean() {
        let sample = sample(&[1, 2, 4]);
        let report = sample.report(Bucket::ALL).unwrap();

        let manual_secs: f64 = sample.entries().iter().map(|e| secs(&e.duration)).sum();
        let mean_ms = manual_secs / 3.0 * 1000.0;
        assert!((report.average.num_milliseconds() as f64 - mean_ms).abs() < 1.0);
    }

    #[test]
    fn end_to_end_scenario_small_bucket() {
        let pulls = (1..=5).map(|hours| pull(hours as u64, 10, hours)).collect();
        let sample = DurationSample::from_pulls(pulls).unwrap();
        let report = sample.report(Bucket::below(20)).unwrap();

        assert_eq!(report.count, 5);
        assert_eq!(report.median, Duration::hours(3));
        assert_eq!(report.p60, Duration::hours(4));
        assert_eq!(report.average, Duration::hours(3));
    }
}
