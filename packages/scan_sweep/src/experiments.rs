//! The three experiments run for every input size.
//!
//! Each experiment times its scans with [`measure()`] and checks every result against the
//! sequential baseline before reporting it.

use std::hint::black_box;
use std::num::NonZero;

use inclusive_scan::{inclusive_scan, sequential_inclusive_scan};
use tracing::debug;

use crate::{
    PolicyReport, PolicyRow, SequentialReport, SweepError, SweepReport, SweepRow, measure,
    pooled_inclusive_scan, verify,
};

/// A scan implementation compared in the library policies experiment.
struct Policy {
    name: &'static str,
    scan: fn(&[i32]) -> Vec<i32>,
}

/// The first entry is the reference that the others are compared against.
const POLICIES: &[Policy] = &[
    Policy {
        name: "single pass",
        scan: sequential_inclusive_scan::<i32>,
    },
    Policy {
        name: "iterator adapter",
        scan: iterator_inclusive_scan,
    },
    Policy {
        name: "rayon pool",
        scan: pooled_inclusive_scan::<i32>,
    },
];

fn iterator_inclusive_scan(data: &[i32]) -> Vec<i32> {
    data.iter()
        .scan(0_i32, |total, &value| {
            *total = total.wrapping_add(value);
            Some(*total)
        })
        .collect()
}

/// Experiment 1: times one sequential scan and returns its result as the baseline for the
/// other experiments.
pub(crate) fn sequential_baseline(data: &[i32]) -> (SequentialReport, Vec<i32>) {
    let mut result = Vec::new();
    let millis = measure(|| result = sequential_inclusive_scan(data));

    debug!(size = data.len(), millis, "sequential baseline complete");

    (
        SequentialReport {
            size: data.len(),
            millis,
        },
        result,
    )
}

/// Experiment 2: times each of the [`POLICIES`] once.
pub(crate) fn library_policies(data: &[i32], expected: &[i32]) -> Result<PolicyReport, SweepError> {
    let mut rows = Vec::with_capacity(POLICIES.len());

    for policy in POLICIES {
        let mut result = Vec::new();
        let millis = measure(|| result = (policy.scan)(data));

        verify(policy.name, expected, &result)?;
        debug!(policy = policy.name, millis, "policy measured");

        rows.push(PolicyRow {
            name: policy.name,
            millis,
        });
    }

    Ok(PolicyReport {
        size: data.len(),
        rows,
    })
}

/// Experiment 3: times the two-phase parallel scan for every worker count from 1 up to
/// `max_workers`, against a freshly timed sequential baseline.
pub(crate) fn worker_sweep(
    data: &[i32],
    expected: &[i32],
    max_workers: NonZero<usize>,
    hardware_threads: NonZero<usize>,
) -> Result<SweepReport, SweepError> {
    let mut baseline = Vec::new();
    let baseline_millis = measure(|| baseline = sequential_inclusive_scan(data));
    drop(black_box(baseline));

    let mut rows = Vec::with_capacity(max_workers.get());

    for workers in 1..=max_workers.get() {
        let mut result = Ok(Vec::new());
        let millis = measure(|| result = inclusive_scan(data, workers));

        verify(&format!("K={workers}"), expected, &result?)?;
        debug!(workers, millis, "sweep step measured");

        rows.push(SweepRow { workers, millis });
    }

    Ok(SweepReport::new(
        data.len(),
        hardware_threads,
        max_workers,
        baseline_millis,
        rows,
    ))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;

    use super::*;

    fn sample_data() -> Vec<i32> {
        (0..2500).map(|i| i % 100 + 1).collect()
    }

    #[test]
    fn iterator_scan_matches_sequential() {
        let data = sample_data();

        assert_eq!(
            iterator_inclusive_scan(&data),
            sequential_inclusive_scan(&data)
        );
        assert!(iterator_inclusive_scan(&[]).is_empty());
    }

    #[test]
    fn baseline_returns_scan_result() {
        let (report, result) = sequential_baseline(&[2, 2, 2]);

        assert_eq!(report.size, 3);
        assert_eq!(result, vec![2, 4, 6]);
    }

    #[test]
    fn policies_report_every_policy_in_order() {
        let data = sample_data();
        let expected = sequential_inclusive_scan(&data);

        let report = library_policies(&data, &expected).unwrap();

        let names = report.rows.iter().map(|row| row.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["single pass", "iterator adapter", "rayon pool"]);
    }

    #[test]
    fn policies_detect_wrong_baseline() {
        let data = sample_data();
        let wrong = vec![0; data.len()];

        let error = library_policies(&data, &wrong).unwrap_err();

        assert!(matches!(error, SweepError::Mismatch { index: 0, .. }));
    }

    #[test]
    fn sweep_covers_every_worker_count() {
        let data = sample_data();
        let expected = sequential_inclusive_scan(&data);

        let report = worker_sweep(&data, &expected, nz!(5), nz!(2)).unwrap();

        let workers = report.rows().iter().map(|row| row.workers).collect::<Vec<_>>();
        assert_eq!(workers, vec![1, 2, 3, 4, 5]);
        assert!((1..=5).contains(&report.best().workers));
    }

    #[test]
    fn sweep_detects_wrong_baseline() {
        let data = sample_data();
        let mut wrong = sequential_inclusive_scan(&data);
        *wrong.last_mut().unwrap() += 1;

        let error = worker_sweep(&data, &wrong, nz!(2), nz!(1)).unwrap_err();

        assert_eq!(
            error.to_string(),
            "K=1 disagrees with the sequential baseline at index 2499"
        );
    }
}
