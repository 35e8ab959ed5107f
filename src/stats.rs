// CASCHED-TRACE STATISTICS ENGINE
// DESCRIPTIVE STATISTICS OVER DURATION SAMPLES (NS). PURE FUNCTIONS.
//
// EMPTY INPUT HAS NO STATISTICS: summarize() RETURNS None AND THE GROUP IS
// LEFT OUT, NEVER ZERO-FILLED. A SINGLE SAMPLE HAS STDDEV 0.

use serde::Serialize;

use crate::classify::{GroupedSamples, OpGroup};
use crate::parser::{FunctionBuckets, Scheduler};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    // RECONSTRUCTED TOTAL: count * mean. AN APPROXIMATION OF AGGREGATE COST
    // THAT ASSUMES A UNIFORM PER-CALL MEAN; NOT A RE-SUM OF RAW DURATIONS.
    pub fn reconstructed_total(&self) -> f64 {
        self.count as f64 * self.mean
    }
}

pub fn summarize(samples: &[f64]) -> Option<Summary> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len();
    let mean = samples.iter().sum::<f64>() / n as f64;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(Summary {
        count: n,
        mean,
        median: median_sorted(&sorted),
        stddev: sample_stddev(samples, mean),
        min: sorted[0],
        max: sorted[n - 1],
    })
}

// SORTED-MIDDLE CONVENTION: EVEN COUNTS AVERAGE THE TWO MIDDLE VALUES
fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

// N-1 DENOMINATOR. NO SAMPLE VARIANCE EXISTS FOR ONE OBSERVATION -> 0.
fn sample_stddev(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len();
    if n <= 1 {
        return 0.0;
    }
    let ss: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub group: OpGroup,
    pub scheduler: Scheduler,
    #[serde(flatten)]
    pub summary: Summary,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionStatistics {
    pub function_name: String,
    pub scheduler: Scheduler,
    #[serde(flatten)]
    pub summary: Summary,
}

// TAXONOMY ORDER. EMPTY GROUPS ARE OMITTED.
pub fn group_statistics(scheduler: Scheduler, grouped: &GroupedSamples) -> Vec<GroupStatistics> {
    grouped
        .iter()
        .filter_map(|(group, samples)| {
            summarize(samples).map(|summary| GroupStatistics { group, scheduler, summary })
        })
        .collect()
}

// NAME ORDER. INCLUDES FUNCTIONS THAT CLASSIFY INTO NO GROUP.
pub fn function_statistics(scheduler: Scheduler, buckets: &FunctionBuckets) -> Vec<FunctionStatistics> {
    buckets
        .iter()
        .filter_map(|(name, samples)| {
            summarize(samples).map(|summary| FunctionStatistics {
                function_name: name.to_string(),
                scheduler,
                summary,
            })
        })
        .collect()
}
