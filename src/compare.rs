// CASCHED-TRACE COMPARISON ENGINE
// ALIGNS YAT-CASCHED AND CFS GROUP STATISTICS AGAINST ONE TAXONOMY
//
// "NO DATA" IS Measurement::Absent, NEVER A ZERO. ZEROES APPEAR ONLY WHEN
// SUMMING GRAND TOTALS, WHERE AN ABSENT GROUP CONTRIBUTES NOTHING.
//
// TOTALS ARE RECONSTRUCTED AS count * mean PER GROUP. RAW PER-CALL TOTALS
// ARE NOT RETAINED PAST THE STATISTICS STAGE, SO THIS IS AN APPROXIMATION
// THAT ASSUMES A UNIFORM MEAN COST PER CALL.

use serde::ser::{Serialize, Serializer};

use crate::classify::{OpGroup, Taxonomy};
use crate::parser::Scheduler;
use crate::stats::GroupStatistics;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Measurement {
    Found(GroupStatistics),
    Absent,
}

impl Measurement {
    pub fn lookup(stats: &[GroupStatistics], group: OpGroup) -> Self {
        match stats.iter().find(|s| s.group == group) {
            Some(s) => Self::Found(*s),
            None => Self::Absent,
        }
    }

    pub fn stats(&self) -> Option<&GroupStatistics> {
        match self {
            Self::Found(s) => Some(s),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn count(&self) -> Option<usize> {
        self.stats().map(|s| s.summary.count)
    }

    pub fn mean(&self) -> Option<f64> {
        self.stats().map(|s| s.summary.mean)
    }

    pub fn min(&self) -> Option<f64> {
        self.stats().map(|s| s.summary.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.stats().map(|s| s.summary.max)
    }

    pub fn total(&self) -> Option<f64> {
        self.stats().map(|s| s.summary.reconstructed_total())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonRow {
    pub group: OpGroup,
    pub yat: Measurement,
    pub cfs: Measurement,
}

impl ComparisonRow {
    pub fn side(&self, scheduler: Scheduler) -> &Measurement {
        match scheduler {
            Scheduler::Yat => &self.yat,
            Scheduler::Cfs => &self.cfs,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
    pub yat_total: f64,
    pub cfs_total: f64,
    // POSITIVE: YAT SPENDS LESS TIME THAN CFS. None UNLESS BOTH SIDES HAVE DATA
    pub improvement_pct: Option<f64>,
}

impl ComparisonReport {
    pub fn total(&self, scheduler: Scheduler) -> f64 {
        match scheduler {
            Scheduler::Yat => self.yat_total,
            Scheduler::Cfs => self.cfs_total,
        }
    }

    pub fn has_data(&self, scheduler: Scheduler) -> bool {
        self.rows.iter().any(|r| !r.side(scheduler).is_absent())
    }

    // BOTH SIDES MEASURED: THE IMPROVEMENT FIGURE MEANS SOMETHING
    pub fn is_comparable(&self) -> bool {
        self.has_data(Scheduler::Yat) && self.has_data(Scheduler::Cfs)
    }
}

// (BASELINE - CANDIDATE) / BASELINE * 100, WITH A ZERO BASELINE -> 0
pub fn relative_improvement(baseline: f64, candidate: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    (baseline - candidate) / baseline * 100.0
}

// INPUTS ARE BORROWED AND NEVER MUTATED. OUTPUT IS A FRESH REPORT.
pub fn compare(
    taxonomy: &Taxonomy,
    yat: &[GroupStatistics],
    cfs: &[GroupStatistics],
) -> ComparisonReport {
    let rows: Vec<ComparisonRow> = taxonomy
        .groups()
        .iter()
        .map(|&group| ComparisonRow {
            group,
            yat: Measurement::lookup(yat, group),
            cfs: Measurement::lookup(cfs, group),
        })
        .filter(|r| !(r.yat.is_absent() && r.cfs.is_absent()))
        .collect();

    let yat_total: f64 = rows.iter().filter_map(|r| r.yat.total()).sum();
    let cfs_total: f64 = rows.iter().filter_map(|r| r.cfs.total()).sum();

    let mut report = ComparisonReport {
        rows,
        yat_total,
        cfs_total,
        improvement_pct: None,
    };
    if report.is_comparable() {
        report.improvement_pct = Some(relative_improvement(cfs_total, yat_total));
    }
    report
}

// PER-SCHEDULER ROLLUP

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerSummary {
    pub scheduler: Scheduler,
    pub groups: usize,
    pub total_calls: usize,
    pub mean_of_means: f64,
    pub grand_total_ns: f64,
}

impl SchedulerSummary {
    // None WHEN THE SCHEDULER HAS NO POPULATED GROUP
    pub fn from_stats(scheduler: Scheduler, stats: &[GroupStatistics]) -> Option<Self> {
        if stats.is_empty() {
            return None;
        }
        let groups = stats.len();
        Some(Self {
            scheduler,
            groups,
            total_calls: stats.iter().map(|s| s.summary.count).sum(),
            mean_of_means: stats.iter().map(|s| s.summary.mean).sum::<f64>() / groups as f64,
            grand_total_ns: stats.iter().map(|s| s.summary.reconstructed_total()).sum(),
        })
    }
}

// SERIALIZED SHAPE FOR EXTERNAL RENDERERS. ABSENT -> null.

#[derive(serde::Serialize)]
struct RowView {
    group: OpGroup,
    yat_count: Option<usize>,
    cfs_count: Option<usize>,
    yat_mean: Option<f64>,
    cfs_mean: Option<f64>,
    yat_min: Option<f64>,
    cfs_min: Option<f64>,
    yat_max: Option<f64>,
    cfs_max: Option<f64>,
    yat_total: Option<f64>,
    cfs_total: Option<f64>,
}

impl From<&ComparisonRow> for RowView {
    fn from(r: &ComparisonRow) -> Self {
        Self {
            group: r.group,
            yat_count: r.yat.count(),
            cfs_count: r.cfs.count(),
            yat_mean: r.yat.mean(),
            cfs_mean: r.cfs.mean(),
            yat_min: r.yat.min(),
            cfs_min: r.cfs.min(),
            yat_max: r.yat.max(),
            cfs_max: r.cfs.max(),
            yat_total: r.yat.total(),
            cfs_total: r.cfs.total(),
        }
    }
}

impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RowView::from(self).serialize(serializer)
    }
}

#[derive(serde::Serialize)]
struct TotalsView {
    yat_total: Option<f64>,
    cfs_total: Option<f64>,
    improvement_pct: Option<f64>,
}

#[derive(serde::Serialize)]
struct ReportView<'a> {
    rows: &'a [ComparisonRow],
    totals: TotalsView,
}

impl Serialize for ComparisonReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = |s: Scheduler| self.has_data(s).then(|| self.total(s));
        ReportView {
            rows: &self.rows,
            totals: TotalsView {
                yat_total: present(Scheduler::Yat),
                cfs_total: present(Scheduler::Cfs),
                improvement_pct: self.improvement_pct,
            },
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;

    fn gs(group: OpGroup, scheduler: Scheduler, samples: &[f64]) -> GroupStatistics {
        GroupStatistics {
            group,
            scheduler,
            summary: summarize(samples).unwrap(),
        }
    }

    #[test]
    fn improvement_guarded_on_zero_baseline() {
        assert_eq!(relative_improvement(0.0, 0.0), 0.0);
        assert_eq!(relative_improvement(0.0, 500.0), 0.0);
        assert!(!relative_improvement(0.0, 500.0).is_nan());
    }

    #[test]
    fn improvement_sign() {
        assert_eq!(relative_improvement(200.0, 150.0), 25.0);
        assert_eq!(relative_improvement(200.0, 250.0), -25.0);
    }

    #[test]
    fn rows_follow_taxonomy_and_skip_double_absent() {
        let yat = vec![
            gs(OpGroup::UpdateCurr, Scheduler::Yat, &[100.0]),
            gs(OpGroup::Dequeue, Scheduler::Yat, &[300.0, 500.0]),
        ];
        let cfs = vec![gs(OpGroup::PickNext, Scheduler::Cfs, &[50.0])];
        let r = compare(&Taxonomy::default(), &yat, &cfs);

        let groups: Vec<OpGroup> = r.rows.iter().map(|row| row.group).collect();
        assert_eq!(groups, vec![OpGroup::Dequeue, OpGroup::PickNext, OpGroup::UpdateCurr]);
        assert!(r.rows[0].cfs.is_absent());
        assert!(r.rows[1].yat.is_absent());
        assert_eq!(r.rows[1].cfs.count(), Some(1));
    }

    #[test]
    fn totals_are_count_times_mean() {
        let yat = vec![
            gs(OpGroup::Dequeue, Scheduler::Yat, &[300.0, 500.0]),
            gs(OpGroup::TaskTick, Scheduler::Yat, &[1000.0]),
        ];
        let cfs = vec![
            gs(OpGroup::Dequeue, Scheduler::Cfs, &[600.0, 600.0]),
            gs(OpGroup::TaskTick, Scheduler::Cfs, &[800.0]),
        ];
        let r = compare(&Taxonomy::default(), &yat, &cfs);
        for row in &r.rows {
            for side in [&row.yat, &row.cfs] {
                let s = side.stats().unwrap();
                assert_eq!(side.total(), Some(s.summary.count as f64 * s.summary.mean));
            }
        }
        assert_eq!(r.yat_total, 1800.0);
        assert_eq!(r.cfs_total, 2000.0);
        assert_eq!(r.improvement_pct, Some(10.0));
        assert!(r.is_comparable());
    }

    #[test]
    fn single_scheduler_report() {
        let yat = vec![gs(OpGroup::Enqueue, Scheduler::Yat, &[400.0])];
        let r = compare(&Taxonomy::default(), &yat, &[]);
        assert_eq!(r.rows.len(), 1);
        assert_eq!(r.cfs_total, 0.0);
        assert_eq!(r.improvement_pct, None);
        assert!(r.has_data(Scheduler::Yat));
        assert!(!r.has_data(Scheduler::Cfs));
        assert!(!r.is_comparable());
    }

    #[test]
    fn inputs_untouched_and_output_deterministic() {
        let yat = vec![gs(OpGroup::Dequeue, Scheduler::Yat, &[1.0, 2.0, 3.0])];
        let cfs = vec![gs(OpGroup::Dequeue, Scheduler::Cfs, &[4.0])];
        let before = (yat.clone(), cfs.clone());
        let a = compare(&Taxonomy::default(), &yat, &cfs);
        let b = compare(&Taxonomy::default(), &yat, &cfs);
        assert_eq!(a, b);
        assert_eq!(before, (yat, cfs));
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn json_uses_null_for_absent() {
        let cfs = vec![gs(OpGroup::PutPrev, Scheduler::Cfs, &[250.0])];
        let r = compare(&Taxonomy::default(), &[], &cfs);
        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        let row = &v["rows"][0];
        assert_eq!(row["group"], "put_prev");
        assert!(row["yat_count"].is_null());
        assert!(row["yat_mean"].is_null());
        assert_eq!(row["cfs_count"], 1);
        assert_eq!(row["cfs_total"], 250.0);
        assert!(v["totals"]["yat_total"].is_null());
        assert_eq!(v["totals"]["cfs_total"], 250.0);
        assert!(v["totals"]["improvement_pct"].is_null());
    }

    #[test]
    fn baseline_only_report_claims_no_improvement() {
        // NO YAT DATA MUST NOT READ AS A 100% IMPROVEMENT
        let cfs = vec![
            gs(OpGroup::Dequeue, Scheduler::Cfs, &[600.0, 600.0]),
            gs(OpGroup::TaskTick, Scheduler::Cfs, &[800.0]),
        ];
        let r = compare(&Taxonomy::default(), &[], &cfs);
        assert_eq!(r.cfs_total, 2000.0);
        assert_eq!(r.improvement_pct, None);
        assert!(!r.is_comparable());
    }

    #[test]
    fn zero_baseline_with_both_sides_is_zero_improvement() {
        let yat = vec![gs(OpGroup::Dequeue, Scheduler::Yat, &[500.0])];
        let cfs = vec![gs(OpGroup::Dequeue, Scheduler::Cfs, &[0.0])];
        let r = compare(&Taxonomy::default(), &yat, &cfs);
        assert!(r.is_comparable());
        assert_eq!(r.cfs_total, 0.0);
        assert_eq!(r.improvement_pct, Some(0.0));
    }

    #[test]
    fn scheduler_summary_rollup() {
        let stats = vec![
            gs(OpGroup::Dequeue, Scheduler::Yat, &[100.0, 300.0]),
            gs(OpGroup::TaskTick, Scheduler::Yat, &[600.0]),
        ];
        let s = SchedulerSummary::from_stats(Scheduler::Yat, &stats).unwrap();
        assert_eq!(s.groups, 2);
        assert_eq!(s.total_calls, 3);
        assert_eq!(s.mean_of_means, 400.0);
        assert_eq!(s.grand_total_ns, 1000.0);
        assert!(SchedulerSummary::from_stats(Scheduler::Cfs, &[]).is_none());
    }
}
