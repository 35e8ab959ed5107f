// CASCHED-TRACE REPORT RENDERING
// TURNS ENGINE OUTPUT INTO TEXT TABLES. EVERY RENDERER RETURNS LINES; THE
// CALLER DECIDES WHERE THEY GO.
//
// ABSENT VALUES PRINT AS "-" SO "NO DATA" NEVER READS AS A MEASURED ZERO.

use crate::compare::{ComparisonReport, SchedulerSummary};
use crate::parser::{ParsedTrace, Scheduler};
use crate::stats::{FunctionStatistics, GroupStatistics};

pub const ABSENT: &str = "-";

const WIDE: usize = 100;

// 1234567 -> "1,234,567"
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn fmt_count(v: Option<usize>) -> String {
    v.map(|n| thousands(n as u64)).unwrap_or_else(|| ABSENT.to_string())
}

pub fn fmt_ns(v: Option<f64>, precision: usize) -> String {
    v.map(|x| format!("{:.*}", precision, x))
        .unwrap_or_else(|| ABSENT.to_string())
}

// PARSE DIAGNOSTICS: COUNTERS AND PER-FUNCTION SAMPLE COUNTS
pub fn parse_summary(source: &str, trace: &ParsedTrace) -> Vec<String> {
    let c = &trace.counters;
    let mut out = vec![
        format!("{} TRACE: {}", trace.scheduler.label(), source),
        format!("  {:<18}{}", "LINES:", thousands(c.lines_seen)),
        format!("  {:<18}{}", "MATCHED:", thousands(c.lines_matched)),
        format!("  {:<18}{}", "ADMITTED:", thousands(c.samples_admitted)),
        format!("  {:<18}{}", "REJECTED:", thousands(c.samples_rejected)),
        format!("  {:<18}{}", "UNPARSED:", thousands(c.lines_unparsed)),
        format!("  {:<18}{}", "FUNCTIONS:", trace.distinct_functions()),
    ];

    if !trace.buckets.is_empty() {
        out.push(String::new());
        out.push(format!("  {:<40} {:<8}", "FUNCTION", "SAMPLES"));
        out.push(format!("  {}", "-".repeat(50)));
        for (name, durations) in trace.buckets.iter() {
            out.push(format!("  {:<40} {:<8}", name, durations.len()));
        }
    }
    out
}

// PER-GROUP STATISTICS FOR ONE SCHEDULER
pub fn group_table(title: &str, stats: &[GroupStatistics]) -> Vec<String> {
    if stats.is_empty() {
        return Vec::new();
    }
    let mut out = vec![
        "=".repeat(WIDE),
        title.to_string(),
        "=".repeat(WIDE),
        format!(
            "{:<20} {:<10} {:<15} {:<15} {:<15} {:<15} {:<15}",
            "GROUP", "SAMPLES", "MEAN(ns)", "MEDIAN(ns)", "STDDEV(ns)", "MIN(ns)", "MAX(ns)"
        ),
        "-".repeat(WIDE),
    ];
    for g in stats {
        let s = &g.summary;
        out.push(format!(
            "{:<20} {:<10} {:<15.1} {:<15.1} {:<15.1} {:<15.1} {:<15.1}",
            g.group.name(),
            s.count,
            s.mean,
            s.median,
            s.stddev,
            s.min,
            s.max
        ));
    }
    out
}

// PER-FUNCTION STATISTICS (INSPECT VIEW)
pub fn function_table(stats: &[FunctionStatistics]) -> Vec<String> {
    if stats.is_empty() {
        return Vec::new();
    }
    let mut out = vec![
        format!(
            "{:<40} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "FUNCTION", "SAMPLES", "MEAN", "MEDIAN", "STDDEV", "MIN", "MAX"
        ),
        "-".repeat(114),
    ];
    for f in stats {
        let s = &f.summary;
        out.push(format!(
            "{:<40} {:>8} {:>12.1} {:>12.1} {:>12.1} {:>12.1} {:>12.1}",
            f.function_name, s.count, s.mean, s.median, s.stddev, s.min, s.max
        ));
    }
    out
}

// SIDE-BY-SIDE COMPARISON WITH TOTAL ROW
pub fn comparison_table(report: &ComparisonReport) -> Vec<String> {
    let header = format!(
        "{:<16} {:>10} {:>10} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>13} {:>13}",
        "GROUP",
        "YAT_CALLS",
        "CFS_CALLS",
        "YAT_AVG",
        "CFS_AVG",
        "YAT_MIN",
        "CFS_MIN",
        "YAT_MAX",
        "CFS_MAX",
        "YAT_TOTAL",
        "CFS_TOTAL"
    );
    let rule = "-".repeat(header.len());
    let mut out = vec![
        "SCHEDULER GROUP COMPARISON (ns, TOTAL = CALLS x AVG)".to_string(),
        header,
        rule.clone(),
    ];

    for r in &report.rows {
        out.push(format!(
            "{:<16} {:>10} {:>10} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>13} {:>13}",
            r.group.label(),
            fmt_count(r.yat.count()),
            fmt_count(r.cfs.count()),
            fmt_ns(r.yat.mean(), 1),
            fmt_ns(r.cfs.mean(), 1),
            fmt_ns(r.yat.min(), 1),
            fmt_ns(r.cfs.min(), 1),
            fmt_ns(r.yat.max(), 1),
            fmt_ns(r.cfs.max(), 1),
            fmt_ns(r.yat.total(), 0),
            fmt_ns(r.cfs.total(), 0),
        ));
    }

    out.push(rule);
    let total = |present: bool, v: f64| if present { Some(v) } else { None };
    out.push(format!(
        "{:<16} {:>10} {:>10} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>13} {:>13}",
        "TOTAL",
        ABSENT,
        ABSENT,
        ABSENT,
        ABSENT,
        ABSENT,
        ABSENT,
        ABSENT,
        ABSENT,
        fmt_ns(total(report.has_data(Scheduler::Yat), report.yat_total), 0),
        fmt_ns(total(report.has_data(Scheduler::Cfs), report.cfs_total), 0),
    ));
    out
}

// PER-SCHEDULER ROLLUP PLUS THE HEADLINE DELTA
pub fn summary_block(summaries: &[SchedulerSummary], report: &ComparisonReport) -> Vec<String> {
    let mut out = vec!["=".repeat(80), "SUMMARY".to_string(), "=".repeat(80)];

    for s in summaries {
        out.push(String::new());
        out.push(format!("{}:", s.scheduler.label()));
        out.push(format!("  {:<20}{}", "GROUPS:", s.groups));
        out.push(format!("  {:<20}{}", "TOTAL CALLS:", thousands(s.total_calls as u64)));
        out.push(format!("  {:<20}{:.2} ns", "MEAN OF MEANS:", s.mean_of_means));
        out.push(format!(
            "  {:<20}{:.0} ns ({:.2} ms)",
            "TOTAL TIME:",
            s.grand_total_ns,
            s.grand_total_ns / 1_000_000.0
        ));
    }

    // DELTA ONLY WHEN BOTH SIDES SPENT MEASURABLE TIME
    let positive = report.yat_total > 0.0 && report.cfs_total > 0.0;
    if let (Some(pct), true) = (report.improvement_pct, positive) {
        out.push(String::new());
        if pct >= 0.0 {
            out.push(format!("  {:<20}{:.1}% (LESS TOTAL TIME THAN CFS)", "YAT IMPROVEMENT:", pct));
        } else {
            out.push(format!("  {:<20}+{:.1}% (MORE TOTAL TIME THAN CFS)", "YAT REGRESSION:", -pct));
        }
    }
    out
}
