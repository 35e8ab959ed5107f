// COMPARE: YAT-CASCHED TRACE (REQUIRED) AGAINST CFS TRACE (OPTIONAL)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::{info, warn};

use casched_trace::report;
use casched_trace::{
    compare, group_statistics, AnalysisConfig, ParsedTrace, Scheduler, SchedulerSummary,
    TraceParser,
};

use super::{print_lines, FilterArgs, DEFAULT_CFS_TRACE, DEFAULT_YAT_TRACE};

#[derive(Args, Debug)]
pub struct CompareArgs {
    // TRACE CAPTURED UNDER YAT-CASCHED (*.gz ACCEPTED)
    #[arg(long, default_value = DEFAULT_YAT_TRACE)]
    pub yat: PathBuf,

    // BASELINE TRACE CAPTURED UNDER CFS. MISSING FILE -> YAT-ONLY REPORT
    #[arg(long, default_value = DEFAULT_CFS_TRACE)]
    pub cfs: PathBuf,

    // PRINT THE COMPARISON AS JSON INSTEAD OF TABLES
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

fn load_baseline(parser: &TraceParser, path: &Path) -> Result<ParsedTrace> {
    match parser.parse_file(path) {
        Ok(trace) => Ok(trace),
        Err(e) if e.is_not_found() => {
            warn!("{}, continuing with YAT-CASched only", e);
            Ok(ParsedTrace::empty(Scheduler::Cfs))
        }
        Err(e) => Err(e).context("CFS TRACE UNREADABLE"),
    }
}

pub fn run_compare(args: &CompareArgs) -> Result<()> {
    let config = AnalysisConfig::from_filter(args.filter.config());

    let yat_parser = TraceParser::new(Scheduler::Yat, &config)?;
    let cfs_parser = TraceParser::new(Scheduler::Cfs, &config)?;

    // YAT IS MANDATORY: NO TRACE, NO RUN
    let yat = yat_parser
        .parse_file(&args.yat)
        .context("YAT-CASCHED TRACE IS REQUIRED")?;
    let cfs = load_baseline(&cfs_parser, &args.cfs)?;

    let yat_stats = group_statistics(Scheduler::Yat, &config.taxonomy.group(&yat.buckets));
    let cfs_stats = group_statistics(Scheduler::Cfs, &config.taxonomy.group(&cfs.buckets));

    if yat_stats.is_empty() && cfs_stats.is_empty() {
        bail!("NO SCHEDULER SAMPLES FOUND -- CHECK THAT THE TRACES CONTAIN function_graph OUTPUT");
    }

    let cmp = compare(&config.taxonomy, &yat_stats, &cfs_stats);
    info!(
        "compared {} groups (yat {:.0} ns, cfs {:.0} ns)",
        cmp.rows.len(),
        cmp.yat_total,
        cmp.cfs_total
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cmp)?);
        return Ok(());
    }

    print_lines(&report::parse_summary(&args.yat.display().to_string(), &yat));
    println!();
    if cfs.counters.lines_seen > 0 {
        print_lines(&report::parse_summary(&args.cfs.display().to_string(), &cfs));
        println!();
    }

    print_lines(&report::group_table("YAT-CASched GROUP STATISTICS", &yat_stats));
    if !yat_stats.is_empty() {
        println!();
    }
    print_lines(&report::group_table("CFS GROUP STATISTICS", &cfs_stats));
    if !cfs_stats.is_empty() {
        println!();
    }

    print_lines(&report::comparison_table(&cmp));
    println!();

    let summaries: Vec<SchedulerSummary> = [
        SchedulerSummary::from_stats(Scheduler::Yat, &yat_stats),
        SchedulerSummary::from_stats(Scheduler::Cfs, &cfs_stats),
    ]
    .into_iter()
    .flatten()
    .collect();
    print_lines(&report::summary_block(&summaries, &cmp));

    Ok(())
}
