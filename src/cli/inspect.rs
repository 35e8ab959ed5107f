// INSPECT: SINGLE-TRACE DIAGNOSTICS
// SHOWS WHAT THE CASCADE AND FILTER MADE OF A FILE, INCLUDING FUNCTIONS
// THAT FALL OUTSIDE EVERY OPERATION GROUP.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use casched_trace::report;
use casched_trace::{function_statistics, group_statistics, AnalysisConfig, Scheduler, TraceParser};

use super::{print_lines, FilterArgs};

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SchedulerArg {
    Yat,
    Cfs,
}

impl From<SchedulerArg> for Scheduler {
    fn from(s: SchedulerArg) -> Self {
        match s {
            SchedulerArg::Yat => Scheduler::Yat,
            SchedulerArg::Cfs => Scheduler::Cfs,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub trace: PathBuf,

    // LABEL THE SAMPLES WITH THIS SCHEDULER
    #[arg(long, value_enum, default_value_t = SchedulerArg::Yat)]
    pub scheduler: SchedulerArg,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let config = AnalysisConfig::from_filter(args.filter.config());
    let scheduler = Scheduler::from(args.scheduler);

    let parser = TraceParser::new(scheduler, &config)?;
    let trace = parser
        .parse_file(&args.trace)
        .with_context(|| format!("CANNOT INSPECT {}", args.trace.display()))?;

    print_lines(&report::parse_summary(&args.trace.display().to_string(), &trace));
    println!();

    let per_function = function_statistics(scheduler, &trace.buckets);
    print_lines(&report::function_table(&per_function));
    println!();

    let grouped = config.taxonomy.group(&trace.buckets);
    let title = format!("{} GROUP STATISTICS", scheduler.label());
    print_lines(&report::group_table(&title, &group_statistics(scheduler, &grouped)));

    if !grouped.unclassified().is_empty() {
        println!();
        println!("UNGROUPED FUNCTIONS ({}):", grouped.unclassified().len());
        for name in grouped.unclassified() {
            println!("  {}", name);
        }
    }
    Ok(())
}
