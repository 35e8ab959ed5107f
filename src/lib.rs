// CASCHED-TRACE
// FTRACE COST COMPARISON: YAT-CASCHED VS CFS
//
// PIPELINE: parser (pattern + filter) -> classify -> stats -> compare -> report.
// EVERY STAGE OWNS ITS OUTPUT; NOTHING LIVES BEYOND ONE RUN.

pub mod classify;
pub mod compare;
pub mod config;
pub mod error;
pub mod filter;
pub mod parser;
pub mod pattern;
pub mod report;
pub mod stats;

pub use classify::{GroupedSamples, OpGroup, Taxonomy};
pub use compare::{compare, relative_improvement, ComparisonReport, ComparisonRow, Measurement, SchedulerSummary};
pub use config::{AnalysisConfig, FilterConfig};
pub use error::TraceError;
pub use parser::{FunctionBuckets, ParseCounters, ParsedTrace, RawSample, Scheduler, TraceParser};
pub use stats::{function_statistics, group_statistics, summarize, FunctionStatistics, GroupStatistics, Summary};
