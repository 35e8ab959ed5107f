// CASCHED-TRACE LOG PARSER
// DRIVES THE PATTERN CASCADE AND SAMPLE FILTER OVER ONE TRACE FILE
//
// BEST EFFORT OVER A NOISY LOG: A LINE THAT MATCHES NOTHING IS COUNTED AND
// SKIPPED, BAD BYTES ARE SUBSTITUTED. ONLY FAILING TO OPEN OR READ THE FILE
// IS AN ERROR.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use log::{debug, info};
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::TraceError;
use crate::filter::SampleFilter;
use crate::pattern::PatternCascade;

// SCHEDULER UNDER TEST (YAT) VS BASELINE (CFS)

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheduler {
    Yat,
    Cfs,
}

impl Scheduler {
    pub fn label(self) -> &'static str {
        match self {
            Self::Yat => "YAT-CASched",
            Self::Cfs => "CFS",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Yat => "yat",
            Self::Cfs => "cfs",
        }
    }
}

// ONE ADMITTED MEASUREMENT
#[derive(Clone, Debug, PartialEq)]
pub struct RawSample {
    pub function_name: String,
    pub duration_ns: f64,
    pub scheduler: Scheduler,
}

// FUNCTION NAME -> DURATIONS (NS) IN FILE ORDER.
// BTREEMAP KEEPS EVERY DOWNSTREAM ITERATION DETERMINISTIC.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionBuckets {
    buckets: BTreeMap<String, Vec<f64>>,
}

impl FunctionBuckets {
    pub fn push(&mut self, function_name: &str, duration_ns: f64) {
        match self.buckets.get_mut(function_name) {
            Some(durations) => durations.push(duration_ns),
            None => {
                self.buckets.insert(function_name.to_string(), vec![duration_ns]);
            }
        }
    }

    pub fn record(&mut self, sample: &RawSample) {
        self.push(&sample.function_name, sample.duration_ns);
    }

    pub fn get(&self, function_name: &str) -> Option<&[f64]> {
        self.buckets.get(function_name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    // DISTINCT FUNCTION NAMES
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_samples(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

// DIAGNOSTIC COUNTERS
// lines_seen == lines_unparsed + samples_admitted + samples_rejected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParseCounters {
    pub lines_seen: u64,
    pub lines_matched: u64,
    pub samples_admitted: u64,
    pub lines_unparsed: u64,
    pub samples_rejected: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Unparsed,
    Rejected,
    Admitted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTrace {
    pub scheduler: Scheduler,
    pub buckets: FunctionBuckets,
    pub counters: ParseCounters,
}

impl ParsedTrace {
    // STAND-IN WHEN THE OPTIONAL COMPARISON SOURCE IS UNAVAILABLE
    pub fn empty(scheduler: Scheduler) -> Self {
        Self {
            scheduler,
            buckets: FunctionBuckets::default(),
            counters: ParseCounters::default(),
        }
    }

    pub fn distinct_functions(&self) -> usize {
        self.buckets.len()
    }
}

pub struct TraceParser {
    scheduler: Scheduler,
    cascade: PatternCascade,
    filter: SampleFilter,
    preview_lines: usize,
    preview_matches: usize,
}

impl TraceParser {
    pub fn new(scheduler: Scheduler, config: &AnalysisConfig) -> Result<Self, TraceError> {
        Ok(Self {
            scheduler,
            cascade: PatternCascade::new(config.filter.keywords())?,
            filter: config.filter.clone(),
            preview_lines: config.preview_lines,
            preview_matches: config.preview_matches,
        })
    }

    pub fn scheduler(&self) -> Scheduler {
        self.scheduler
    }

    // OPEN AND PARSE A TRACE FILE. *.gz IS DECOMPRESSED ON THE FLY.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedTrace, TraceError> {
        if !path.exists() {
            return Err(TraceError::SourceNotFound { path: path.to_path_buf() });
        }
        let file = File::open(path).map_err(|e| TraceError::io(path, e))?;

        let gzipped = path.extension().is_some_and(|ext| ext == "gz");
        let parsed = if gzipped {
            self.parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            self.parse_reader(BufReader::new(file))
        };
        let trace = parsed.map_err(|e| TraceError::io(path, e))?;

        info!(
            "{}: parsed {} ({} lines, {} admitted, {} functions)",
            self.scheduler.label(),
            path.display(),
            trace.counters.lines_seen,
            trace.counters.samples_admitted,
            trace.distinct_functions(),
        );
        Ok(trace)
    }

    // READ RAW BYTE LINES. INVALID UTF-8 IS SUBSTITUTED, NEVER FATAL.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R) -> io::Result<ParsedTrace> {
        let mut trace = ParsedTrace::empty(self.scheduler);
        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.ingest_line(&mut trace, line.trim());
        }
        Ok(trace)
    }

    pub fn parse_str(&self, text: &str) -> ParsedTrace {
        let mut trace = ParsedTrace::empty(self.scheduler);
        for line in text.lines() {
            self.ingest_line(&mut trace, line.trim());
        }
        trace
    }

    // ONE LINE: CASCADE -> NS CONVERSION -> FILTER -> BUCKET
    pub fn ingest_line(&self, trace: &mut ParsedTrace, line: &str) -> LineOutcome {
        let counters = &mut trace.counters;
        counters.lines_seen += 1;
        if counters.lines_seen <= self.preview_lines as u64 {
            debug!("{} SAMPLE LINE {:2}: {}", self.scheduler.key(), counters.lines_seen, line);
        }

        let extraction = match self.cascade.extract(line) {
            Some(e) => e,
            None => {
                counters.lines_unparsed += 1;
                return LineOutcome::Unparsed;
            }
        };
        counters.lines_matched += 1;

        let sample = RawSample {
            duration_ns: extraction.duration_ns(),
            function_name: extraction.function_name,
            scheduler: self.scheduler,
        };

        if !self.filter.admits(&sample.function_name) {
            counters.samples_rejected += 1;
            return LineOutcome::Rejected;
        }

        counters.samples_admitted += 1;
        if counters.samples_admitted <= self.preview_matches as u64 {
            debug!(
                "{} MATCH {:2}: {:<35} = {:8.2}ns",
                self.scheduler.key(),
                counters.samples_admitted,
                sample.function_name,
                sample.duration_ns,
            );
        }
        trace.buckets.record(&sample);
        LineOutcome::Admitted
    }
}
