// CASCHED-TRACE ANALYSIS CONFIGURATION
// ONE PLACE FOR THE KNOBS THAT SHAPE A RUN: WHICH FUNCTION FAMILIES ARE
// ADMITTED, WHICH OPERATION GROUPS ARE REPORTED, HOW MUCH INPUT IS ECHOED.

use crate::classify::Taxonomy;
use crate::filter::SampleFilter;

pub const DEFAULT_PREVIEW_LINES: usize = 5;
pub const DEFAULT_PREVIEW_MATCHES: usize = 15;

// OPTIONAL FUNCTION FAMILIES. BOTH OFF BY DEFAULT: THE ACTIVE SET COVERS
// THE CACHE/TICK-RELATED PATH ONLY.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub load_balance: bool,
    pub preemption: bool,
}

impl FilterConfig {
    pub fn sample_filter(self) -> SampleFilter {
        SampleFilter::with_optional(self.load_balance, self.preemption)
    }

    pub fn taxonomy(self) -> Taxonomy {
        Taxonomy::with_optional(self.load_balance, self.preemption)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    pub filter: SampleFilter,
    pub taxonomy: Taxonomy,
    // RAW LINES ECHOED AT DEBUG LEVEL (FORMAT DISCOVERY)
    pub preview_lines: usize,
    // ADMITTED SAMPLES ECHOED AT DEBUG LEVEL
    pub preview_matches: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_filter(FilterConfig::default())
    }
}

impl AnalysisConfig {
    pub fn from_filter(filter: FilterConfig) -> Self {
        Self {
            filter: filter.sample_filter(),
            taxonomy: filter.taxonomy(),
            preview_lines: DEFAULT_PREVIEW_LINES,
            preview_matches: DEFAULT_PREVIEW_MATCHES,
        }
    }
}
