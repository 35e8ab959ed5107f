// CASCHED-TRACE SAMPLE FILTER
// ADMISSION GATE: ONLY SCHEDULER-RELEVANT FUNCTION NAMES ARE KEPT

// ACTIVE KEYWORDS
pub const DEFAULT_KEYWORDS: [&str; 10] = [
    "yat_casched",
    "fair",
    "schedule",
    "tick",
    "enqueue",
    "dequeue",
    "pick",
    "select",
    "put",
    "update_curr",
];

// OFF BY DEFAULT, SEE FilterConfig
pub const LOAD_BALANCE_KEYWORD: &str = "balance";
pub const PREEMPTION_KEYWORD: &str = "wakeup";

// NAMES THIS SHORT OR SHORTER ARE NEVER ADMITTED
const MIN_NAME_CHARS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleFilter {
    keywords: Vec<String>,
}

impl Default for SampleFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }
}

impl SampleFilter {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }

    pub fn with_optional(load_balance: bool, preemption: bool) -> Self {
        let mut filter = Self::default();
        if load_balance {
            filter.keywords.push(LOAD_BALANCE_KEYWORD.to_string());
        }
        if preemption {
            filter.keywords.push(PREEMPTION_KEYWORD.to_string());
        }
        filter
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn admits(&self, function_name: &str) -> bool {
        function_name.chars().count() > MIN_NAME_CHARS
            && self.keywords.iter().any(|k| function_name.contains(k.as_str()))
    }
}
