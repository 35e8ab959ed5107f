// CASCHED-TRACE PATTERN CASCADE
// EXTRACTS (DURATION, FUNCTION NAME) FROM ONE FTRACE FUNCTION-GRAPH LINE
//
// LINE SHAPES SEEN IN THE WILD:
//   | + 19.074 us   |  } /* dequeue_task_fair */
//   |   5.919 us    |  pick_next_task_fair();
//   3)  yat_sim-1117  | + 14.130 us   |  task_tick_yat_casched();
//   3)    <idle>-0    |   3.397 us    |    } /* update_curr_yat_casched */
//
// PATTERNS ARE TRIED IN ORDER. FIRST MATCH WINS; LATER PATTERNS ARE NOT
// CONSULTED. THE ORDER LIVES IN DATA (FIXED_PATTERNS), NOT IN BRANCHES.

use regex::Regex;

pub const NS_PER_US: f64 = 1000.0;

// BUILDING BLOCKS
// FLAG CHARS (+ ! #) ARE FTRACE OVERHEAD MARKERS, IGNORED FOR PARSING
const FLAGS: &str = r"[+!#\s]*";
const DURATION: &str = r"(\d+\.\d+)\s*us";
const CPU_PREFIX: &str = r"\d+\)\s+[\w<>-]+\s*";
const BRACE_COMMENT: &str = r"\}\s*/\*\s*(\w+)\s*\*/";
const INLINE_CALL: &str = r"(\w+)\(\);?";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PatternKind {
    BraceComment,
    InlineCall,
    CpuInlineCall,
    CpuBraceComment,
    Loose,
}

impl PatternKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::BraceComment => "BRACE_COMMENT",
            Self::InlineCall => "INLINE_CALL",
            Self::CpuInlineCall => "CPU_INLINE_CALL",
            Self::CpuBraceComment => "CPU_BRACE_COMMENT",
            Self::Loose => "LOOSE",
        }
    }
}

// STRICT PATTERNS IN PRIORITY ORDER. LOOSE IS APPENDED LAST, BUILT FROM
// THE ACTIVE KEYWORD SET.
fn fixed_patterns() -> [(PatternKind, String); 4] {
    [
        (
            PatternKind::BraceComment,
            format!(r"\|\s*{FLAGS}{DURATION}\s*\|\s*{BRACE_COMMENT}"),
        ),
        (
            PatternKind::InlineCall,
            format!(r"\|\s*{FLAGS}{DURATION}\s*\|\s*{INLINE_CALL}"),
        ),
        (
            PatternKind::CpuInlineCall,
            format!(r"{CPU_PREFIX}\|\s*{FLAGS}{DURATION}\s*\|\s*{INLINE_CALL}"),
        ),
        (
            PatternKind::CpuBraceComment,
            format!(r"{CPU_PREFIX}\|\s*{FLAGS}{DURATION}\s*\|\s*{BRACE_COMMENT}"),
        ),
    ]
}

fn loose_pattern(keywords: &[String]) -> Option<String> {
    if keywords.is_empty() {
        return None;
    }
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Some(format!(r"{FLAGS}{DURATION}.*?(\w*(?:{alternation})\w*)"))
}

// ONE MATCHED LINE, DURATION STILL IN SOURCE UNITS (MICROSECONDS)
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub pattern: PatternKind,
    pub duration_us: f64,
    pub function_name: String,
}

impl Extraction {
    pub fn duration_ns(&self) -> f64 {
        self.duration_us * NS_PER_US
    }
}

#[derive(Clone, Debug)]
struct LinePattern {
    kind: PatternKind,
    regex: Regex,
}

#[derive(Clone, Debug)]
pub struct PatternCascade {
    patterns: Vec<LinePattern>,
}

impl PatternCascade {
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let mut patterns = Vec::with_capacity(5);
        for (kind, src) in fixed_patterns() {
            patterns.push(LinePattern { kind, regex: Regex::new(&src)? });
        }
        if let Some(src) = loose_pattern(keywords) {
            patterns.push(LinePattern {
                kind: PatternKind::Loose,
                regex: Regex::new(&src)?,
            });
        }
        Ok(Self { patterns })
    }

    pub fn kinds(&self) -> Vec<PatternKind> {
        self.patterns.iter().map(|p| p.kind).collect()
    }

    // FIRST PATTERN WHOSE REGEX MATCHES AND WHOSE DURATION CONVERTS WINS.
    // A DURATION THAT IS NOT FINITE IN NS FALLS THROUGH TO THE NEXT
    // PATTERN, SAME AS A MISS.
    pub fn extract(&self, line: &str) -> Option<Extraction> {
        for p in &self.patterns {
            let caps = match p.regex.captures(line) {
                Some(c) => c,
                None => continue,
            };
            let (dur, name) = match (caps.get(1), caps.get(2)) {
                (Some(d), Some(n)) => (d.as_str(), n.as_str()),
                _ => continue,
            };
            let duration_us = match dur.parse::<f64>() {
                Ok(v) if (v * NS_PER_US).is_finite() && v >= 0.0 => v,
                _ => continue,
            };
            return Some(Extraction {
                pattern: p.kind,
                duration_us,
                function_name: name.to_string(),
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DEFAULT_KEYWORDS;

    fn cascade() -> PatternCascade {
        let kw: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        PatternCascade::new(&kw).unwrap()
    }

    #[test]
    fn cascade_order_is_fixed() {
        assert_eq!(
            cascade().kinds(),
            vec![
                PatternKind::BraceComment,
                PatternKind::InlineCall,
                PatternKind::CpuInlineCall,
                PatternKind::CpuBraceComment,
                PatternKind::Loose,
            ]
        );
    }

    #[test]
    fn brace_comment_with_flag() {
        let e = cascade().extract("| + 19.074 us   |  } /* dequeue_task_fair */").unwrap();
        assert_eq!(e.pattern, PatternKind::BraceComment);
        assert_eq!(e.function_name, "dequeue_task_fair");
        assert_eq!(e.duration_us, 19.074);
        assert_eq!(e.duration_ns(), 19.074 * 1000.0);
    }

    #[test]
    fn inline_call() {
        let e = cascade().extract("|   5.919 us    |  pick_next_task_fair();").unwrap();
        assert_eq!(e.pattern, PatternKind::InlineCall);
        assert_eq!(e.function_name, "pick_next_task_fair");
        assert_eq!(e.duration_us, 5.919);
    }

    #[test]
    fn inline_call_without_semicolon() {
        let e = cascade().extract("|   1.250 us    |  enqueue_task_fair()").unwrap();
        assert_eq!(e.function_name, "enqueue_task_fair");
    }

    #[test]
    fn cpu_prefixed_lines_resolve_by_first_match() {
        // THE UNANCHORED PIPE-PREFIXED FORMS ALSO MATCH CPU-PREFIXED LINES,
        // SO THEY WIN BY PRIORITY. NAME AND DURATION ARE IDENTICAL EITHER WAY.
        let c = cascade();
        let e = c.extract("3)  yat_sim-1117  | + 14.130 us   |  task_tick_yat_casched();").unwrap();
        assert_eq!(e.pattern, PatternKind::InlineCall);
        assert_eq!(e.function_name, "task_tick_yat_casched");
        assert_eq!(e.duration_us, 14.130);

        let e = c.extract("3)    <idle>-0    |   3.397 us    |    } /* update_curr_yat_casched */").unwrap();
        assert_eq!(e.pattern, PatternKind::BraceComment);
        assert_eq!(e.function_name, "update_curr_yat_casched");
        assert_eq!(e.duration_us, 3.397);
    }

    #[test]
    fn all_flag_characters_ignored() {
        let c = cascade();
        for line in [
            "| ! 250.113 us  |  } /* schedule */",
            "| # 1500.000 us |  } /* schedule */",
            "| +!# 7.000 us  |  } /* schedule */",
        ] {
            let e = c.extract(line).unwrap();
            assert_eq!(e.function_name, "schedule");
        }
    }

    #[test]
    fn loose_fallback() {
        // NO PIPE BEFORE THE DURATION: ONLY THE LOOSE PATTERN APPLIES
        let e = cascade().extract("  2.500 us  => select_task_rq_fair+0x10").unwrap();
        assert_eq!(e.pattern, PatternKind::Loose);
        assert_eq!(e.function_name, "select_task_rq_fair");
        assert_eq!(e.duration_us, 2.5);
    }

    #[test]
    fn loose_requires_keyword() {
        assert!(cascade().extract("  2.500 us  => _raw_spin_lock").is_none());
    }

    #[test]
    fn loose_tracks_configured_keywords() {
        let plain = cascade();
        assert!(plain.extract("  4.000 us  -> load_balance").is_none());

        let mut kw: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        kw.push("balance".to_string());
        let widened = PatternCascade::new(&kw).unwrap();
        let e = widened.extract("  4.000 us  -> load_balance").unwrap();
        assert_eq!(e.function_name, "load_balance");
    }

    #[test]
    fn no_keywords_drops_loose_pattern() {
        let c = PatternCascade::new(&[]).unwrap();
        assert_eq!(c.kinds().len(), 4);
        assert!(c.extract("  2.500 us  => select_task_rq_fair").is_none());
    }

    #[test]
    fn malformed_duration_is_no_match() {
        let c = cascade();
        assert!(c.extract("| abc us |  } /* dequeue_task_fair */").is_none());
        assert!(c.extract("| 12 us |  pick_next_task_fair();").is_none());
    }

    #[test]
    fn overflowing_ns_duration_is_no_match() {
        // FINITE IN US, INFINITE ONCE SCALED TO NS
        let huge = format!("{}.0", "9".repeat(306));
        let c = cascade();
        assert!(c.extract(&format!("| {huge} us | dequeue_task_fair();")).is_none());
        assert!(c.extract(&format!("| {huge} us |  }} /* dequeue_task_fair */")).is_none());
        assert!(c.extract(&format!("{huge} us => dequeue_task_fair")).is_none());

        // LARGE VALUES THAT STILL SCALE ARE KEPT
        let e = c.extract("| 1000000.000 us | dequeue_task_fair();").unwrap();
        assert!(e.duration_ns().is_finite());
    }

    #[test]
    fn flagged_line_without_pipe_uses_loose_pattern() {
        let e = cascade().extract("! 150.000 us  => pick_next_task_fair+0x2c").unwrap();
        assert_eq!(e.pattern, PatternKind::Loose);
        assert_eq!(e.function_name, "pick_next_task_fair");
        assert_eq!(e.duration_ns(), 150_000.0);
    }

    #[test]
    fn entry_lines_are_no_match() {
        // FUNCTION ENTRY WITH NO DURATION
        let c = cascade();
        assert!(c.extract("3)               |  schedule() {").is_none());
        assert!(c.extract("").is_none());
        assert!(c.extract("# tracer: function_graph").is_none());
    }
}
