// CASCHED-TRACE OPERATION CLASSIFIER
// PURE-RUST MODULE: MAPS RAW FUNCTION NAMES ONTO SCHEDULER OPERATION GROUPS
//
// EACH FUNCTION LANDS IN AT MOST ONE GROUP: THE FIRST RULE (IN PRIORITY
// ORDER) WHOSE NEEDLE APPEARS IN THE NAME. dequeue IS TESTED BEFORE enqueue,
// SO A NAME CARRYING BOTH IS COUNTED ONCE, AS A DEQUEUE.

use serde::Serialize;

use crate::parser::FunctionBuckets;

// OPERATION GROUPS

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpGroup {
    Dequeue,
    Enqueue,
    PickNext,
    TaskTick,
    SelectTaskRq,
    PutPrev,
    Balance,
    WakeupPreempt,
    UpdateCurr,
}

impl OpGroup {
    // GROUP KEY. ALSO THE SUBSTRING A FUNCTION NAME MUST CONTAIN TO JOIN IT.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dequeue => "dequeue",
            Self::Enqueue => "enqueue",
            Self::PickNext => "pick_next",
            Self::TaskTick => "task_tick",
            Self::SelectTaskRq => "select_task_rq",
            Self::PutPrev => "put_prev",
            Self::Balance => "balance",
            Self::WakeupPreempt => "wakeup_preempt",
            Self::UpdateCurr => "update_curr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dequeue => "Task Dequeue",
            Self::Enqueue => "Task Enqueue",
            Self::PickNext => "Pick Next Task",
            Self::TaskTick => "Task Tick",
            Self::SelectTaskRq => "Select Task RQ",
            Self::PutPrev => "Put Prev Task",
            Self::Balance => "Load Balance",
            Self::WakeupPreempt => "Wakeup Preempt",
            Self::UpdateCurr => "Update Current",
        }
    }
}

// DEFAULT ACTIVE TAXONOMY. LOAD BALANCING AND WAKEUP PREEMPTION ARE
// SWITCHED OFF UNLESS CONFIGURATION ASKS FOR THEM.
pub const DEFAULT_GROUPS: [OpGroup; 7] = [
    OpGroup::Dequeue,
    OpGroup::Enqueue,
    OpGroup::PickNext,
    OpGroup::TaskTick,
    OpGroup::SelectTaskRq,
    OpGroup::PutPrev,
    OpGroup::UpdateCurr,
];

// FULL PRIORITY ORDER, INCLUDING THE OPTIONAL CATEGORIES
const PRIORITY_ORDER: [OpGroup; 9] = [
    OpGroup::Dequeue,
    OpGroup::Enqueue,
    OpGroup::PickNext,
    OpGroup::TaskTick,
    OpGroup::SelectTaskRq,
    OpGroup::PutPrev,
    OpGroup::Balance,
    OpGroup::WakeupPreempt,
    OpGroup::UpdateCurr,
];

// TAXONOMY

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    groups: Vec<OpGroup>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self { groups: DEFAULT_GROUPS.to_vec() }
    }
}

impl Taxonomy {
    // BUILD FROM THE DEFAULT SET PLUS THE OPTIONAL CATEGORIES.
    // RE-ENABLED GROUPS KEEP THEIR SLOT IN THE PRIORITY ORDER.
    pub fn with_optional(load_balance: bool, preemption: bool) -> Self {
        let groups = PRIORITY_ORDER
            .iter()
            .copied()
            .filter(|g| match g {
                OpGroup::Balance => load_balance,
                OpGroup::WakeupPreempt => preemption,
                _ => true,
            })
            .collect();
        Self { groups }
    }

    pub fn groups(&self) -> &[OpGroup] {
        &self.groups
    }

    pub fn contains(&self, group: OpGroup) -> bool {
        self.groups.contains(&group)
    }

    pub fn classify(&self, function_name: &str) -> Option<OpGroup> {
        self.groups
            .iter()
            .copied()
            .find(|g| function_name.contains(g.name()))
    }

    // CONCATENATE EVERY BUCKET INTO ITS GROUP. NAMES MATCHING NO GROUP
    // ARE RECORDED BUT CONTRIBUTE NO SAMPLES.
    pub fn group(&self, buckets: &FunctionBuckets) -> GroupedSamples {
        let mut grouped = GroupedSamples {
            groups: self.groups.iter().map(|g| (*g, Vec::new())).collect(),
            unclassified: Vec::new(),
        };

        for (name, durations) in buckets.iter() {
            match self.classify(name) {
                Some(group) => {
                    if let Some((_, samples)) =
                        grouped.groups.iter_mut().find(|(g, _)| *g == group)
                    {
                        samples.extend_from_slice(durations);
                    }
                }
                None => grouped.unclassified.push(name.to_string()),
            }
        }
        grouped
    }
}

// GROUPED SAMPLES (TAXONOMY ORDER)

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupedSamples {
    groups: Vec<(OpGroup, Vec<f64>)>,
    unclassified: Vec<String>,
}

impl GroupedSamples {
    pub fn iter(&self) -> impl Iterator<Item = (OpGroup, &[f64])> {
        self.groups.iter().map(|(g, s)| (*g, s.as_slice()))
    }

    pub fn samples(&self, group: OpGroup) -> &[f64] {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .map(|(_, s)| s.as_slice())
            .unwrap_or(&[])
    }

    pub fn unclassified(&self) -> &[String] {
        &self.unclassified
    }

    pub fn total_samples(&self) -> usize {
        self.groups.iter().map(|(_, s)| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples() == 0
    }
}
