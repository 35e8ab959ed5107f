pub mod compare;
pub mod inspect;

use clap::Args;

use casched_trace::FilterConfig;

// TRACE FILE NAMES THE CAPTURE SCRIPTS WRITE
pub const DEFAULT_YAT_TRACE: &str = "yat_scheduler_trace.log";
pub const DEFAULT_CFS_TRACE: &str = "cfs_scheduler_trace.log";

// OPTIONAL FUNCTION FAMILIES, OFF BY DEFAULT
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct FilterArgs {
    // ADMIT AND REPORT LOAD-BALANCING FUNCTIONS (*balance*)
    #[arg(long)]
    pub include_balance: bool,

    // ADMIT WAKEUP FUNCTIONS AND REPORT WAKEUP PREEMPTION (*wakeup_preempt*)
    #[arg(long)]
    pub include_preempt: bool,
}

impl FilterArgs {
    pub fn config(self) -> FilterConfig {
        FilterConfig {
            load_balance: self.include_balance,
            preemption: self.include_preempt,
        }
    }
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
