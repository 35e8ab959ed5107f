// CASCHED-TRACE -- FTRACE COST COMPARISON FOR SCHEDULERS UNDER TEST
// YAT-CASCHED VS CFS, PER SCHEDULER OPERATION
//
// THE LIBRARY DOES THE WORK. THIS BINARY PARSES FLAGS, SETS UP LOGGING,
// AND PRINTS WHAT THE LIBRARY RETURNS.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cli::compare::{run_compare, CompareArgs};
use cli::inspect::{run_inspect, InspectArgs};

#[derive(Parser)]
#[command(name = "casched-trace")]
#[command(about = "CASCHED-TRACE -- YAT-CASCHED VS CFS FTRACE COST COMPARISON")]
struct Cli {
    // -v DEBUG (SAMPLE LINES, FIRST MATCHES), -vv TRACE
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    // PARSE BOTH TRACES AND PRINT THE GROUP COMPARISON
    Compare(CompareArgs),
    // PARSE ONE TRACE AND PRINT PER-FUNCTION DIAGNOSTICS
    Inspect(InspectArgs),
}

fn init_logging(verbose: u8) -> Result<()> {
    let llv = match verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match &cli.command {
        Command::Compare(args) => run_compare(args),
        Command::Inspect(args) => run_inspect(args),
    }
}
