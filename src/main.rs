mod commands;

use std::env;
use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::check::CheckArgs;
use commands::run::RunArgs;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run   -i "<code>" [OPTIONS]   # Run a program given on the command line
  {0} run   -f <PATH>   [OPTIONS]   # Run a program loaded from a file
  {0} check -i "<code>" | -f <PATH> # Check that brackets are balanced

Environment:
  BFVM_LOG         Log filter (e.g. "debug", "bfvm=trace"); logs go to stderr
  BFVM_CONFIG      Settings file to use instead of $XDG_CONFIG_HOME/bfvm.toml
  BFVM_TICK_MS     Default slow-motion delay
  BFVM_TIMEOUT_MS  Default wall-clock timeout
  BFVM_MAX_STEPS   Default step limit

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfvm", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Check(CheckArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BFVM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfvm"));

    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };
    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match command {
        Command::Run(args) => commands::run::run(&program, args),
        Command::Check(args) => commands::check::run(&program, args),
    };

    std::process::exit(code);
}
