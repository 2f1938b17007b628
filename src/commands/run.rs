use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bfvm::cli_util::print_engine_error;
use bfvm::config;
use bfvm::{CellFormat, InputPolicy, Interpreter, Renderer, StepControl, TerminalDump, Tick};
use clap::Args;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    terminal::{Clear, ClearType},
};
use tracing::{debug, warn};

use super::load_program;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// The program text
    #[arg(short = 'i', long = "instructions", value_name = "CODE")]
    pub instructions: Option<String>,

    /// Read the program from PATH instead of --instructions
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Slow motion: milliseconds to wait after each instruction (fallback BFVM_TICK_MS; implies --visual)
    #[arg(short = 't', long = "tick", value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Redraw the interpreter state after every instruction
    #[arg(long = "visual")]
    pub visual: bool,

    /// Tape cell format in the state dump: hex or dec
    #[arg(long = "cells", value_name = "FORMAT")]
    pub cells: Option<CellFormat>,

    /// Number of tape cells (default 1024)
    #[arg(long = "tape-len", value_name = "N")]
    pub tape_len: Option<usize>,

    /// Read at most N bytes of stdin as program input (default: read to EOF)
    #[arg(long = "input-limit", value_name = "N")]
    pub input_limit: Option<usize>,

    /// Wall-clock timeout in milliseconds (fallback BFVM_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BFVM_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let code = match load_program(
        program,
        args.instructions.as_deref(),
        args.file.as_deref(),
        usage_and_exit,
    ) {
        Ok(code) => code,
        Err(exit_code) => return exit_code,
    };

    // Resolve limits: flags -> env -> settings file -> defaults
    let settings = config::settings();
    let tick_ms = args
        .tick_ms
        .or_else(|| env_u64("BFVM_TICK_MS"))
        .unwrap_or(settings.display.tick_ms);
    let timeout_ms = args
        .timeout_ms
        .or_else(|| env_u64("BFVM_TIMEOUT_MS"))
        .or(settings.run.timeout_ms);
    let max_steps = args
        .max_steps
        .or_else(|| env_u64("BFVM_MAX_STEPS"))
        .or(settings.run.max_steps);
    let tape_len = args.tape_len.unwrap_or(settings.run.tape_len);
    let policy = InputPolicy::from_limit(args.input_limit.or(settings.run.input_limit));

    // Pending input is read once, up front, and only if the program can consume it.
    let input = if code.reads_input() {
        match policy.read_pending(io::stdin().lock()) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{program}: failed reading stdin: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        Vec::new()
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        warn!("failed to set ctrl+c handler: {e}");
    }
    let control = StepControl::new(max_steps, cancel)
        .with_timeout(timeout_ms.map(Duration::from_millis));

    debug!(len = code.len(), tape_len, tick_ms, ?timeout_ms, ?max_steps, "starting run");
    let mut vm = Interpreter::with_tape_len(code.clone(), tape_len).with_input(input);

    let result = if args.visual || tick_ms > 0 {
        let tty = io::stdout().is_terminal();
        let renderer = Renderer {
            window: settings.display.window,
            cells: args.cells.unwrap_or(settings.display.cells),
            styled: tty,
            palette: settings.display.colors.palette(),
            ..Renderer::default()
        };
        let mut dump = TerminalDump::stdout(renderer);
        let mut tick = Tick::from_millis(tick_ms);

        if tty {
            let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0), Hide);
        }
        let result = vm.run_with_control(&mut [&mut dump, &mut tick], &control);
        if tty {
            let _ = execute!(io::stdout(), Show);
        }
        result
    } else {
        vm.run_with_control(&mut [], &control)
    };

    // Output is flushed in bulk, also after an aborted run.
    let output = vm.take_output();
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(&output).and_then(|_| stdout.flush()) {
        eprintln!("{program}: failed writing output: {e}");
        return 1;
    }
    drop(stdout);

    match result {
        Ok(halt) => {
            debug!(?halt, steps = vm.steps(), "run complete");
            0
        }
        Err(err) => {
            print_engine_error(Some(program), code.as_bytes(), &err);
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run --instructions "<code>" [OPTIONS]
  {0} run --file <PATH> [OPTIONS]

Options:
  --instructions, -i <CODE>  Program text
  --file,         -f <PATH>  Read the program from PATH
  --tick,         -t <MS>    Wait MS milliseconds after each instruction (implies --visual)
  --visual                   Redraw tape, pointers, input and output after each instruction
  --cells <hex|dec>          Cell format in the state dump
  --tape-len <N>             Number of tape cells (default 1024)
  --input-limit <N>          Read at most N bytes of stdin as input (default: to EOF)
  --timeout <MS>             Abort after MS milliseconds
  --max-steps <N>            Abort after N instructions
  --help,         -h         Show this help

Notes:
- Input (`,`) consumes stdin read before the run; when it runs out, the program stops quietly.
- Bytes other than ><+-.,[] are comments.
- Moving the data pointer off the tape, or a loop without its partner bracket, is an error.

Examples:
- Print '@':
    {0} run -i "++++++++[>++++++++<-]>."
- Echo stdin in slow motion:
    {0} run -i ",[.,]" --tick 100 < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
