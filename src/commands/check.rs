use std::io::{self, Write};
use std::path::PathBuf;

use bfvm::brackets::find_unbalanced;
use bfvm::cli_util::with_context;
use clap::Args;

use super::load_program;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct CheckArgs {
    /// The program text
    #[arg(short = 'i', long = "instructions", value_name = "CODE")]
    pub instructions: Option<String>,

    /// Read the program from PATH instead of --instructions
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: CheckArgs) -> i32 {
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

    match find_unbalanced(code.as_bytes()) {
        None => {
            println!("ok ({} instructions)", code.instruction_count());
            let _ = io::stdout().flush();
            0
        }
        Some((ip, kind)) => {
            let msg = format!("{program}: unbalanced bracket {kind}");
            eprint!("{}", with_context(&msg, code.as_bytes(), ip));
            let _ = io::stderr().flush();
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} check --instructions "<code>"
  {0} check --file <PATH>

Options:
  --instructions, -i <CODE>  Program text
  --file,         -f <PATH>  Read the program from PATH
  --help,         -h         Show this help

Description:
  Verifies that every '[' has a matching ']' without running the program.
  At run time brackets are only matched when a jump happens, so an
  unbalanced bracket on a path that is never taken goes unnoticed.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
