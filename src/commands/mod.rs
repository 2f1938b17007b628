pub mod check;
pub mod run;

use std::io::{self, Write};
use std::path::Path;

use bfvm::{Program, ProgramSourceError};

/// Load the program for a subcommand, mapping failures to exit codes:
/// missing or conflicting sources print usage (2), unreadable files exit 1.
pub fn load_program(
    program: &str,
    instructions: Option<&str>,
    file: Option<&Path>,
    usage_and_exit: fn(&str, i32) -> !,
) -> Result<Program, i32> {
    match Program::from_source(instructions, file) {
        Ok(code) => Ok(code),
        Err(e @ (ProgramSourceError::Missing | ProgramSourceError::Conflicting)) => {
            eprintln!("{program}: {e}");
            usage_and_exit(program, 2);
        }
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            Err(1)
        }
    }
}
