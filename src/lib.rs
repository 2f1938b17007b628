//! A tiny tape machine for the eight-instruction Brainfuck language.
//!
//! The interpreter runs over a fixed-length tape (1024 cells by default) with
//! a single data pointer.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap modulo 256.
//! - Strict pointer bounds: moving left from cell 0 or right past the end
//!   returns an error.
//! - Input `,` consumes one byte of pending input supplied up front; when
//!   none is left the run stops quietly.
//! - Output `.` appends the current cell to the produced output.
//! - Loops `[]` are matched by scanning with a depth counter; a scan that
//!   runs off the program is reported as an error.
//! - Any byte outside `><+-.,[]` is a comment and is skipped.
//! - Observers can watch every step (slow motion, state dumps).
//!
//! Quick start:
//!
//! ```
//! use bfvm::Interpreter;
//!
//! let mut vm = Interpreter::new("++++++++[>++++++++<-]>.");
//! vm.run(&mut []).expect("program should run");
//! assert_eq!(vm.output(), &[64]);
//! ```

pub mod brackets;
pub mod cli_util;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod observer;
pub mod program;
pub mod render;
pub mod theme;

pub use engine::{DEFAULT_TAPE_LEN, Halt, Interpreter, Step, StepControl};
pub use error::{BracketKind, ConfigError, EngineError, ProgramSourceError};
pub use input::InputPolicy;
pub use observer::{Observer, Snapshot, Tick};
pub use program::Program;
pub use render::{CellFormat, Renderer, TerminalDump};
