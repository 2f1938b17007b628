//! The tape machine.
//!
//! An [`Interpreter`] owns the program, a fixed-length tape of `u8` cells,
//! the instruction and data pointers, the pending input and the produced
//! output. [`Interpreter::step`] executes exactly one instruction;
//! [`Interpreter::run`] repeats it until the machine halts, calling the
//! registered observers after every step.
//!
//! Behaviors:
//! - Cells wrap modulo 256.
//! - Moving the data pointer off either end of the tape is an error.
//! - `,` with no pending input halts the run cleanly.
//! - Brackets are matched lazily by scanning, see [`crate::brackets`].
//! - Bytes outside `><+-.,[]` are skipped.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::brackets;
use crate::error::{BracketKind, EngineError};
use crate::observer::{Observer, Snapshot};
use crate::program::Program;

/// Tape length used by [`Interpreter::new`].
pub const DEFAULT_TAPE_LEN: usize = 1024;

/// Why a run stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// The instruction pointer moved past the last instruction.
    Completed,
    /// A `,` found no pending input left.
    InputExhausted,
}

/// Result of a single [`Interpreter::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction was executed and the machine can continue.
    Continued,
    /// The machine is terminal; nothing was executed.
    Halted(Halt),
}

/// Controls for cooperative cancellation, step limiting and timeouts.
#[derive(Clone, Debug, Default)]
pub struct StepControl {
    pub max_steps: Option<u64>,
    pub timeout: Option<Duration>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<u64>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self {
            max_steps,
            timeout: None,
            cancel_flag,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct Interpreter {
    program: Program,
    tape: Box<[u8]>,
    ip: usize,
    dp: usize,
    input: Vec<u8>,
    input_pos: usize,
    output: Vec<u8>,
    steps: u64,
    input_exhausted: bool,
}

impl Interpreter {
    /// Create an interpreter with a zeroed tape of [`DEFAULT_TAPE_LEN`] cells.
    pub fn new(program: impl Into<Program>) -> Self {
        Self::with_tape_len(program, DEFAULT_TAPE_LEN)
    }

    /// Create an interpreter with a custom (fixed) tape length.
    ///
    /// A zero length is bumped to one cell so the data pointer always
    /// addresses a real cell.
    pub fn with_tape_len(program: impl Into<Program>, tape_len: usize) -> Self {
        Self {
            program: program.into(),
            tape: vec![0; tape_len.max(1)].into_boxed_slice(),
            ip: 0,
            dp: 0,
            input: Vec::new(),
            input_pos: 0,
            output: Vec::new(),
            steps: 0,
            input_exhausted: false,
        }
    }

    /// Supply the bytes that `,` will consume, front first.
    pub fn with_input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = input.into();
        self.input_pos = 0;
        self
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn dp(&self) -> usize {
        self.dp
    }

    pub fn tape(&self) -> &[u8] {
        &self.tape
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Hand the produced output to the caller, leaving the buffer empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn remaining_input(&self) -> &[u8] {
        &self.input[self.input_pos..]
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The halt reason if the machine is terminal.
    pub fn halt_reason(&self) -> Option<Halt> {
        if self.input_exhausted {
            Some(Halt::InputExhausted)
        } else if self.ip >= self.program.len() {
            Some(Halt::Completed)
        } else {
            None
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halt_reason().is_some()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            ip: self.ip,
            dp: self.dp,
            program: self.program.as_bytes(),
            tape: &self.tape,
            input: self.remaining_input(),
            output: &self.output,
            steps: self.steps,
        }
    }

    /// Execute exactly one instruction.
    ///
    /// On error the machine is left as it was before the instruction.
    pub fn step(&mut self) -> Result<Step, EngineError> {
        if let Some(halt) = self.halt_reason() {
            return Ok(Step::Halted(halt));
        }

        let ip = self.ip;
        let op = self.program.as_bytes()[ip];
        trace!(ip, dp = self.dp, op = %(op as char), "step");

        let mut next_ip = ip + 1;
        match op {
            b'>' => {
                if self.dp + 1 >= self.tape.len() {
                    return Err(EngineError::DataPointerOutOfRange {
                        ip,
                        ptr: self.dp as isize + 1,
                        op: '>',
                    });
                }
                self.dp += 1;
            }
            b'<' => {
                if self.dp == 0 {
                    return Err(EngineError::DataPointerOutOfRange {
                        ip,
                        ptr: -1,
                        op: '<',
                    });
                }
                self.dp -= 1;
            }
            b'+' => {
                self.tape[self.dp] = self.tape[self.dp].wrapping_add(1);
            }
            b'-' => {
                self.tape[self.dp] = self.tape[self.dp].wrapping_sub(1);
            }
            b'.' => {
                self.output.push(self.tape[self.dp]);
            }
            b',' => {
                let Some(&byte) = self.input.get(self.input_pos) else {
                    debug!(ip, "input exhausted; halting");
                    self.input_exhausted = true;
                    return Ok(Step::Halted(Halt::InputExhausted));
                };
                self.input_pos += 1;
                self.tape[self.dp] = byte;
            }
            b'[' => {
                if self.tape[self.dp] == 0 {
                    let close = brackets::matching_close(self.program.as_bytes(), ip).ok_or(
                        EngineError::UnbalancedBracket {
                            ip,
                            kind: BracketKind::Open,
                        },
                    )?;
                    debug!(from = ip, to = close + 1, "cell is 0; skip loop");
                    next_ip = close + 1;
                }
            }
            b']' => {
                if self.tape[self.dp] != 0 {
                    let open = brackets::matching_open(self.program.as_bytes(), ip).ok_or(
                        EngineError::UnbalancedBracket {
                            ip,
                            kind: BracketKind::Close,
                        },
                    )?;
                    trace!(from = ip, to = open + 1, "cell != 0; loop back");
                    next_ip = open + 1;
                }
            }
            _ => {}
        }

        self.ip = next_ip;
        self.steps += 1;
        Ok(Step::Continued)
    }

    /// Run to completion, calling every observer after each step.
    pub fn run(&mut self, observers: &mut [&mut dyn Observer]) -> Result<Halt, EngineError> {
        self.execute(observers, None)
    }

    /// Run with cooperative cancellation, an optional step limit and an
    /// optional wall-clock timeout.
    pub fn run_with_control(
        &mut self,
        observers: &mut [&mut dyn Observer],
        control: &StepControl,
    ) -> Result<Halt, EngineError> {
        self.execute(observers, Some(control))
    }

    fn execute(
        &mut self,
        observers: &mut [&mut dyn Observer],
        control: Option<&StepControl>,
    ) -> Result<Halt, EngineError> {
        let started = Instant::now();
        let mut executed: u64 = 0;

        loop {
            if let Some(halt) = self.halt_reason() {
                debug!(?halt, steps = self.steps, "run finished");
                return Ok(halt);
            }

            if let Some(ctrl) = control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(EngineError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if executed >= max {
                        return Err(EngineError::StepLimitExceeded { limit: max });
                    }
                }
                if let Some(timeout) = ctrl.timeout {
                    if started.elapsed() >= timeout {
                        return Err(EngineError::DeadlineExceeded {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                }
            }

            match self.step()? {
                Step::Continued => {
                    executed += 1;
                    let snapshot = self.snapshot();
                    for observer in observers.iter_mut() {
                        observer.after_step(&snapshot);
                    }
                }
                Step::Halted(halt) => {
                    debug!(?halt, steps = self.steps, "run finished");
                    return Ok(halt);
                }
            }
        }
    }
}
