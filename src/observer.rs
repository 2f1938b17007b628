//! Post-step hooks.
//!
//! [`Interpreter::run`](crate::Interpreter::run) takes an ordered list of
//! observers and calls each of them once after every executed instruction,
//! in registration order, before the next instruction runs. Observers get a
//! read-only [`Snapshot`]; they can render, sleep or record, but never touch
//! the engine.

use std::thread;
use std::time::Duration;

/// Read-only view of the interpreter after a step.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Index of the next instruction to execute.
    pub ip: usize,
    /// Index of the current tape cell.
    pub dp: usize,
    pub program: &'a [u8],
    pub tape: &'a [u8],
    /// Pending input not yet consumed by `,`.
    pub input: &'a [u8],
    /// Everything `.` has produced so far.
    pub output: &'a [u8],
    /// Number of instructions executed.
    pub steps: u64,
}

impl Snapshot<'_> {
    /// Value of the cell under the data pointer.
    pub fn current_cell(&self) -> u8 {
        self.tape[self.dp]
    }
}

/// A callback invoked after every step.
pub trait Observer {
    fn after_step(&mut self, snapshot: &Snapshot<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Snapshot<'_>),
{
    fn after_step(&mut self, snapshot: &Snapshot<'_>) {
        self(snapshot)
    }
}

/// Sleeps a fixed duration after every step (slow-motion playback).
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    delay: Duration,
}

impl Tick {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Observer for Tick {
    fn after_step(&mut self, _snapshot: &Snapshot<'_>) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
