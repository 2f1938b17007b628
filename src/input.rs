//! Pending input, read once before the run starts.

use std::io::{self, Read};

use tracing::debug;

/// How much of the input stream the program gets to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPolicy {
    /// Read everything up to EOF.
    #[default]
    Unbounded,
    /// Read at most this many bytes; anything after the ceiling is invisible
    /// to the program.
    Prefetch(usize),
}

impl InputPolicy {
    pub fn from_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(n) => InputPolicy::Prefetch(n),
            None => InputPolicy::Unbounded,
        }
    }

    /// Drain `reader` according to the policy.
    pub fn read_pending<R: Read>(self, reader: R) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            InputPolicy::Unbounded => {
                let mut reader = reader;
                reader.read_to_end(&mut buf)?;
            }
            InputPolicy::Prefetch(limit) => {
                reader.take(limit as u64).read_to_end(&mut buf)?;
            }
        }
        debug!(policy = ?self, len = buf.len(), "read pending input");
        Ok(buf)
    }
}
