use std::fmt;
use std::path::PathBuf;

/// Errors that stop the engine mid-run.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The data pointer attempted to move left of cell 0 or beyond the last cell.
    #[error("Data pointer out of range at instruction {ip} (ptr={ptr}, op='{op}')")]
    DataPointerOutOfRange { ip: usize, ptr: isize, op: char },

    /// A bracket scan ran off the program without finding its partner.
    #[error("Unbalanced bracket {kind} at instruction {ip}")]
    UnbalancedBracket { ip: usize, kind: BracketKind },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    /// Execution aborted because the wall-clock deadline passed.
    #[error("Execution aborted: wall-clock timeout exceeded ({timeout_ms} ms)")]
    DeadlineExceeded { timeout_ms: u64 },

    /// Execution aborted due to cooperative cancellation (e.g., Ctrl+C)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which side of the loop was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// The program text could not be obtained; the engine never starts.
#[derive(Debug, thiserror::Error)]
pub enum ProgramSourceError {
    #[error("no program supplied: pass instructions or a program file")]
    Missing,

    #[error("cannot use literal instructions together with a program file")]
    Conflicting,

    #[error("failed to read program file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The settings file exists but could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
