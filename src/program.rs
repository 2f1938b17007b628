use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ProgramSourceError;

/// The eight meaningful instruction bytes. Everything else is a no-op.
pub const INSTRUCTIONS: [u8; 8] = [b'>', b'<', b'+', b'-', b'.', b',', b'[', b']'];

/// Immutable program text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    code: Vec<u8>,
}

impl Program {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self { code: code.into() }
    }

    /// Load program text from exactly one of a literal or a file.
    ///
    /// An empty literal counts as absent, so `-i ""` with no file is a
    /// missing program rather than an empty one. An empty file is a valid,
    /// empty program.
    pub fn from_source(
        literal: Option<&str>,
        file: Option<&Path>,
    ) -> Result<Self, ProgramSourceError> {
        let literal = literal.filter(|s| !s.is_empty());
        match (literal, file) {
            (Some(_), Some(_)) => Err(ProgramSourceError::Conflicting),
            (Some(code), None) => Ok(Self::new(code.as_bytes())),
            (None, Some(path)) => {
                let code = fs::read(path).map_err(|source| ProgramSourceError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!(path = %path.display(), len = code.len(), "loaded program file");
                Ok(Self::new(code))
            }
            (None, None) => Err(ProgramSourceError::Missing),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Whether any `,` appears, i.e. whether pending input is worth reading.
    pub fn reads_input(&self) -> bool {
        self.code.contains(&b',')
    }

    /// Number of bytes that are actual instructions.
    pub fn instruction_count(&self) -> usize {
        self.code.iter().filter(|b| INSTRUCTIONS.contains(b)).count()
    }
}

impl From<&str> for Program {
    fn from(code: &str) -> Self {
        Self::new(code.as_bytes())
    }
}

impl From<Vec<u8>> for Program {
    fn from(code: Vec<u8>) -> Self {
        Self::new(code)
    }
}
