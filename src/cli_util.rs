use std::io::{self, Write};

use crate::EngineError;

/// Show this many program bytes on each side of the caret.
const WINDOW_BYTES: usize = 32;

/// Format an engine error with the instruction index and, where the error
/// points at an instruction, a caret under it.
pub fn format_engine_error(program: Option<&str>, code: &[u8], err: &EngineError) -> String {
    let prefix = |msg: &str| match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg.to_string(),
    };

    match err {
        EngineError::DataPointerOutOfRange { ip, ptr, op } => {
            let msg = prefix(&format!(
                "Runtime error: data pointer out of range (ptr={ptr}, op={op})"
            ));
            with_context(&msg, code, *ip)
        }
        EngineError::UnbalancedBracket { ip, kind } => {
            let msg = prefix(&format!("Runtime error: unbalanced bracket {kind}"));
            with_context(&msg, code, *ip)
        }
        EngineError::StepLimitExceeded { .. }
        | EngineError::DeadlineExceeded { .. }
        | EngineError::Canceled => format!("{err}\n"),
    }
}

/// Print [`format_engine_error`] to stderr.
pub fn print_engine_error(program: Option<&str>, code: &[u8], err: &EngineError) {
    eprint!("{}", format_engine_error(program, code, err));
    let _ = io::stderr().flush();
}

/// A message, the program around `pos`, and a caret under `pos`.
pub fn with_context(prefix: &str, code: &[u8], pos: usize) -> String {
    let start = pos.saturating_sub(WINDOW_BYTES);
    let end = (pos + WINDOW_BYTES + 1).min(code.len());
    let slice: String = code
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { ' ' })
        .collect();

    let caret = format!("{}^", " ".repeat(pos.saturating_sub(start)));
    format!("{prefix} at instruction {pos}\n  {slice}\n  {caret}\n")
}
