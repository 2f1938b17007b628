//! Bracket matching by depth-counted linear scan.
//!
//! The engine does not precompute a jump table. When `[` has to skip its body
//! or `]` has to loop back, the partner is found by walking the program from
//! the bracket itself and counting nesting depth. This keeps memory use
//! constant at the cost of an O(program length) walk per jump.

use crate::error::BracketKind;

/// Find the `]` matching the `[` at `open`.
///
/// Depth starts at zero and the bracket at `open` itself is counted, so the
/// first position where depth returns to zero is the partner.
pub fn matching_close(program: &[u8], open: usize) -> Option<usize> {
    let mut depth: usize = 0;
    for (offset, &byte) in program.get(open..)?.iter().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => depth = depth.checked_sub(1)?,
            _ => {}
        }
        if depth == 0 {
            return Some(open + offset);
        }
    }
    None
}

/// Find the `[` matching the `]` at `close`, scanning down to index 0 inclusive.
pub fn matching_open(program: &[u8], close: usize) -> Option<usize> {
    if close >= program.len() {
        return None;
    }
    let mut depth: usize = 0;
    for pos in (0..=close).rev() {
        match program[pos] {
            b']' => depth += 1,
            b'[' => depth = depth.checked_sub(1)?,
            _ => {}
        }
        if depth == 0 {
            return Some(pos);
        }
    }
    None
}

/// Report the first bracket without a partner, if any.
///
/// A stray `]` is reported at its own position; otherwise the innermost `[`
/// left open at the end of the program is reported.
pub fn find_unbalanced(program: &[u8]) -> Option<(usize, BracketKind)> {
    let mut open: Vec<usize> = Vec::new();
    for (i, &byte) in program.iter().enumerate() {
        match byte {
            b'[' => open.push(i),
            b']' => {
                if open.pop().is_none() {
                    return Some((i, BracketKind::Close));
                }
            }
            _ => {}
        }
    }
    open.last().map(|&i| (i, BracketKind::Open))
}
