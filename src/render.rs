//! Text rendering of interpreter state for the slow-motion dump.
//!
//! The layout is cosmetic. A frame is five labelled lines:
//!
//! ```text
//! input   | bc
//! program | [>++<-]>.
//! tape@0  | 00 05 00 00
//!         | __ ^^ __ __
//! output  | A
//! ```

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{self, Clear, ClearType},
};
use serde::Deserialize;
use tracing::warn;

use crate::observer::{Observer, Snapshot};
use crate::theme::Palette;

const LABEL_WIDTH: usize = 10;
const DEFAULT_WIDTH: usize = 80;

/// How tape cells are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Two lowercase hex digits per cell.
    #[default]
    Hex,
    /// Right-aligned decimal, three columns per cell.
    Dec,
}

impl CellFormat {
    fn digits(self) -> usize {
        match self {
            CellFormat::Hex => 2,
            CellFormat::Dec => 3,
        }
    }

    fn format(self, value: u8) -> String {
        match self {
            CellFormat::Hex => format!("{value:02x}"),
            CellFormat::Dec => format!("{value:>3}"),
        }
    }
}

impl std::str::FromStr for CellFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" | "x" => Ok(CellFormat::Hex),
            "dec" | "decimal" | "d" => Ok(CellFormat::Dec),
            other => Err(format!("unknown cell format '{other}' (expected hex or dec)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    /// Total columns available for a line.
    pub width: usize,
    /// Number of tape cells shown; the window is page-aligned around the data pointer.
    pub window: usize,
    pub cells: CellFormat,
    /// Wrap segments in ANSI styles.
    pub styled: bool,
    pub palette: Palette,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            window: 32,
            cells: CellFormat::Hex,
            styled: false,
            palette: Palette::default(),
        }
    }
}

impl Renderer {
    pub fn render(&self, snapshot: &Snapshot<'_>) -> String {
        let room = self.width.saturating_sub(LABEL_WIDTH).max(1);
        let mut frame = String::new();

        let input: String = snapshot.input.escape_ascii().to_string();
        let input = clip_head(&input, room);
        let _ = writeln!(frame, "{}{}", label("input"), self.trail(&input));

        let _ = writeln!(frame, "{}{}", label("program"), self.ticker(snapshot, room));

        let (base, cells, pointer) = self.tape_rows(snapshot, room);
        let _ = writeln!(frame, "{}{}", label(&format!("tape@{base}")), cells);
        let _ = writeln!(frame, "{}{}", label(""), pointer);

        let output: String = snapshot.output.escape_ascii().to_string();
        let output = clip_tail(&output, room);
        let _ = writeln!(frame, "{}{}", label("output"), self.trail(&output));

        frame
    }

    fn trail(&self, text: &str) -> String {
        if self.styled && !text.is_empty() {
            self.palette.trail_style().paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// The program from the instruction pointer onward, clipped to `room`.
    fn ticker(&self, snapshot: &Snapshot<'_>, room: usize) -> String {
        let rest = snapshot.program.get(snapshot.ip..).unwrap_or_default();
        let mut chars = rest.iter().take(room).map(|&b| printable(b));
        let Some(first) = chars.next() else {
            return String::new();
        };
        let tail: String = chars.collect();
        if self.styled {
            format!(
                "{}{}",
                self.palette.instruction_style().paint(first.to_string()),
                tail
            )
        } else {
            format!("{first}{tail}")
        }
    }

    /// The window base, the cell row and the pointer row beneath it.
    fn tape_rows(&self, snapshot: &Snapshot<'_>, room: usize) -> (usize, String, String) {
        let stride = self.cells.digits() + 1;
        let fit = (room / stride).max(1);
        let window = self.window.max(1).min(fit);
        let base = snapshot.dp - snapshot.dp % window;
        let end = (base + window).min(snapshot.tape.len());

        let cells: Vec<String> = snapshot.tape[base..end]
            .iter()
            .map(|&v| self.cells.format(v))
            .collect();
        let cells = cells.join(" ");

        let background = "_".repeat(self.cells.digits());
        let marker = "^".repeat(self.cells.digits());
        let offset = snapshot.dp - base;

        let mut before = String::new();
        let mut after = String::new();
        for i in 0..(end - base) {
            if i < offset {
                before.push_str(&background);
                before.push(' ');
            } else if i > offset {
                after.push(' ');
                after.push_str(&background);
            }
        }

        if self.styled {
            let bg = self.palette.cells_style();
            let pointer = format!(
                "{}{}{}",
                bg.paint(before),
                self.palette.pointer_style().paint(marker),
                bg.paint(after)
            );
            (base, bg.paint(cells).to_string(), pointer)
        } else {
            (base, cells, format!("{before}{marker}{after}"))
        }
    }
}

fn label(name: &str) -> String {
    format!("{:<width$}| ", name, width = LABEL_WIDTH - 2)
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

fn clip_head(text: &str, room: usize) -> String {
    text.chars().take(room).collect()
}

fn clip_tail(text: &str, room: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(room)).collect()
}

/// Redraws the rendered state at a fixed terminal row after every step.
pub struct TerminalDump<W: Write> {
    out: W,
    renderer: Renderer,
    row: u16,
    failed: bool,
}

impl<W: Write> TerminalDump<W> {
    pub fn new(out: W, renderer: Renderer, row: u16) -> Self {
        Self {
            out,
            renderer,
            row,
            failed: false,
        }
    }

    fn draw(&mut self, snapshot: &Snapshot<'_>) -> io::Result<()> {
        let frame = self.renderer.render(snapshot);
        queue!(self.out, MoveTo(0, self.row), Clear(ClearType::FromCursorDown))?;
        for line in frame.lines() {
            write!(self.out, "{line}\r\n")?;
        }
        self.out.flush()
    }
}

impl TerminalDump<io::Stdout> {
    /// Dump to stdout, sizing the renderer to the terminal width when stdout
    /// is a terminal.
    pub fn stdout(mut renderer: Renderer) -> Self {
        if io::stdout().is_terminal() {
            if let Ok((cols, _rows)) = terminal::size() {
                if cols as usize > LABEL_WIDTH {
                    renderer.width = cols as usize;
                }
            }
        }
        Self::new(io::stdout(), renderer, 0)
    }
}

impl<W: Write> Observer for TerminalDump<W> {
    fn after_step(&mut self, snapshot: &Snapshot<'_>) {
        if self.failed {
            return;
        }
        if let Err(e) = self.draw(snapshot) {
            // Rendering never affects the run; give up drawing after the first failure.
            warn!("state dump disabled: {e}");
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot<'a>(tape: &'a [u8], dp: usize) -> Snapshot<'a> {
        Snapshot {
            ip: 2,
            dp,
            program: b",[.,]",
            tape,
            input: b"bc",
            output: b"A\n",
            steps: 3,
        }
    }

    fn plain(window: usize, cells: CellFormat) -> Renderer {
        Renderer {
            window,
            cells,
            ..Renderer::default()
        }
    }

    #[test]
    fn hex_frame_layout() {
        let tape = [0u8, 5, 255, 16];
        let frame = plain(4, CellFormat::Hex).render(&snapshot(&tape, 1));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[0], "input   | bc");
        assert_eq!(lines[1], "program | .,]");
        assert_eq!(lines[2], "tape@0  | 00 05 ff 10");
        assert_eq!(lines[3], "        | __ ^^ __ __");
        assert_eq!(lines[4], "output  | A\\n");
    }

    #[test]
    fn decimal_cells_are_right_aligned() {
        let tape = [7u8, 255];
        let frame = plain(2, CellFormat::Dec).render(&snapshot(&tape, 0));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[2], "tape@0  |   7 255");
        assert_eq!(lines[3], "        | ^^^ ___");
    }

    #[test]
    fn window_is_page_aligned_around_pointer() {
        let mut tape = [0u8; 12];
        tape[9] = 1;
        let frame = plain(4, CellFormat::Hex).render(&snapshot(&tape, 9));
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[2], "tape@8  | 00 01 00 00");
        assert_eq!(lines[3], "        | __ ^^ __ __");
    }

    #[test]
    fn finished_program_renders_empty_ticker() {
        let tape = [0u8; 4];
        let mut snap = snapshot(&tape, 0);
        snap.ip = snap.program.len();
        let frame = plain(4, CellFormat::Hex).render(&snap);
        assert_eq!(frame.lines().nth(1), Some("program | "));
    }

    #[test]
    fn styled_frame_contains_ansi_sequences() {
        let tape = [0u8; 4];
        let renderer = Renderer {
            styled: true,
            window: 4,
            ..Renderer::default()
        };
        let frame = renderer.render(&snapshot(&tape, 0));
        assert!(frame.contains("\u{1b}["));
    }

    #[test]
    fn dump_writes_frame_to_sink() {
        let tape = [0u8; 4];
        let mut dump = TerminalDump::new(Vec::new(), plain(4, CellFormat::Hex), 0);
        dump.after_step(&snapshot(&tape, 0));
        let written = String::from_utf8_lossy(&dump.out).to_string();
        assert!(written.contains("tape@0  | 00 00 00 00\r\n"));
    }

    #[test]
    fn parses_cell_format_names() {
        assert_eq!("HEX".parse::<CellFormat>(), Ok(CellFormat::Hex));
        assert_eq!("dec".parse::<CellFormat>(), Ok(CellFormat::Dec));
        assert!("oct".parse::<CellFormat>().is_err());
    }
}
