use nu_ansi_term::{Color, Style};

pub mod catppuccin {
    use nu_ansi_term::Color;
    pub struct Mocha;
    impl Mocha {
        pub const TEXT: Color = Color::Rgb(205, 214, 244);
        pub const OVERLAY0: Color = Color::Rgb(108, 112, 134);

        pub const BLUE: Color = Color::Rgb(137, 180, 250);
        pub const PEACH: Color = Color::Rgb(250, 179, 135);
        pub const GREEN: Color = Color::Rgb(166, 227, 161);
    }
}

/// Colors used by the state dump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// The pointer marker under the current cell.
    pub pointer: Color,
    /// Tape cells and the pointer row background.
    pub cells: Color,
    /// Input and output trails.
    pub trail: Color,
    /// The instruction under the instruction pointer.
    pub instruction: Color,
}

impl Default for Palette {
    fn default() -> Self {
        use catppuccin::Mocha;
        Self {
            pointer: Mocha::BLUE,
            cells: Mocha::OVERLAY0,
            trail: Mocha::TEXT,
            instruction: Mocha::PEACH,
        }
    }
}

impl Palette {
    pub fn pointer_style(&self) -> Style {
        Style::new().fg(self.pointer).bold()
    }

    pub fn cells_style(&self) -> Style {
        Style::new().fg(self.cells).bold()
    }

    pub fn trail_style(&self) -> Style {
        Style::new().fg(self.trail)
    }

    pub fn instruction_style(&self) -> Style {
        Style::new().fg(self.instruction).underline()
    }
}

/// Parse `#RRGGBB` or a named ANSI color.
pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    let name = s.to_ascii_lowercase().replace(['_', '-'], "");
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightblue" => Color::LightBlue,
        "lightmagenta" | "lightpurple" => Color::LightPurple,
        "lightcyan" => Color::LightCyan,
        "lightgray" | "lightgrey" => Color::LightGray,
        _ => return None,
    })
}
