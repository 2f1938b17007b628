//! Settings file support.
//!
//! Settings live in `bfvm.toml` under the XDG config home (on Linux
//! `~/.config/bfvm.toml`), or wherever `BFVM_CONFIG` points. Every key is
//! optional; command-line flags and environment variables win over the file.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::engine::DEFAULT_TAPE_LEN;
use crate::error::ConfigError;
use crate::render::CellFormat;
use crate::theme::{Palette, parse_color};

pub const CONFIG_ENV: &str = "BFVM_CONFIG";
const FILE_NAME: &str = "bfvm.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub run: RunSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunSettings {
    pub tape_len: usize,
    /// Prefetch ceiling for pending input; absent means read to EOF.
    pub input_limit: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub max_steps: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            tape_len: DEFAULT_TAPE_LEN,
            input_limit: None,
            timeout_ms: None,
            max_steps: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySettings {
    pub tick_ms: u64,
    pub cells: CellFormat,
    pub window: usize,
    pub colors: ColorSettings,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            tick_ms: 0,
            cells: CellFormat::Hex,
            window: 32,
            colors: ColorSettings::default(),
        }
    }
}

/// Color overrides as written in the file: `#RRGGBB` or a color name.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ColorSettings {
    pub pointer: Option<String>,
    pub cells: Option<String>,
    pub trail: Option<String>,
    pub instruction: Option<String>,
}

impl ColorSettings {
    /// Default palette with any valid overrides applied. Unknown color
    /// strings are ignored with a warning.
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();

        macro_rules! set {
            ($field:ident) => {
                if let Some(value) = self.$field.as_deref() {
                    match parse_color(value) {
                        Some(color) => palette.$field = color,
                        None => warn!(key = stringify!($field), value, "ignoring unknown color"),
                    }
                }
            };
        }

        set!(pointer);
        set!(cells);
        set!(trail);
        set!(instruction);

        palette
    }
}

impl Settings {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings = Self::parse(&content, path)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }
}

/// Where the settings file is expected.
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push(FILE_NAME);
    Some(path)
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide settings, loaded on first use. A broken file is reported
/// once and the defaults are used instead.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        let Some(path) = settings_path() else {
            return Settings::default();
        };
        Settings::load_from(&path).unwrap_or_else(|e| {
            warn!("{e}; using default settings");
            Settings::default()
        })
    })
}
