//! Immutable run settings and the command line that builds them.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use unicode_width::UnicodeWidthChar;

use crate::error::{Error, Result};
use crate::generator::GeneratorSettings;
use crate::visibility::FogSettings;

const DEFAULT_FOG_RADIUS: usize = 5;
const DEFAULT_COUNTDOWN_MS: u64 = 1000;
const MIN_SIDE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Standard `(rows, cols)` for the difficulty.
    pub fn size(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (15, 30),
            Difficulty::Medium => (20, 45),
            Difficulty::Hard => (25, 60),
        }
    }

    pub fn portal_pairs(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skin {
    pub player: char,
    pub wall: char,
}

impl Skin {
    /// Icons must be visible and exactly one terminal column wide.
    pub fn new(player: char, wall: char) -> Result<Self> {
        for icon in [player, wall] {
            if icon.is_whitespace() || icon.width() != Some(1) {
                return Err(Error::InvalidIcon(icon));
            }
        }
        Ok(Self { player, wall })
    }
}

impl Default for Skin {
    fn default() -> Self {
        Self {
            player: 'P',
            wall: '#',
        }
    }
}

/// Everything a run needs, fixed at call time. Menu toggles build a new
/// value through the `with_*` helpers.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Overrides [`Difficulty::size`] for every difficulty when set.
    pub size: Option<(usize, usize)>,
    pub seed: Option<u64>,
    pub skin: Skin,
    pub sound: bool,
    pub fog: FogSettings,
    pub generator: GeneratorSettings,
    pub countdown_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            size: None,
            seed: None,
            skin: Skin::default(),
            sound: true,
            fog: FogSettings {
                enabled: true,
                base_radius: DEFAULT_FOG_RADIUS,
            },
            generator: GeneratorSettings::default(),
            countdown_ms: DEFAULT_COUNTDOWN_MS,
        }
    }
}

impl Settings {
    pub fn size_for(&self, difficulty: Difficulty) -> (usize, usize) {
        self.size.unwrap_or_else(|| difficulty.size())
    }

    pub fn with_sound(&self, sound: bool) -> Self {
        Self {
            sound,
            ..self.clone()
        }
    }

    pub fn with_fog(&self, enabled: bool) -> Self {
        Self {
            fog: FogSettings {
                enabled,
                ..self.fog
            },
            ..self.clone()
        }
    }

    pub fn with_skin(&self, skin: Skin) -> Self {
        Self {
            skin,
            ..self.clone()
        }
    }
}

/// Escape the maze: a turn-based terminal maze game
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Difficulty preselected in the menu
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    pub difficulty: Difficulty,

    /// Maze height, overrides the difficulty table (needs --cols)
    #[arg(long, requires = "cols")]
    pub rows: Option<usize>,

    /// Maze width, overrides the difficulty table (needs --rows)
    #[arg(long, requires = "rows")]
    pub cols: Option<usize>,

    /// Random seed for reproducible mazes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with fog of war disabled
    #[arg(long)]
    pub no_fog: bool,

    /// Minimum fog visibility radius
    #[arg(long, default_value_t = DEFAULT_FOG_RADIUS)]
    pub fog_radius: usize,

    /// Start with sound disabled
    #[arg(long)]
    pub mute: bool,

    /// Player icon
    #[arg(long, default_value_t = 'P')]
    pub player_icon: char,

    /// Wall icon
    #[arg(long, default_value_t = '#')]
    pub wall_icon: char,

    /// Percentage of bottleneck walls opened on Medium
    #[arg(long, default_value_t = GeneratorSettings::default().shortcut_percent)]
    pub shortcut_percent: usize,

    /// Score log path (defaults to the data directory)
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Log file path (defaults to the data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    pub fn into_settings(self) -> Result<Settings> {
        let size = match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => {
                if rows < MIN_SIDE || cols < MIN_SIDE {
                    return Err(Error::InvalidSize { rows, cols });
                }
                Some((rows, cols))
            }
            _ => None,
        };
        Ok(Settings {
            difficulty: self.difficulty,
            size,
            seed: self.seed,
            skin: Skin::new(self.player_icon, self.wall_icon)?,
            sound: !self.mute,
            fog: FogSettings {
                enabled: !self.no_fog,
                base_radius: self.fog_radius,
            },
            generator: GeneratorSettings {
                shortcut_percent: self.shortcut_percent,
                ..GeneratorSettings::default()
            },
            countdown_ms: read_countdown_ms(),
        })
    }
}

fn read_countdown_ms() -> u64 {
    std::env::var("MAZE_COUNTDOWN_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_COUNTDOWN_MS)
}
