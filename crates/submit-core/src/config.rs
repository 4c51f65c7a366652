use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::color::Color;
use crate::timing::{Curve, TimingProfile};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub button: ButtonConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Initial look of the button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Label shown while idle
    #[serde(default = "default_title")]
    pub title: String,
    /// Width in points
    #[serde(default = "default_width")]
    pub width: f64,
    /// Height in points
    #[serde(default = "default_height")]
    pub height: f64,
    /// Corner radius in points while idle
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    /// Spinner stroke color
    #[serde(default = "default_spinner_color")]
    pub spinner_color: Color,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            corner_radius: default_corner_radius(),
            spinner_color: default_spinner_color(),
        }
    }
}

/// Duration and curve overrides for the timing table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_shrink_ms")]
    pub shrink_ms: u64,
    #[serde(default = "default_shrink_curve")]
    pub shrink_curve: Curve,
    #[serde(default = "default_expand_ms")]
    pub expand_ms: u64,
    #[serde(default = "default_expand_curve")]
    pub expand_curve: Curve,
    #[serde(default = "default_corner_radius_ms")]
    pub corner_radius_ms: u64,
    #[serde(default = "default_corner_radius_curve")]
    pub corner_radius_curve: Curve,
    /// Duration of one spinner revolution
    #[serde(default = "default_spin_ms")]
    pub spin_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            shrink_ms: default_shrink_ms(),
            shrink_curve: default_shrink_curve(),
            expand_ms: default_expand_ms(),
            expand_curve: default_expand_curve(),
            corner_radius_ms: default_corner_radius_ms(),
            corner_radius_curve: default_corner_radius_curve(),
            spin_ms: default_spin_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Horizontal points drawn per terminal cell (rows use twice as many)
    #[serde(default = "default_points_per_cell")]
    pub points_per_cell: f64,
    /// Surface color behind the button
    #[serde(default = "default_background")]
    pub background: Color,
    /// Button fill and success flood color
    #[serde(default = "default_accent")]
    pub accent: Color,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            points_per_cell: default_points_per_cell(),
            background: default_background(),
            accent: default_accent(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("submit-transition")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_title() -> String {
    "Submit".to_string()
}

fn default_width() -> f64 {
    200.0
}

fn default_height() -> f64 {
    44.0
}

fn default_corner_radius() -> f64 {
    4.0
}

fn default_spinner_color() -> Color {
    Color::WHITE
}

fn default_shrink_ms() -> u64 {
    100
}

fn default_shrink_curve() -> Curve {
    TimingProfile::SHRINK_CURVE
}

fn default_expand_ms() -> u64 {
    300
}

fn default_expand_curve() -> Curve {
    TimingProfile::EXPAND_CURVE
}

fn default_corner_radius_ms() -> u64 {
    100
}

fn default_corner_radius_curve() -> Curve {
    TimingProfile::CORNER_RADIUS_CURVE
}

fn default_spin_ms() -> u64 {
    400
}

fn default_tick_rate() -> u64 {
    16 // ~60fps while animating
}

fn default_points_per_cell() -> f64 {
    4.0
}

fn default_background() -> Color {
    Color::rgb(0x28, 0x28, 0x28)
}

fn default_accent() -> Color {
    Color::rgb(0x89, 0xb4, 0x82)
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults if it does not exist
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Render configuration as TOML text
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/submit-transition/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("submit-transition")
            .join("config.toml")
    }

    /// Get the log file directory
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Timing table described by the `[timing]` section
    pub fn timing_profile(&self) -> TimingProfile {
        TimingProfile::from_config(&self.timing)
    }
}
