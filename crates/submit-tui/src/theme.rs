use ratatui::style::Color;
use submit_core::config::UiConfig;

/// Convert a core color to a terminal color, blending alpha over `under`
pub fn to_terminal(color: submit_core::Color, under: submit_core::Color) -> Color {
    if color.a == u8::MAX {
        return Color::Rgb(color.r, color.g, color.b);
    }
    let alpha = f64::from(color.a) / 255.0;
    let mix = |top: u8, bottom: u8| {
        (f64::from(top) * alpha + f64::from(bottom) * (1.0 - alpha)).round() as u8
    };
    Color::Rgb(
        mix(color.r, under.r),
        mix(color.g, under.g),
        mix(color.b, under.b),
    )
}

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey2: Color,

    // Semantic colors
    pub accent: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Default to Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}

impl Theme {
    /// Theme with the background and button colors from `[ui]`
    pub fn from_config(config: &UiConfig) -> Self {
        Self {
            bg0: to_terminal(config.background, submit_core::Color::BLACK),
            accent: to_terminal(config.accent, config.background),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_color_passes_through() {
        let color = submit_core::Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(
            to_terminal(color, submit_core::Color::WHITE),
            Color::Rgb(0x12, 0x34, 0x56)
        );
    }

    #[test]
    fn test_alpha_blends_over_background() {
        let half_white = submit_core::Color::rgba(0xff, 0xff, 0xff, 0x80);
        assert_eq!(
            to_terminal(half_white, submit_core::Color::BLACK),
            Color::Rgb(0x80, 0x80, 0x80)
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = UiConfig::default();
        config.accent = submit_core::Color::rgb(1, 2, 3);
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.bg0, Color::Rgb(0x28, 0x28, 0x28));
    }
}
