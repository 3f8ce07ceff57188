//! Color theme derived from the configured accent.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;

use crate::infrastructure::config::ThemeConfig;

const FALLBACK_ACCENT: Color = Color::Magenta;

/// Styles shared by every screen.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub title_style: Style,
    pub selection_style: Style,
    pub dimmed_style: Style,
    pub user_style: Style,
    pub model_style: Style,
    pub danger_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_color(FALLBACK_ACCENT)
    }
}

impl Theme {
    /// Builds the theme from config, falling back to magenta on unknown colors.
    #[must_use]
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::from_color(parse_color(&config.accent_color))
    }

    #[must_use]
    pub fn from_color(accent: Color) -> Self {
        Self {
            accent,
            title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            selection_style: Style::default()
                .bg(accent)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            dimmed_style: Style::default().fg(Color::DarkGray),
            user_style: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            model_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            danger_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

fn parse_color(s: &str) -> Color {
    Color::from_str(s.trim()).unwrap_or_else(|_| {
        warn!(color = %s, "Unknown accent color, using default");
        FALLBACK_ACCENT
    })
}
