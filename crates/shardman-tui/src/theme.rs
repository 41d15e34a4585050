//! Color theme for the dashboard.
//!
//! A built-in palette, with optional per-color overrides read from
//! `theme.yaml` next to the cluster configuration. Unknown color names or
//! an unreadable file fall back to the defaults; the dashboard never
//! refuses to start over cosmetics.

use std::path::Path;
use std::str::FromStr;

use ratatui::style::Color;
use serde::Deserialize;
use tracing::warn;

/// Resolved color palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Title bar text
    pub header: Color,
    /// Unfocused panel borders
    pub border: Color,
    /// Border of the panel holding the focus
    pub border_focus: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (timestamps, placeholders)
    pub text_dim: Color,
    /// Running shard indicator
    pub running: Color,
    /// Stopped shard indicator
    pub stopped: Color,
    /// Warnings and the busy indicator
    pub warning: Color,
    /// Hotkey hints in the footer
    pub hotkey: Color,
    /// Foreground of the focused cell
    pub highlight_fg: Color,
    /// Background of the focused cell
    pub highlight_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header: Color::Cyan,
            border: Color::DarkGray,
            border_focus: Color::Cyan,
            text: Color::White,
            text_dim: Color::Gray,
            running: Color::Green,
            stopped: Color::Red,
            warning: Color::Yellow,
            hotkey: Color::Yellow,
            highlight_fg: Color::Black,
            highlight_bg: Color::Cyan,
        }
    }
}

/// On-disk override format; every field optional.
#[derive(Debug, Default, Deserialize)]
struct ThemeOverrides {
    header: Option<String>,
    border: Option<String>,
    border_focus: Option<String>,
    text: Option<String>,
    text_dim: Option<String>,
    running: Option<String>,
    stopped: Option<String>,
    warning: Option<String>,
    hotkey: Option<String>,
    highlight_fg: Option<String>,
    highlight_bg: Option<String>,
}

impl Theme {
    /// Load the theme, applying overrides from `<config_dir>/theme.yaml`
    /// when present.
    pub fn load(config_dir: &Path) -> Self {
        let path = config_dir.join("theme.yaml");
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read theme file");
                return Self::default();
            }
        };
        let overrides: ThemeOverrides = match serde_yaml::from_str(&content) {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed theme file");
                return Self::default();
            }
        };
        Self::default().with_overrides(&overrides)
    }

    fn with_overrides(mut self, overrides: &ThemeOverrides) -> Self {
        apply(&mut self.header, &overrides.header, "header");
        apply(&mut self.border, &overrides.border, "border");
        apply(
            &mut self.border_focus,
            &overrides.border_focus,
            "border_focus",
        );
        apply(&mut self.text, &overrides.text, "text");
        apply(&mut self.text_dim, &overrides.text_dim, "text_dim");
        apply(&mut self.running, &overrides.running, "running");
        apply(&mut self.stopped, &overrides.stopped, "stopped");
        apply(&mut self.warning, &overrides.warning, "warning");
        apply(&mut self.hotkey, &overrides.hotkey, "hotkey");
        apply(
            &mut self.highlight_fg,
            &overrides.highlight_fg,
            "highlight_fg",
        );
        apply(
            &mut self.highlight_bg,
            &overrides.highlight_bg,
            "highlight_bg",
        );
        self
    }
}

/// Overwrite `slot` when the override parses as a color name or hex code.
fn apply(slot: &mut Color, value: &Option<String>, field: &str) {
    if let Some(name) = value {
        match Color::from_str(name) {
            Ok(color) => *slot = color,
            Err(_) => warn!(field, value = %name, "unknown color in theme file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(Theme::load(dir.path()), Theme::default());
    }

    #[test]
    fn test_partial_overrides() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("theme.yaml"),
            "running: lightgreen\nhighlight_bg: \"#1e90ff\"\n",
        )
        .unwrap();

        let theme = Theme::load(dir.path());
        assert_eq!(theme.running, Color::LightGreen);
        assert_eq!(theme.highlight_bg, Color::Rgb(0x1e, 0x90, 0xff));
        // Untouched fields keep their defaults.
        assert_eq!(theme.stopped, Theme::default().stopped);
    }

    #[test]
    fn test_unknown_color_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("theme.yaml"), "header: chartreuse-ish\n").unwrap();
        let theme = Theme::load(dir.path());
        assert_eq!(theme.header, Theme::default().header);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("theme.yaml"), ":::: not yaml ::::[").unwrap();
        assert_eq!(Theme::load(dir.path()), Theme::default());
    }
}
