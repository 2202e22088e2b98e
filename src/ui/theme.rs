use std::fs;

use crossterm::style::{Attribute, ContentStyle};
use ratatui::style::{Color, Modifier, Style};
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::ui::paragraph::TextStyles;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "terminal-default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Colour names are `#rrggbb`, an ANSI colour name (`red`, `darkgray`, ...),
/// `ansiN` for a 256-colour index, or `reset` for the terminal default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_pending: String,
    pub text_cursor_fg: String,
    pub text_cursor_bg: String,
    pub timer_running: String,
    pub timer_stopped: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub error: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("keytrail")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => {
                        tracing::warn!(path = %user_theme_path.display(), %err, "invalid user theme")
                    }
                }
            }
        }

        // Try bundled themes
        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    /// Painters for the typing paragraph.
    pub fn text_styles(&self) -> TextStyles {
        let c = &self.colors;
        let mut cursor = ContentStyle::new();
        cursor.foreground_color = to_crossterm(c.text_cursor_fg());
        cursor.background_color = to_crossterm(c.text_cursor_bg());
        cursor.attributes.set(Attribute::Reverse);
        cursor.attributes.set(Attribute::Bold);
        // Explicit cursor colours replace the reverse-video fallback.
        if cursor.background_color.is_some() {
            cursor.attributes.unset(Attribute::Reverse);
        }

        let mut to_enter = ContentStyle::new();
        to_enter.foreground_color = to_crossterm(c.text_pending());
        to_enter.attributes.set(Attribute::Dim);

        let mut mistake = ContentStyle::new();
        mistake.foreground_color = to_crossterm(c.text_incorrect());
        mistake.attributes.set(Attribute::Underlined);

        let mut correct = ContentStyle::new();
        correct.foreground_color = to_crossterm(c.text_correct());

        TextStyles {
            correct,
            to_enter,
            mistake,
            cursor,
        }
    }

    /// Clock colours; the clock is dimmed until the first keystroke.
    pub fn timer_style(&self, running: bool) -> ContentStyle {
        let mut style = ContentStyle::new();
        if running {
            style.foreground_color = to_crossterm(self.colors.timer_running());
        } else {
            style.foreground_color = to_crossterm(self.colors.timer_stopped());
            style.attributes.set(Attribute::Dim);
        }
        style
    }

    pub fn hint_style(&self) -> Style {
        Style::default()
            .fg(self.colors.text_pending())
            .add_modifier(Modifier::DIM)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "reset".to_string(),
            fg: "reset".to_string(),
            text_correct: "reset".to_string(),
            text_incorrect: "red".to_string(),
            text_pending: "reset".to_string(),
            text_cursor_fg: "reset".to_string(),
            text_cursor_bg: "reset".to_string(),
            timer_running: "green".to_string(),
            timer_stopped: "green".to_string(),
            accent: "blue".to_string(),
            accent_dim: "darkgray".to_string(),
            border: "darkgray".to_string(),
            error: "red".to_string(),
            success: "green".to_string(),
        }
    }
}

const ANSI_NAMES: [&str; 16] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "gray",
    "darkgray", "lightred", "lightgreen", "lightyellow", "lightblue", "lightmagenta", "lightcyan", "white",
];

impl ThemeColors {
    pub fn parse_color(spec: &str) -> Color {
        let spec = spec.trim().to_ascii_lowercase();
        if spec == "reset" || spec == "default" || spec.is_empty() {
            return Color::Reset;
        }
        if let Some(hex) = spec.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return Color::Rgb(r, g, b);
                }
            }
        }
        if let Some(index) = spec.strip_prefix("ansi").and_then(|n| n.parse::<u8>().ok()) {
            return Color::Indexed(index);
        }
        if let Some(index) = ANSI_NAMES.iter().position(|n| *n == spec) {
            return Color::Indexed(index as u8);
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn timer_running(&self) -> Color { Self::parse_color(&self.timer_running) }
    pub fn timer_stopped(&self) -> Color { Self::parse_color(&self.timer_stopped) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

/// `None` leaves the terminal's own colour in place.
fn to_crossterm(color: Color) -> Option<crossterm::style::Color> {
    match color {
        Color::Rgb(r, g, b) => Some(crossterm::style::Color::Rgb { r, g, b }),
        Color::Indexed(n) => Some(crossterm::style::Color::AnsiValue(n)),
        _ => None,
    }
}
