//! Light/dark palettes applied to the root block.

use ratatui::style::Color;
use snakedex_core::store::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub focus: Color,
    pub success: Color,
    pub danger: Color,
    pub border: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Rgb(243, 244, 246),
                surface: Color::Rgb(255, 255, 255),
                text: Color::Rgb(17, 24, 39),
                muted: Color::Rgb(107, 114, 128),
                accent: Color::Rgb(22, 163, 74),
                focus: Color::Rgb(37, 99, 235),
                success: Color::Rgb(22, 163, 74),
                danger: Color::Rgb(220, 38, 38),
                border: Color::Rgb(209, 213, 219),
            },
            ThemeMode::Dark => Self {
                background: Color::Rgb(17, 24, 39),
                surface: Color::Rgb(31, 41, 55),
                text: Color::Rgb(243, 244, 246),
                muted: Color::Rgb(156, 163, 175),
                accent: Color::Rgb(74, 222, 128),
                focus: Color::Rgb(96, 165, 250),
                success: Color::Rgb(74, 222, 128),
                danger: Color::Rgb(248, 113, 113),
                border: Color::Rgb(75, 85, 99),
            },
        }
    }
}

/// Label for the toggle in the header.
pub fn toggle_label(mode: ThemeMode) -> &'static str {
    match mode {
        ThemeMode::Light => "☀ light",
        ThemeMode::Dark => "☾ dark",
    }
}
