//! Color theme and glyphs for the marg TUI.
//!
//! Uses a Kanagawa Wave-derived palette by default with an optional
//! high-contrast override; glyphs fall back to ASCII on request.

use ratatui::style::Color;

use crate::UiOptions;

mod colors {
    use super::Color;

    // === Backgrounds (Sumi Ink) ===
    pub const BG_DARK: Color = Color::Rgb(22, 22, 29);
    pub const BG_PANEL: Color = Color::Rgb(31, 31, 40);
    pub const BG_HIGHLIGHT: Color = Color::Rgb(42, 42, 55);
    pub const BG_BORDER: Color = Color::Rgb(84, 84, 109);

    // === Foregrounds (Fuji) ===
    pub const TEXT_PRIMARY: Color = Color::Rgb(220, 215, 186);
    pub const TEXT_SECONDARY: Color = Color::Rgb(200, 192, 147);
    pub const TEXT_MUTED: Color = Color::Rgb(114, 113, 105);

    // === Primary/Accent ===
    pub const PRIMARY: Color = Color::Rgb(149, 127, 184); // oniViolet
    pub const ACCENT: Color = Color::Rgb(127, 180, 202); // springBlue
    pub const SUCCESS: Color = Color::Rgb(152, 187, 108); // springGreen
    pub const WARNING: Color = Color::Rgb(230, 195, 132); // carpYellow
    pub const ERROR: Color = Color::Rgb(255, 93, 98); // peachRed
}

/// Resolved theme palette used by the UI.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg_dark: Color,
    pub bg_panel: Color,
    pub bg_highlight: Color,
    pub bg_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Palette {
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bg_dark: colors::BG_DARK,
            bg_panel: colors::BG_PANEL,
            bg_highlight: colors::BG_HIGHLIGHT,
            bg_border: colors::BG_BORDER,
            text_primary: colors::TEXT_PRIMARY,
            text_secondary: colors::TEXT_SECONDARY,
            text_muted: colors::TEXT_MUTED,
            primary: colors::PRIMARY,
            accent: colors::ACCENT,
            success: colors::SUCCESS,
            warning: colors::WARNING,
            error: colors::ERROR,
        }
    }

    #[must_use]
    pub fn high_contrast() -> Self {
        Self {
            bg_dark: Color::Black,
            bg_panel: Color::Black,
            bg_highlight: Color::DarkGray,
            bg_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::Gray,
            primary: Color::Magenta,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Icon set, with an ASCII fallback for constrained terminals.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub user: &'static str,
    pub assistant: &'static str,
    pub wizard: &'static str,
    pub check_on: &'static str,
    pub check_off: &'static str,
    pub bullet: &'static str,
    pub link: &'static str,
    pub auth_on: &'static str,
    pub auth_off: &'static str,
    spinner: &'static [&'static str],
}

impl Glyphs {
    #[must_use]
    pub fn unicode() -> Self {
        Self {
            user: "\u{276f}",      // ❯
            assistant: "\u{25c6}", // ◆
            wizard: "\u{25a4}",    // ▤
            check_on: "[\u{2713}]",
            check_off: "[ ]",
            bullet: "\u{2022}",
            link: "\u{2197}", // ↗
            auth_on: "\u{25cf}",
            auth_off: "\u{25cb}",
            spinner: &[
                "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}",
                "\u{2826}", "\u{2827}", "\u{2807}", "\u{280f}",
            ],
        }
    }

    #[must_use]
    pub fn ascii() -> Self {
        Self {
            user: ">",
            assistant: "*",
            wizard: "#",
            check_on: "[x]",
            check_off: "[ ]",
            bullet: "-",
            link: "->",
            auth_on: "(+)",
            auth_off: "(-)",
            spinner: &["|", "/", "-", "\\"],
        }
    }

    #[must_use]
    pub fn spinner_frame(&self, tick: usize) -> &'static str {
        self.spinner[tick % self.spinner.len()]
    }
}

#[must_use]
pub fn palette(options: UiOptions) -> Palette {
    if options.high_contrast {
        Palette::high_contrast()
    } else {
        Palette::standard()
    }
}

#[must_use]
pub fn glyphs(options: UiOptions) -> Glyphs {
    if options.ascii_only {
        Glyphs::ascii()
    } else {
        Glyphs::unicode()
    }
}
