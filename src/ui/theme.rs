//! Color themes

use ratatui::style::{Color, Modifier, Style};

/// Colors for the grid and its chrome.
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub text: Color,
    pub text_dim: Color,

    /// Column header cells.
    pub header: Color,
    /// The header cell carrying the active sort.
    pub sort_indicator: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,

    pub error: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Reset,
            text: Color::Gray,
            text_dim: Color::DarkGray,
            header: Color::Cyan,
            sort_indicator: Color::Yellow,
            selection_bg: Color::Blue,
            selection_fg: Color::White,
            error: Color::Red,
            border: Color::DarkGray,
        }
    }
}

impl Theme {
    /// Variant for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            text: Color::Black,
            text_dim: Color::DarkGray,
            header: Color::Blue,
            sort_indicator: Color::Magenta,
            selection_bg: Color::LightBlue,
            selection_fg: Color::Black,
            error: Color::Red,
            border: Color::Gray,
        }
    }

    // Style helpers
    pub fn normal(&self) -> Style {
        Style::default().fg(self.text).bg(self.bg)
    }

    pub fn dim(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.header)
    }

    pub fn active_sort(&self) -> Style {
        Style::default()
            .fg(self.sort_indicator)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default().bg(self.selection_bg).fg(self.selection_fg)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }
}
