//! Status bar line

use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// One labelled entry on the status bar
pub struct StatusItem {
    pub label: String,
    pub value: String,
    pub style: Style,
}

impl StatusItem {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Build the status line. Items are joined by `separator`; labels and
/// separators take `label_style`, values carry their own style.
pub fn build_status_line(items: Vec<StatusItem>, separator: &str, label_style: Style) -> Line<'static> {
    let mut spans = Vec::new();

    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(format!(" {} ", separator), label_style));
        }

        if !item.label.is_empty() {
            spans.push(Span::styled(format!("{}: ", item.label), label_style));
        }
        spans.push(Span::styled(item.value, item.style));
    }

    Line::from(spans)
}
