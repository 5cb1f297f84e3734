//! Grid rendering
//!
//! Renders the header row with its sort indicators above the visible
//! records, and keeps the per-column x ranges of the last draw so mouse
//! clicks on the header map back to a column index.

use std::ops::Range;

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::Modifier,
    widgets::{Cell, HighlightSpacing, Row, Table, TableState},
    Frame,
};

use crate::grid::{Direction, HeaderRow};
use crate::store::Collection;
use crate::ui::theme::Theme;

pub struct GridView {
    row_state: TableState,
    column_ranges: Vec<Range<u16>>,
    header_y: u16,
}

impl GridView {
    pub fn new() -> Self {
        let mut row_state = TableState::default();
        row_state.select(Some(0));
        Self {
            row_state,
            column_ranges: Vec::new(),
            header_y: 0,
        }
    }

    /// Index of the header column containing terminal position (x, y),
    /// per the last draw.
    pub fn header_hit(&self, x: u16, y: u16) -> Option<usize> {
        if y != self.header_y {
            return None;
        }
        self.column_ranges
            .iter()
            .position(|range| range.contains(&x))
    }

    /// Move the row selection by `delta`, clamped to the row count.
    /// `i32::MIN` and `i32::MAX` jump to the first and last row.
    pub fn select_delta(&mut self, delta: i32, len: usize) {
        if len == 0 {
            return;
        }
        let current = self.row_state.selected().unwrap_or(0);
        let next = if delta == i32::MIN {
            0
        } else if delta == i32::MAX {
            len - 1
        } else {
            (current as i32)
                .saturating_add(delta)
                .clamp(0, len as i32 - 1) as usize
        };
        self.row_state.select(Some(next));
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        header: &HeaderRow,
        collection: &Collection,
        theme: &Theme,
    ) {
        let constraints: Vec<Constraint> = header
            .cells()
            .iter()
            .map(|cell| match cell.column().width {
                Some(width) => Constraint::Length(width),
                None => Constraint::Min(8),
            })
            .collect();

        // Mirror the table's own column layout (same constraints, same
        // spacing, no highlight gutter) so clicks land on the right
        // column.
        let chunks = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints(constraints.clone())
            .spacing(1)
            .split(area);
        self.column_ranges = chunks
            .iter()
            .map(|chunk| chunk.x..chunk.x + chunk.width)
            .collect();
        self.header_y = area.y;

        let selected_column = header.selected();
        let header_cells: Vec<Cell> = header
            .cells()
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let mut style = if cell.direction() != Direction::None {
                    theme.active_sort()
                } else {
                    theme.header()
                };
                if i == selected_column {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                Cell::from(cell.header_text()).style(style)
            })
            .collect();

        let records = collection.visible();
        let len = records.len();
        if len > 0 && self.row_state.selected().unwrap_or(0) >= len {
            self.row_state.select(Some(len - 1));
        }

        let rows: Vec<Row> = records
            .iter()
            .map(|record| {
                let cells: Vec<Cell> = header
                    .cells()
                    .iter()
                    .map(|cell| Cell::from(record.get(&cell.column().name).to_string()))
                    .collect();
                Row::new(cells).style(theme.normal())
            })
            .collect();

        let table = Table::new(rows, constraints)
            .header(Row::new(header_cells).height(1))
            .column_spacing(1)
            .highlight_spacing(HighlightSpacing::Never)
            .row_highlight_style(theme.selected());

        frame.render_stateful_widget(table, area, &mut self.row_state);
    }
}

impl Default for GridView {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_hit_maps_x_to_a_column() {
        let mut view = GridView::new();
        view.column_ranges = vec![0..10, 11..20];
        view.header_y = 2;

        assert_eq!(view.header_hit(5, 2), Some(0));
        assert_eq!(view.header_hit(11, 2), Some(1));
        // The spacing gap between columns belongs to no column.
        assert_eq!(view.header_hit(10, 2), None);
        // Clicks below the header row never activate.
        assert_eq!(view.header_hit(5, 3), None);
    }

    #[test]
    fn row_selection_clamps_and_jumps() {
        let mut view = GridView::new();

        view.select_delta(5, 3);
        assert_eq!(view.row_state.selected(), Some(2));

        view.select_delta(-10, 3);
        assert_eq!(view.row_state.selected(), Some(0));

        view.select_delta(i32::MAX, 3);
        assert_eq!(view.row_state.selected(), Some(2));

        view.select_delta(i32::MIN, 3);
        assert_eq!(view.row_state.selected(), Some(0));

        // Empty grids keep the selection untouched.
        view.select_delta(1, 0);
        assert_eq!(view.row_state.selected(), Some(0));
    }
}
