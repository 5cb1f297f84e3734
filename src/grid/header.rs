//! Header cells and the header row
//!
//! A `HeaderCell` owns one column's sort state machine: activation
//! cycles the direction, builds a comparator and dispatches it to the
//! collection. The cell's own direction only changes when the
//! collection's sort broadcast comes back around, so every cell,
//! including the one that originated the sort, reflects the same event.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::store::{Collection, CollectionId, SortRequest, SortState};

use super::column::{Column, HeaderStyle, SortContext};
use super::comparator::insertion_order;
use super::direction::Direction;
use super::error::GridError;

/// Per-column sort controller.
pub struct HeaderCell {
    column: Arc<Column>,
    style: HeaderStyle,
    direction: Direction,
    collection_id: CollectionId,
    sort_events: broadcast::Receiver<SortState>,
}

impl HeaderCell {
    pub fn new(column: Arc<Column>, collection: &Collection) -> Self {
        Self {
            style: column.header_style.clone(),
            direction: Direction::None,
            collection_id: collection.id(),
            sort_events: collection.subscribe(),
            column,
        }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Record `direction` as current. The rendered indicator derives
    /// from it; `Direction::None` clears the indicator.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Click or keyboard activation: re-check sortability, advance the
    /// cycle, dispatch. The cell's own direction is left for the
    /// broadcast to update.
    pub fn on_activate(&mut self, collection: &mut Collection) {
        let sortable = self.column.is_sortable(&SortContext {
            column: &self.column,
            record: collection.first(),
        });
        if !sortable {
            tracing::debug!("column {} is not sortable", self.column.name);
            return;
        }
        let next = self.direction.cycle();
        self.sort(collection, next);
    }

    /// Dispatch a sort on this column. A direction without a sign gets
    /// the insertion-order fallback comparator.
    pub fn sort(&self, collection: &mut Collection, direction: Direction) {
        let comparator = self
            .column
            .make_comparator(direction.sign())
            .unwrap_or_else(insertion_order);
        collection.apply_sort(SortRequest {
            column: self.column.name.clone(),
            direction,
            comparator,
        });
    }

    /// Drain pending sort broadcasts and update this cell's direction.
    pub fn sync(&mut self) {
        loop {
            match self.sort_events.try_recv() {
                Ok(state) => self.on_sort_state(&state),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!("sort broadcast lagged, {} events missed", missed);
                }
                Err(_) => break,
            }
        }
    }

    fn on_sort_state(&mut self, state: &SortState) {
        if state.collection != self.collection_id {
            return;
        }
        if state.column == self.column.name {
            self.set_direction(state.direction);
        } else {
            self.set_direction(Direction::None);
        }
    }

    /// Header text under this cell's style.
    pub fn header_text(&self) -> String {
        match &self.style {
            HeaderStyle::Arrows => match self.direction {
                Direction::Ascending => format!("{} ▲", self.column.label),
                Direction::Descending => format!("{} ▼", self.column.label),
                Direction::None => self.column.label.clone(),
            },
            HeaderStyle::Plain => self.column.label.clone(),
            HeaderStyle::Custom(render) => render(&self.column.label, self.direction),
        }
    }
}

/// The ordered set of header cells sharing one collection.
pub struct HeaderRow {
    cells: Vec<HeaderCell>,
    selected: usize,
}

impl HeaderRow {
    /// Build one cell per column. Fails on an empty column set or a
    /// duplicate column name; per-column header styles are resolved
    /// here, once.
    pub fn new(columns: Vec<Column>, collection: &Collection) -> Result<Self, GridError> {
        if columns.is_empty() {
            return Err(GridError::NoColumns);
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.clone()) {
                return Err(GridError::DuplicateColumn(column.name.clone()));
            }
        }
        let cells = columns
            .into_iter()
            .map(|column| HeaderCell::new(Arc::new(column), collection))
            .collect();
        Ok(Self { cells, selected: 0 })
    }

    pub fn cells(&self) -> &[HeaderCell] {
        &self.cells
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the keyboard selection, wrapping at both ends.
    pub fn select_delta(&mut self, delta: i32) {
        let len = self.cells.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    pub fn activate(&mut self, index: usize, collection: &mut Collection) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.on_activate(collection);
        }
    }

    pub fn activate_selected(&mut self, collection: &mut Collection) {
        self.activate(self.selected, collection);
    }

    /// Drain the sort broadcast into every cell.
    pub fn sync(&mut self) {
        for cell in &mut self.cells {
            cell.sync();
        }
    }

    /// The column currently holding a non-none direction, if any.
    pub fn active_sort(&self) -> Option<(&str, Direction)> {
        self.cells
            .iter()
            .find(|cell| cell.direction() != Direction::None)
            .map(|cell| (cell.column().name.as_str(), cell.direction()))
    }
}
