//! Record collections and sort dispatch
//!
//! A `Collection` owns the records visible to a grid plus the broadcast
//! channel that carries a `SortState` event to every header cell after
//! each dispatch. How a sort is applied depends on the mode: local
//! collections reorder in memory, client-paged collections reorder the
//! full superset and re-derive the visible page, remote collections
//! record the parameters and re-fetch.

use std::fmt;
use std::ops::Range;

use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::grid::{Direction, RecordComparator};
use crate::models::Record;

use super::remote::{FetchRequest, FetchedPage};

/// Identifies a collection instance so header cells of unrelated grids
/// ignore each other's sort events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionId(Uuid);

impl CollectionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A sort dispatch from a header cell.
pub struct SortRequest {
    pub column: String,
    pub direction: Direction,
    pub comparator: RecordComparator,
}

/// Sort parameters recorded on the collection at every dispatch; the
/// fetch worker turns them into an ORDER BY clause.
#[derive(Debug, Clone)]
pub struct SortParams {
    pub column: String,
    pub direction: Direction,
}

/// Broadcast payload emitted after every sort dispatch.
#[derive(Clone)]
pub struct SortState {
    pub collection: CollectionId,
    pub column: String,
    pub direction: Direction,
    pub comparator: RecordComparator,
}

impl fmt::Debug for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortState")
            .field("collection", &self.collection)
            .field("column", &self.column)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Page window over a record set.
#[derive(Debug, Clone)]
struct Pager {
    page: usize,
    page_size: usize,
}

impl Pager {
    fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    fn slice(&self, len: usize) -> Range<usize> {
        let start = (self.page * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }
}

enum Mode {
    /// Full record set in memory, sorted in place.
    Local {
        records: Vec<Record>,
        comparator: Option<RecordComparator>,
    },
    /// Full superset in memory; the visible page is a window over it.
    ClientPaged {
        superset: Vec<Record>,
        comparator: Option<RecordComparator>,
        pager: Pager,
    },
    /// Only the fetched page in memory; sorting records parameters and
    /// asks the fetch worker for a fresh page.
    Remote {
        page: Vec<Record>,
        total: usize,
        generation: u64,
        pager: Pager,
        fetch_tx: mpsc::Sender<FetchRequest>,
    },
}

/// The sortable record store behind a grid.
pub struct Collection {
    id: CollectionId,
    mode: Mode,
    sort_params: Option<SortParams>,
    sort_tx: broadcast::Sender<SortState>,
}

impl Collection {
    pub fn new_local(records: Vec<Record>) -> Self {
        Self::with_mode(Mode::Local {
            records,
            comparator: None,
        })
    }

    pub fn new_client_paged(records: Vec<Record>, page_size: usize) -> Self {
        Self::with_mode(Mode::ClientPaged {
            superset: records,
            comparator: None,
            pager: Pager::new(page_size),
        })
    }

    pub fn new_remote(fetch_tx: mpsc::Sender<FetchRequest>, page_size: usize) -> Self {
        Self::with_mode(Mode::Remote {
            page: Vec::new(),
            total: 0,
            generation: 0,
            pager: Pager::new(page_size),
            fetch_tx,
        })
    }

    fn with_mode(mode: Mode) -> Self {
        let (sort_tx, _) = broadcast::channel(100);
        Self {
            id: CollectionId::new(),
            mode,
            sort_params: None,
            sort_tx,
        }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Subscribe to sort broadcasts. Dropping the receiver releases the
    /// subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<SortState> {
        self.sort_tx.subscribe()
    }

    /// Number of live sort subscriptions.
    pub fn sort_listeners(&self) -> usize {
        self.sort_tx.receiver_count()
    }

    /// Records currently visible to the grid.
    pub fn visible(&self) -> &[Record] {
        match &self.mode {
            Mode::Local { records, .. } => records,
            Mode::ClientPaged {
                superset, pager, ..
            } => &superset[pager.slice(superset.len())],
            Mode::Remote { page, .. } => page,
        }
    }

    /// First visible record, the context for sortability predicates.
    pub fn first(&self) -> Option<&Record> {
        self.visible().first()
    }

    /// Total record count behind the grid, not just the visible page.
    pub fn total(&self) -> usize {
        match &self.mode {
            Mode::Local { records, .. } => records.len(),
            Mode::ClientPaged { superset, .. } => superset.len(),
            Mode::Remote { total, .. } => *total,
        }
    }

    /// Current page index and page count, for paged modes.
    pub fn page_info(&self) -> Option<(usize, usize)> {
        match &self.mode {
            Mode::Local { .. } => None,
            Mode::ClientPaged {
                superset, pager, ..
            } => Some((pager.page, pager.page_count(superset.len()))),
            Mode::Remote { total, pager, .. } => Some((pager.page, pager.page_count(*total))),
        }
    }

    /// Apply a sort dispatch: record the parameters, reorder or
    /// re-fetch, then broadcast the new sort state. The broadcast fires
    /// in every mode, before any fetch resolves.
    pub fn apply_sort(&mut self, request: SortRequest) {
        let SortRequest {
            column,
            direction,
            comparator,
        } = request;
        self.sort_params = Some(SortParams {
            column: column.clone(),
            direction,
        });

        match &mut self.mode {
            Mode::Local {
                records,
                comparator: active,
            } => {
                *active = Some(comparator.clone());
                records.sort_by(|a, b| comparator(a, b));
            }
            Mode::ClientPaged {
                superset,
                comparator: active,
                ..
            } => {
                // A cleared direction drops the value ordering; the
                // insertion-order fallback carried by the request then
                // takes the empty slot and restores creation order.
                if direction == Direction::None {
                    active.take();
                } else {
                    *active = Some(comparator.clone());
                }
                let sort_with = active.get_or_insert_with(|| comparator.clone()).clone();
                superset.sort_by(|a, b| sort_with(a, b));
            }
            Mode::Remote {
                generation,
                pager,
                fetch_tx,
                ..
            } => {
                // Never reorders the in-memory page; the fetched page
                // is authoritative once it arrives.
                Self::request_fetch(fetch_tx, generation, pager, self.sort_params.clone());
            }
        }

        let _ = self.sort_tx.send(SortState {
            collection: self.id,
            column,
            direction,
            comparator,
        });
    }

    /// Install a fetched page if its generation is still current; stale
    /// responses are discarded, so the last request wins.
    pub fn apply_fetched(&mut self, fetched: FetchedPage) -> bool {
        let Mode::Remote {
            page,
            total,
            generation,
            ..
        } = &mut self.mode
        else {
            return false;
        };
        if fetched.generation != *generation {
            tracing::debug!(
                "discarding stale page: generation {} behind {}",
                fetched.generation,
                *generation
            );
            return false;
        }
        *page = fetched.records;
        *total = fetched.total;
        true
    }

    pub fn next_page(&mut self) {
        self.turn_page(1);
    }

    pub fn prev_page(&mut self) {
        self.turn_page(-1);
    }

    fn turn_page(&mut self, delta: i32) {
        match &mut self.mode {
            Mode::Local { .. } => {}
            Mode::ClientPaged {
                superset, pager, ..
            } => {
                let pages = pager.page_count(superset.len()) as i32;
                pager.page = (pager.page as i32 + delta).clamp(0, pages - 1) as usize;
            }
            Mode::Remote {
                total,
                generation,
                pager,
                fetch_tx,
                ..
            } => {
                let pages = pager.page_count(*total) as i32;
                let target = (pager.page as i32 + delta).clamp(0, pages - 1) as usize;
                if target == pager.page {
                    return;
                }
                pager.page = target;
                Self::request_fetch(fetch_tx, generation, pager, self.sort_params.clone());
            }
        }
    }

    /// Re-apply the active ordering: local modes re-sort with the
    /// stored comparator, remote mode re-fetches the current page.
    pub fn refresh(&mut self) {
        match &mut self.mode {
            Mode::Local {
                records,
                comparator,
            } => {
                if let Some(cmp) = comparator {
                    let cmp = cmp.clone();
                    records.sort_by(|a, b| cmp(a, b));
                }
            }
            Mode::ClientPaged {
                superset,
                comparator,
                ..
            } => {
                if let Some(cmp) = comparator {
                    let cmp = cmp.clone();
                    superset.sort_by(|a, b| cmp(a, b));
                }
            }
            Mode::Remote {
                generation,
                pager,
                fetch_tx,
                ..
            } => {
                Self::request_fetch(fetch_tx, generation, pager, self.sort_params.clone());
            }
        }
    }

    /// Bump the generation and queue a fetch for the current page.
    fn request_fetch(
        fetch_tx: &mpsc::Sender<FetchRequest>,
        generation: &mut u64,
        pager: &Pager,
        sort: Option<SortParams>,
    ) {
        *generation += 1;
        let request = FetchRequest {
            generation: *generation,
            page: pager.page,
            page_size: pager.page_size,
            sort,
        };
        if let Err(e) = fetch_tx.try_send(request) {
            tracing::warn!("fetch request dropped: {}", e);
        }
    }
}
