pub mod column;
pub mod comparator;
pub mod direction;
pub mod error;
pub mod header;

pub use column::{
    columns_from_names, derive_columns, load_columns, Column, ColumnSpec, HeaderStyle,
    SortContext, Sortable,
};
pub use comparator::{
    base_comparator, default_base, default_extractor, insertion_order, make_comparator,
    RecordComparator, ValueComparator, ValueExtractor,
};
pub use direction::Direction;
pub use error::GridError;
pub use header::{HeaderCell, HeaderRow};
