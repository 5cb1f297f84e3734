pub mod collection;
pub mod remote;
pub mod sqlite;

pub use collection::{Collection, CollectionId, SortParams, SortRequest, SortState};
pub use remote::{run_fetch_worker, FetchRequest, FetchedPage};
pub use sqlite::SqliteSource;
