//! Worker-to-UI messages

use crate::store::FetchedPage;

/// Messages sent from the fetch worker to the UI loop.
#[derive(Debug)]
pub enum AppMessage {
    /// A page arrived for the remote collection.
    PageLoaded(FetchedPage),
    /// A fetch attempt failed; surfaced on the status bar.
    FetchFailed { generation: u64, error: String },
}
