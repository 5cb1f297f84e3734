//! Remote fetch worker

use tokio::sync::mpsc;

use crate::app::messages::AppMessage;
use crate::models::Record;

use super::collection::SortParams;
use super::sqlite::SqliteSource;

/// A page request issued by a remote collection.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Generation tag used to discard stale responses.
    pub generation: u64,
    pub page: usize,
    pub page_size: usize,
    pub sort: Option<SortParams>,
}

/// A fetched page, tagged with the generation of its request.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub generation: u64,
    pub records: Vec<Record>,
    pub total: usize,
}

/// Serve fetch requests in arrival order until the request channel
/// closes. Failures are reported to the UI and do not stop the worker.
pub async fn run_fetch_worker(
    source: SqliteSource,
    mut request_rx: mpsc::Receiver<FetchRequest>,
    message_tx: mpsc::Sender<AppMessage>,
) {
    tracing::info!("Fetch worker started");

    while let Some(request) = request_rx.recv().await {
        let generation = request.generation;
        match source.fetch_page(&request) {
            Ok(page) => {
                if message_tx.send(AppMessage::PageLoaded(page)).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!("Page fetch failed: {}", e);
                let _ = message_tx
                    .send(AppMessage::FetchFailed {
                        generation,
                        error: e.to_string(),
                    })
                    .await;
            }
        }
    }

    tracing::info!("Fetch worker stopped");
}
