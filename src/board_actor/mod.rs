//! The board service: the one task that owns the order store.
//!
//! Every read and write goes through this task's mailbox, so requests from
//! any number of sessions are applied one at a time against a single list
//! and a single file. File work runs on the blocking pool; the loop awaits
//! it before taking the next request.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Span};

use crate::clients::BoardClient;
use crate::domain::{MenuImage, Order, OrderSubmission};
use crate::error::BoardError;
use crate::messages::{BoardRequest, ServiceResponse};
use crate::store::{LoadOutcome, OrderStore, UpsertKind, WriteReport};

pub struct BoardService {
    receiver: mpsc::Receiver<BoardRequest>,
    store: Arc<Mutex<OrderStore>>,
    menu: Option<MenuImage>,
}

impl BoardService {
    pub fn new(buffer_size: usize, store: OrderStore) -> (Self, BoardClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store: Arc::new(Mutex::new(store)),
            menu: None,
        };
        let client = BoardClient::new(sender);
        (service, client)
    }

    #[instrument(name = "board_service", skip(self))]
    pub async fn run(mut self) {
        if let Ok(store) = self.lock_store() {
            info!(path = %store.path().display(), orders = store.len(), "BoardService starting");
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BoardRequest::Refresh { respond_to } => {
                    self.handle_refresh(respond_to).await;
                }
                BoardRequest::Upsert {
                    submission,
                    respond_to,
                } => {
                    self.handle_upsert(submission, respond_to).await;
                }
                BoardRequest::Delete {
                    display_index,
                    respond_to,
                } => {
                    self.handle_delete(display_index, respond_to).await;
                }
                BoardRequest::Save { respond_to } => {
                    self.handle_save(respond_to).await;
                }
                BoardRequest::ListOrders { respond_to } => {
                    let _ = respond_to.send(self.lock_store().map(|store| store.display_orders()));
                }
                BoardRequest::Tally { respond_to } => {
                    let _ = respond_to.send(self.lock_store().map(|store| store.tally()));
                }
                BoardRequest::Metrics { respond_to } => {
                    let _ = respond_to.send(self.lock_store().map(|store| store.metrics()));
                }
                BoardRequest::UploadMenu {
                    bytes,
                    label,
                    respond_to,
                } => {
                    self.handle_upload_menu(bytes, label, respond_to);
                }
                BoardRequest::GetMenu { respond_to } => {
                    let _ = respond_to.send(Ok(self.menu.clone()));
                }
                BoardRequest::Shutdown => {
                    info!("BoardService shutting down");
                    break;
                }
            }
        }

        info!("BoardService stopped");
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, OrderStore>, BoardError> {
        lock(&self.store)
    }

    /// Runs `op` against the store on the blocking pool, inside the caller's span.
    fn with_store<T, F>(&self, op: F) -> impl Future<Output = Result<T, BoardError>>
    where
        F: FnOnce(&mut OrderStore) -> Result<T, BoardError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let span = Span::current();
        async move {
            tokio::task::spawn_blocking(move || {
                let _entered = span.enter();
                let mut guard = lock(&store)?;
                op(&mut guard)
            })
            .await
            .map_err(|e| BoardError::Persistence(format!("store task failed: {e}")))?
        }
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_refresh(&mut self, respond_to: ServiceResponse<LoadOutcome, BoardError>) {
        debug!("Processing refresh request");

        let result = self.with_store(|store| store.load()).await;
        if let Err(e) = &result {
            warn!(error = %e, "Reload failed, keeping current orders");
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(name = %submission.name), skip(self, submission, respond_to))]
    async fn handle_upsert(
        &mut self,
        submission: OrderSubmission,
        respond_to: ServiceResponse<WriteReport<UpsertKind>, BoardError>,
    ) {
        debug!("Processing upsert request");

        let result = self.with_store(move |store| store.upsert(submission)).await;
        match &result {
            Ok(report) => info!(change = ?report.change, durable = report.is_durable(), "Order accepted"),
            Err(e) => info!(error = %e, "Order rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_delete(
        &mut self,
        display_index: usize,
        respond_to: ServiceResponse<WriteReport<Order>, BoardError>,
    ) {
        debug!("Processing delete request");

        let result = self.with_store(move |store| store.delete_at(display_index)).await;
        match &result {
            Ok(report) => info!(name = %report.change.name, durable = report.is_durable(), "Order deleted"),
            Err(e) => warn!(error = %e, "Delete rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_save(&mut self, respond_to: ServiceResponse<(), BoardError>) {
        debug!("Processing save request");

        let result = self.with_store(|store| store.save()).await;
        if let Err(e) = &result {
            error!(error = %e, "Save failed");
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(label = %label, size_bytes = bytes.len()), skip(self, bytes, label, respond_to))]
    fn handle_upload_menu(
        &mut self,
        bytes: Vec<u8>,
        label: String,
        respond_to: ServiceResponse<MenuImage, BoardError>,
    ) {
        debug!("Processing menu upload");

        let result = match MenuImage::decode(bytes, label) {
            Ok(image) => {
                info!(format = %image.format, width = image.width, height = image.height, "Menu image replaced");
                self.menu = Some(image.clone());
                Ok(image)
            }
            Err(e) => {
                warn!(error = %e, "Menu upload rejected, keeping previous image");
                Err(e)
            }
        };

        let _ = respond_to.send(result);
    }
}

fn lock(store: &Mutex<OrderStore>) -> Result<MutexGuard<'_, OrderStore>, BoardError> {
    store
        .lock()
        .map_err(|_| BoardError::Persistence("order store lock poisoned".to_string()))
}
