#[macro_use]
mod macros;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::domain::{ItemCount, MenuImage, Metrics, Order, OrderSubmission};
use crate::error::BoardError;
use crate::messages::BoardRequest;
use crate::store::{LoadOutcome, UpsertKind, WriteReport};

/// Cloneable handle to the board service. Any number of sessions may hold
/// one; the service applies their requests in arrival order.
#[derive(Clone)]
pub struct BoardClient {
    sender: mpsc::Sender<BoardRequest>,
}

impl BoardClient {
    pub fn new(sender: mpsc::Sender<BoardRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), BoardError> {
        debug!("Sending shutdown request");
        self.sender
            .send(BoardRequest::Shutdown)
            .await
            .map_err(|_| BoardError::ActorCommunication("Actor closed".to_string()))
    }

    // Written out by hand so the image bytes stay out of the span.
    #[instrument(skip(self, bytes), fields(size_bytes = bytes.len()))]
    pub async fn upload_menu(&self, bytes: Vec<u8>, label: String) -> Result<MenuImage, BoardError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(BoardRequest::UploadMenu {
                bytes,
                label,
                respond_to,
            })
            .await
            .map_err(|_| BoardError::ActorCommunication("Actor closed".to_string()))?;

        response
            .await
            .map_err(|_| BoardError::ActorCommunication("Actor dropped".to_string()))?
    }
}

client_method!(BoardClient => fn refresh() -> LoadOutcome as BoardRequest::Refresh);
client_method!(BoardClient => fn upsert(submission: OrderSubmission) -> WriteReport<UpsertKind> as BoardRequest::Upsert);
client_method!(BoardClient => fn delete(display_index: usize) -> WriteReport<Order> as BoardRequest::Delete);
client_method!(BoardClient => fn save() -> () as BoardRequest::Save);
client_method!(BoardClient => fn list_orders() -> Vec<Order> as BoardRequest::ListOrders);
client_method!(BoardClient => fn tally() -> Vec<ItemCount> as BoardRequest::Tally);
client_method!(BoardClient => fn metrics() -> Metrics as BoardRequest::Metrics);
client_method!(BoardClient => fn get_menu() -> Option<MenuImage> as BoardRequest::GetMenu);
