use tokio::sync::oneshot;

use crate::domain::{ItemCount, MenuImage, Metrics, Order, OrderSubmission};
use crate::error::BoardError;
use crate::store::{LoadOutcome, UpsertKind, WriteReport};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the board service. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum BoardRequest {
    Refresh {
        respond_to: ServiceResponse<LoadOutcome, BoardError>,
    },
    Upsert {
        submission: OrderSubmission,
        respond_to: ServiceResponse<WriteReport<UpsertKind>, BoardError>,
    },
    Delete {
        display_index: usize,
        respond_to: ServiceResponse<WriteReport<Order>, BoardError>,
    },
    Save {
        respond_to: ServiceResponse<(), BoardError>,
    },
    ListOrders {
        respond_to: ServiceResponse<Vec<Order>, BoardError>,
    },
    Tally {
        respond_to: ServiceResponse<Vec<ItemCount>, BoardError>,
    },
    Metrics {
        respond_to: ServiceResponse<Metrics, BoardError>,
    },
    UploadMenu {
        bytes: Vec<u8>,
        label: String,
        respond_to: ServiceResponse<MenuImage, BoardError>,
    },
    GetMenu {
        respond_to: ServiceResponse<Option<MenuImage>, BoardError>,
    },
    Shutdown,
}
