use tracing::{error, info, instrument, warn};

use crate::board_actor::BoardService;
use crate::clients::BoardClient;
use crate::error::BoardError;
use crate::store::{LoadOutcome, OrderStore};

use super::BoardConfig;

/// Starts the board service and hands out its client.
///
/// One `BoardSystem` per process: it owns the single store for the
/// configured file, so every session in the process shares one writer.
pub struct BoardSystem {
    pub client: BoardClient,
    handle: tokio::task::JoinHandle<()>,
}

impl BoardSystem {
    #[instrument(name = "board_system", skip(config), fields(orders_file = %config.orders_file.display()))]
    pub fn new(config: &BoardConfig) -> Self {
        Self::with_store(OrderStore::new(config.orders_file.clone()), config.channel_capacity)
    }

    /// Loads the store once, then spawns the service that owns it.
    ///
    /// A load failure is logged and the board starts from whatever the
    /// store held, which for a fresh store is nothing.
    pub fn with_store(mut store: OrderStore, channel_capacity: usize) -> Self {
        info!("Starting board system");

        match store.load() {
            Ok(LoadOutcome::Loaded(count)) => info!(orders = count, "Restored saved orders"),
            Ok(LoadOutcome::Missing) => info!("Starting with an empty board"),
            Err(e) => warn!(error = %e, "Could not read saved orders"),
        }

        let (service, client) = BoardService::new(channel_capacity, store);
        let handle = tokio::spawn(service.run());

        info!("Board system started successfully");
        Self { client, handle }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), BoardError> {
        info!("Shutting down board system");

        // the service may already be gone; the join below still reports why
        let _ = self.client.shutdown().await;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Service shutdown error");
            return Err(BoardError::ActorCommunication(format!("board service failed: {e}")));
        }

        info!("Board system shutdown complete");
        Ok(())
    }
}
