//! The order store: the board's orders in memory, mirrored to one JSON file.

pub mod persistence;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::domain::{
    format_order_time, tally, ItemCount, Metrics, Order, OrderSubmission, Snapshot,
};
use crate::error::BoardError;

pub use persistence::{read_snapshot, write_snapshot};

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// What a successful `load` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No file yet; in-memory orders were left as they were.
    Missing,
    /// The file was read and replaced the in-memory orders.
    Loaded(usize),
}

/// Where an upsert landed, as a storage index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    Inserted { position: usize },
    Updated { position: usize },
}

/// Result of an in-memory write together with the attempt to persist it.
///
/// The write itself always happened; `persisted` says whether the file now
/// reflects it. A failed persist can be retried with [`OrderStore::save`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteReport<T> {
    pub change: T,
    pub persisted: Result<(), BoardError>,
}

impl<T> WriteReport<T> {
    pub fn is_durable(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Maps a most-recent-first display position to an index in storage order.
pub fn display_to_storage_index(len: usize, display_index: usize) -> Option<usize> {
    if display_index < len {
        Some(len - 1 - display_index)
    } else {
        None
    }
}

pub struct OrderStore {
    path: PathBuf,
    orders: Vec<Order>,
    clock: Clock,
}

impl OrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, || Local::now().naive_local())
    }

    pub fn with_clock(
        path: impl Into<PathBuf>,
        clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            orders: Vec::new(),
            clock: Box::new(clock),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces in-memory orders with the file's contents.
    ///
    /// On any read or parse error the current orders are kept.
    pub fn load(&mut self) -> Result<LoadOutcome, BoardError> {
        match read_snapshot(&self.path)? {
            Some(snapshot) => {
                let count = snapshot.orders.len();
                self.orders = snapshot.orders;
                info!(path = %self.path.display(), orders = count, "Orders loaded");
                Ok(LoadOutcome::Loaded(count))
            }
            None => {
                debug!(path = %self.path.display(), "No orders file yet");
                Ok(LoadOutcome::Missing)
            }
        }
    }

    /// Inserts a new order, or overwrites the one with the same name in place.
    pub fn upsert(
        &mut self,
        submission: OrderSubmission,
    ) -> Result<WriteReport<UpsertKind>, BoardError> {
        let valid = submission.validate()?;
        self.reload_before_write();
        let order = Order::stamped(valid, (self.clock)());

        let change = match self.orders.iter().position(|o| o.is_named(&order.name)) {
            Some(position) => {
                self.orders[position] = order;
                UpsertKind::Updated { position }
            }
            None => {
                self.orders.push(order);
                UpsertKind::Inserted {
                    position: self.orders.len() - 1,
                }
            }
        };
        debug!(?change, "Order stored in memory");

        Ok(WriteReport {
            change,
            persisted: self.persist_after_write(),
        })
    }

    /// Removes the order shown at `display_index` (0 = most recent).
    pub fn delete_at(&mut self, display_index: usize) -> Result<WriteReport<Order>, BoardError> {
        self.reload_before_write();
        let len = self.orders.len();
        let index = display_to_storage_index(len, display_index).ok_or(
            BoardError::IndexOutOfRange {
                index: display_index,
                len,
            },
        )?;
        let removed = self.orders.remove(index);
        debug!(name = %removed.name, storage_index = index, "Order removed from memory");

        Ok(WriteReport {
            change: removed,
            persisted: self.persist_after_write(),
        })
    }

    /// Writes every order plus the current time to the file.
    pub fn save(&self) -> Result<(), BoardError> {
        let snapshot = Snapshot::new(self.orders.clone(), format_order_time((self.clock)()));
        write_snapshot(&self.path, &snapshot)
    }

    /// Picks up what other processes wrote to the file since our last read.
    /// A missing or unreadable file leaves the in-memory orders as they are.
    fn reload_before_write(&mut self) {
        match read_snapshot(&self.path) {
            Ok(Some(snapshot)) => {
                debug!(orders = snapshot.orders.len(), "Reloaded orders before write");
                self.orders = snapshot.orders;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not reload orders before write, using memory"),
        }
    }

    fn persist_after_write(&self) -> Result<(), BoardError> {
        let result = self.save();
        if let Err(e) = &result {
            warn!(error = %e, "Order change kept in memory but not saved");
        }
        result
    }

    /// Orders in storage order, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders as the board shows them, most recent first.
    pub fn display_orders(&self) -> Vec<Order> {
        self.orders().iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn tally(&self) -> Vec<ItemCount> {
        tally(&self.orders)
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::of(&self.orders)
    }
}
