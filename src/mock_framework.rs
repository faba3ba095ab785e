//! # Mock Framework
//!
//! Utilities for testing code that talks to the board service without
//! running one.
//!
//! Use [`create_mock_client`] to get a client and the receiver its requests
//! arrive on, then answer them with the `expect_*` helpers.

use tokio::sync::mpsc;

use crate::clients::BoardClient;
use crate::domain::{ItemCount, Metrics, Order, OrderSubmission};
use crate::error::BoardError;
use crate::messages::{BoardRequest, ServiceResponse};
use crate::store::{UpsertKind, WriteReport};

/// Creates a client whose requests land on the returned receiver.
pub fn create_mock_client(buffer_size: usize) -> (BoardClient, mpsc::Receiver<BoardRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (BoardClient::new(sender), receiver)
}

/// Next message must be an Upsert request
pub async fn expect_upsert(
    receiver: &mut mpsc::Receiver<BoardRequest>,
) -> Option<(OrderSubmission, ServiceResponse<WriteReport<UpsertKind>, BoardError>)> {
    match receiver.recv().await {
        Some(BoardRequest::Upsert {
            submission,
            respond_to,
        }) => Some((submission, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<BoardRequest>,
) -> Option<(usize, ServiceResponse<WriteReport<Order>, BoardError>)> {
    match receiver.recv().await {
        Some(BoardRequest::Delete {
            display_index,
            respond_to,
        }) => Some((display_index, respond_to)),
        _ => None,
    }
}

pub async fn expect_metrics(
    receiver: &mut mpsc::Receiver<BoardRequest>,
) -> Option<ServiceResponse<Metrics, BoardError>> {
    match receiver.recv().await {
        Some(BoardRequest::Metrics { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_tally(
    receiver: &mut mpsc::Receiver<BoardRequest>,
) -> Option<ServiceResponse<Vec<ItemCount>, BoardError>> {
    match receiver.recv().await {
        Some(BoardRequest::Tally { respond_to }) => Some(respond_to),
        _ => None,
    }
}

pub async fn expect_list(
    receiver: &mut mpsc::Receiver<BoardRequest>,
) -> Option<ServiceResponse<Vec<Order>, BoardError>> {
    match receiver.recv().await {
        Some(BoardRequest::ListOrders { respond_to }) => Some(respond_to),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10);

        let upsert_task = tokio::spawn(async move {
            client
                .upsert(OrderSubmission::new("Jun", "Tea", ""))
                .await
        });

        let (submission, responder) = expect_upsert(&mut receiver)
            .await
            .expect("Expected Upsert request");
        assert_eq!(submission.name, "Jun");
        responder
            .send(Ok(WriteReport {
                change: UpsertKind::Inserted { position: 0 },
                persisted: Ok(()),
            }))
            .unwrap();

        let report = upsert_task.await.unwrap().unwrap();
        assert_eq!(report.change, UpsertKind::Inserted { position: 0 });
    }

    #[tokio::test]
    async fn dropped_responder_is_a_communication_error() {
        let (client, mut receiver) = create_mock_client(10);

        let task = tokio::spawn(async move { client.delete(0).await });
        let (_, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        drop(responder);

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, BoardError::ActorCommunication(_)));
    }
}
