use super::{InMemoryQueue, QueueError, WorkQueue};

use anyhow::Result;

#[tokio::test]
async fn test_enqueue_and_receive_roundtrip() -> Result<()> {
    let queue = InMemoryQueue::new();
    let message_id = queue.enqueue("{\"amount\":\"10\"}".to_string()).await?;

    let deliveries = queue.receive(10).await?;

    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].message_id, message_id);
    assert_eq!(deliveries[0].body, "{\"amount\":\"10\"}");
    assert_eq!(deliveries[0].receive_count, 1);

    Ok(())
}

#[tokio::test]
async fn test_receive_respects_batch_size_and_fifo_order() -> Result<()> {
    let queue = InMemoryQueue::new();

    for index in 1..=3 {
        queue.enqueue(format!("body-{index}")).await?;
    }

    let first_batch = queue.receive(2).await?;

    assert_eq!(first_batch.len(), 2);
    assert_eq!(first_batch[0].body, "body-1");
    assert_eq!(first_batch[1].body, "body-2");

    let second_batch = queue.receive(2).await?;

    assert_eq!(second_batch.len(), 1);
    assert_eq!(second_batch[0].body, "body-3");

    Ok(())
}

#[tokio::test]
async fn test_acknowledged_messages_are_never_redelivered() -> Result<()> {
    let queue = InMemoryQueue::new();
    queue.enqueue("body".to_string()).await?;

    let deliveries = queue.receive(1).await?;
    queue.acknowledge(&deliveries[0].receipt).await?;

    assert!(queue.receive(1).await?.is_empty());
    assert_eq!(queue.ready_len().await, 0);

    Ok(())
}

#[tokio::test]
async fn test_rejected_messages_are_redelivered_with_incremented_count() -> Result<()> {
    let queue = InMemoryQueue::new();
    queue.enqueue("body".to_string()).await?;

    let first = queue.receive(1).await?;
    queue.reject(&first[0].receipt).await?;

    let second = queue.receive(1).await?;

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].message_id, first[0].message_id);
    assert_eq!(second[0].receive_count, 2);
    assert_ne!(second[0].receipt, first[0].receipt);

    Ok(())
}

#[tokio::test]
async fn test_exhausted_redelivery_budget_moves_message_to_dead_letter() -> Result<()> {
    let queue = InMemoryQueue::with_max_receives(2);
    queue.enqueue("poison".to_string()).await?;

    for _ in 0..2 {
        let deliveries = queue.receive(1).await?;
        queue.reject(&deliveries[0].receipt).await?;
    }

    assert!(queue.receive(1).await?.is_empty());
    assert_eq!(queue.dead_letter_bodies().await, vec!["poison".to_string()]);

    Ok(())
}

#[tokio::test]
async fn test_unavailable_queue_rejects_enqueue() -> Result<()> {
    let queue = InMemoryQueue::new();
    queue.set_unavailable(true);

    let result = queue.enqueue("body".to_string()).await;

    assert!(matches!(result, Err(QueueError::Unavailable { .. })));

    queue.set_unavailable(false);
    queue.enqueue("body".to_string()).await?;

    Ok(())
}

#[tokio::test]
async fn test_unknown_receipts_are_rejected() -> Result<()> {
    let queue = InMemoryQueue::new();
    queue.enqueue("body".to_string()).await?;

    let deliveries = queue.receive(1).await?;
    queue.acknowledge(&deliveries[0].receipt).await?;

    let ack_again = queue.acknowledge(&deliveries[0].receipt).await;
    assert!(matches!(ack_again, Err(QueueError::UnknownReceipt { .. })));

    let reject_missing = queue.reject(&"rcpt-999".to_string()).await;
    assert!(matches!(reject_missing, Err(QueueError::UnknownReceipt { .. })));

    Ok(())
}

#[tokio::test]
async fn test_distinct_messages_get_distinct_ids() -> Result<()> {
    let queue = InMemoryQueue::new();

    let first = queue.enqueue("a".to_string()).await?;
    let second = queue.enqueue("b".to_string()).await?;

    assert_ne!(first, second);

    let deliveries = queue.receive(2).await?;
    let receipts: Vec<&str> = deliveries.iter().map(|delivery| delivery.receipt.as_str()).collect();

    assert_ne!(receipts[0], receipts[1]);

    Ok(())
}

#[test]
fn test_queue_error_messages_identify_the_failure() {
    let unavailable = QueueError::unavailable("connection refused");
    let unknown = QueueError::unknown_receipt("rcpt-1");

    assert_eq!(unavailable.to_string(), "Queue is unavailable: connection refused");
    assert_eq!(unknown.to_string(), "Unknown receipt handle [rcpt-1]");
}
