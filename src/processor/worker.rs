use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::bus::{BrokerTransport, EventBusClient};
use crate::config::topics;
use crate::models::{FraudAlertEvent, OutcomeEvent, TransactionRecord};
use crate::processor::errors::ProcessorError;
use crate::processor::settlement::Settlement;
use crate::queue::{Delivery, WorkQueue};
use crate::types::{TransactionId, random_suffix};

const DEFAULT_BATCH_SIZE: usize = 10;
const DEFAULT_SETTLEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Consumes queued transaction records, settles them and republishes the
/// outcome.
///
/// Each record in a batch is handled independently and in delivery order. A
/// record is acknowledged only after its outcome event was accepted by the
/// broker; every failure publishes a fraud alert and rejects the delivery so
/// the queue's own redelivery and dead-letter policy governs what happens
/// next. The processor performs no deduplication of its own; redelivered
/// records are safe because everything downstream is idempotent on the
/// transaction id.
pub struct TransactionProcessor<Q, T, S>
where
    Q: WorkQueue,
    T: BrokerTransport,
    S: Settlement
{
    queue: Arc<Q>,
    bus: Arc<EventBusClient<T>>,
    settlement: Arc<S>,
    processor_id: String,
    batch_size: usize,
    settlement_timeout: Duration
}

impl<Q, T, S> TransactionProcessor<Q, T, S>
where
    Q: WorkQueue,
    T: BrokerTransport,
    S: Settlement
{
    pub fn new(queue: Arc<Q>, bus: Arc<EventBusClient<T>>, settlement: Arc<S>) -> Self {
        Self {
            queue,
            bus,
            settlement,
            processor_id: format!("proc-{}", random_suffix(6)),
            batch_size: DEFAULT_BATCH_SIZE,
            settlement_timeout: DEFAULT_SETTLEMENT_TIMEOUT
        }
    }

    pub fn with_processor_id(mut self, processor_id: impl Into<String>) -> Self {
        self.processor_id = processor_id.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Bounds one settlement call so a poisoned record cannot stall the
    /// worker; an elapsed timeout takes the fraud-alert path.
    pub fn with_settlement_timeout(mut self, settlement_timeout: Duration) -> Self {
        self.settlement_timeout = settlement_timeout;
        self
    }

    pub fn processor_id(&self) -> &str {
        &self.processor_id
    }

    /// Receives one delivery batch and processes each record in delivery
    /// order, acknowledging and rejecting per record. Returns the number of
    /// deliveries handled; zero means the queue had nothing ready.
    ///
    /// # Errors
    /// Only queue or broker infrastructure failures surface here. Per-record
    /// failures are reported as fraud alerts and rejections, never as an
    /// error of the batch.
    pub async fn process_batch(&self) -> Result<usize, ProcessorError> {
        let deliveries = self.queue.receive(self.batch_size).await?;
        let count = deliveries.len();

        if count > 0 {
            info!("Processing batch of {count} deliveries");
        }

        for delivery in deliveries {
            match self.process_delivery(&delivery).await {
                Ok(transaction_id) => {
                    self.queue.acknowledge(&delivery.receipt).await?;
                    info!("Transaction processed successfully: {transaction_id}");
                }
                Err(record_error) => {
                    error!("Error processing delivery [{}]: {record_error}", delivery.message_id);
                    self.report_failure(&delivery, &record_error).await;
                    self.queue.reject(&delivery.receipt).await?;
                }
            }
        }

        Ok(count)
    }

    /// Drives receive/process cycles until the queue hands out nothing.
    ///
    /// Rejected records keep the loop alive until they either settle on a
    /// redelivery or fall to the dead-letter destination. This is the
    /// bootstrap driver; a queue-triggered runtime calls `process_batch`
    /// once per invocation instead.
    pub async fn run_until_drained(&self) -> Result<(), ProcessorError> {
        loop {
            if self.process_batch().await? == 0 {
                return Ok(());
            }
        }
    }

    async fn process_delivery(&self, delivery: &Delivery) -> Result<TransactionId, ProcessorError> {
        let record: TransactionRecord = serde_json::from_str(&delivery.body)
            .map_err(|parse_error| ProcessorError::malformed_record(&delivery.message_id, parse_error))?;

        debug!(
            "Processing transaction {} (delivery attempt {})",
            record.transaction_id, delivery.receive_count
        );

        record.validate()
            .map_err(|validation_error| ProcessorError::invalid_record(&record, validation_error))?;

        match timeout(self.settlement_timeout, self.settlement.execute(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(settlement_error)) => {
                return Err(ProcessorError::settlement_failed(&record, settlement_error));
            }
            Err(_elapsed) => {
                return Err(ProcessorError::settlement_timeout(&record, self.settlement_timeout));
            }
        }

        let outcome = OutcomeEvent::processed(&record, &self.processor_id);

        self.bus.publish(topics::TRANSACTION_EVENTS, record.transaction_id.as_str(), &outcome).await
            .map_err(|publish_error| ProcessorError::outcome_publish_failed(&record, publish_error))?;

        Ok(record.transaction_id)
    }

    async fn report_failure(&self, delivery: &Delivery, record_error: &ProcessorError) {
        let identifier = Self::failure_identifier(delivery, record_error);
        let alert = FraudAlertEvent::new(identifier.clone(), record_error);

        if let Err(publish_error) = self.bus.publish(topics::FRAUD_ALERTS, &identifier, &alert).await {
            //NOTE: The delivery is rejected either way, the record is not lost,
            //      only this alert is.
            error!("Failed to publish fraud alert for [{identifier}]: {publish_error}");
        }
    }

    /// Best-available identifier for a failed delivery: the parsed
    /// transaction id when the body was readable, otherwise the queue's own
    /// message id.
    fn failure_identifier(delivery: &Delivery, record_error: &ProcessorError) -> String {
        match record_error {
            ProcessorError::InvalidRecord { transaction_id, .. }
            | ProcessorError::SettlementTimeout { transaction_id, .. }
            | ProcessorError::SettlementFailed { transaction_id, .. }
            | ProcessorError::OutcomePublishFailed { transaction_id, .. } => transaction_id.clone(),
            _ => delivery.message_id.clone()
        }
    }
}
