use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bus::{BrokerTransport, BusError, BusMessage, EventBusClient};
use crate::config::topics;
use crate::consumer::OutcomeHandler;
use crate::models::{OutcomeEvent, TransactionStatus};

/// Subscribes to the outcome topic and dispatches events to business
/// handlers.
///
/// Multiple instances sharing a group id split the topic between them; a
/// different group id gets its own full copy of the stream. Undeserializable
/// events are logged and skipped, and handler failures are reported to the
/// bus layer without ending the subscription, so one bad event never stalls
/// the stream. Duplicates are passed through untouched; suppressing them is
/// the handler's job.
pub struct OutcomeConsumer<T: BrokerTransport, H: OutcomeHandler> {
    bus: Arc<EventBusClient<T>>,
    group_id: String,
    handler: Arc<H>
}

impl<T: BrokerTransport, H: OutcomeHandler> OutcomeConsumer<T, H> {
    pub fn new(bus: Arc<EventBusClient<T>>, group_id: impl Into<String>, handler: Arc<H>) -> Self {
        Self {
            bus,
            group_id: group_id.into(),
            handler
        }
    }

    /// Joins the outcome topic and returns the subscription task handle. The
    /// task runs until the broker closes the group's stream.
    pub async fn run(&self) -> Result<JoinHandle<()>, BusError> {
        let handler = self.handler.clone();

        self.bus.subscribe(topics::TRANSACTION_EVENTS, &self.group_id, move |message| {
            let handler = handler.clone();

            async move { Self::dispatch(handler, message).await }
        }).await
    }

    async fn dispatch(handler: Arc<H>, message: BusMessage) -> Result<(), BusError> {
        let event: OutcomeEvent = match serde_json::from_str(&message.payload) {
            Ok(event) => event,
            Err(parse_error) => {
                //NOTE: Malformed events are a data-quality failure of the producer,
                //      not a reason to stop consuming.
                warn!("Skipping undeserializable outcome event with key [{}]: {parse_error}", message.key);
                return Ok(());
            }
        };

        debug!(
            "Received outcome event for transaction {} with status {:?}",
            event.transaction_id, event.status
        );

        let result = match event.status {
            TransactionStatus::Processed => handler.on_processed(&event).await,
            TransactionStatus::Failed => handler.on_failed(&event).await,
            TransactionStatus::Pending => {
                warn!("Outcome event for [{}] carries non-terminal status; skipping", event.transaction_id);
                return Ok(());
            }
        };

        result.map_err(|handler_error| BusError::handler(handler_error))
    }
}
