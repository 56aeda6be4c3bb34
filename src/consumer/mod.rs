mod outcome_consumer;

use async_trait::async_trait;

pub use outcome_consumer::OutcomeConsumer;

use crate::models::OutcomeEvent;

/// Business hooks invoked once per delivered outcome event.
///
/// At-least-once delivery means the same transaction id may arrive more than
/// once; implementations must treat the repeat as a safe duplicate rather
/// than a new outcome.
#[async_trait]
pub trait OutcomeHandler: Send + Sync + 'static {
    async fn on_processed(&self, event: &OutcomeEvent) -> anyhow::Result<()>;

    async fn on_failed(&self, event: &OutcomeEvent) -> anyhow::Result<()>;
}
