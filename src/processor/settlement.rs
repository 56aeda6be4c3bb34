use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::debug;

use crate::models::TransactionRecord;
use crate::processor::errors::SettlementError;

/// The downstream ledger/settlement collaborator, injected into the
/// processor.
///
/// Because the queue may redeliver an already-settled record, implementations
/// that touch external state must be idempotent on the transaction id.
#[async_trait]
pub trait Settlement: Send + Sync + 'static {
    async fn execute(&self, record: &TransactionRecord) -> Result<(), SettlementError>;
}

/// Stand-in settlement used until a real integration exists: waits out a
/// short delay to model the downstream call, then succeeds.
pub struct SimulatedSettlement {
    delay: Duration
}

impl SimulatedSettlement {
    pub fn new() -> Self {
        Self::with_delay(Duration::from_millis(100))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Settlement for SimulatedSettlement {
    async fn execute(&self, record: &TransactionRecord) -> Result<(), SettlementError> {
        sleep(self.delay).await;

        debug!(
            "Settled {} {} from [{}] to [{}]",
            record.amount, record.currency, record.account_from, record.account_to
        );

        Ok(())
    }
}
