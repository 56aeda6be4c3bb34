mod errors;
mod events;
#[cfg(test)]
mod tests;
mod transaction;

use serde::{Deserialize, Serialize};

pub use errors::{FieldViolation, ValidationError};
pub use events::{FraudAlertEvent, OutcomeEvent};
pub use transaction::{TransactionRecord, TransactionRequest};

/// Lifecycle status of a transaction.
///
/// A record enters the queue as `Pending` and logically transitions to exactly
/// one of the terminal states, even though the event announcing that
/// transition may be delivered more than once.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Processed,
    Failed
}
