use std::fmt::Display;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{TransactionRecord, TransactionStatus};
use crate::types::TransactionId;

/// Terminal outcome of one processing attempt, published to the outcome topic
/// keyed by the transaction id.
///
/// Published once per successful attempt, but at-least-once delivery means
/// consumers may observe it more than once and must deduplicate on
/// `transaction_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeEvent {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub currency: String,
    pub account_from: String,
    pub account_to: String,
    pub status: TransactionStatus,
    pub processed_at: DateTime<Utc>,
    /// Identifies which processor instance produced the outcome.
    pub processor_id: String
}

impl OutcomeEvent {
    pub fn processed(record: &TransactionRecord, processor_id: &str) -> Self {
        Self::terminal(record, TransactionStatus::Processed, processor_id)
    }

    pub fn failed(record: &TransactionRecord, processor_id: &str) -> Self {
        Self::terminal(record, TransactionStatus::Failed, processor_id)
    }

    fn terminal(record: &TransactionRecord, status: TransactionStatus, processor_id: &str) -> Self {
        Self {
            transaction_id: record.transaction_id.clone(),
            amount: record.amount,
            currency: record.currency.clone(),
            account_from: record.account_from.clone(),
            account_to: record.account_to.clone(),
            status,
            processed_at: Utc::now(),
            processor_id: processor_id.to_string()
        }
    }
}

/// Emitted whenever processing of a record fails for any reason.
///
/// `transaction_id` holds the best-available identifier: the parsed
/// transaction id when one exists, otherwise the queue's own message id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudAlertEvent {
    pub transaction_id: String,
    pub error: String,
    pub timestamp: DateTime<Utc>
}

impl FraudAlertEvent {
    pub fn new(identifier: impl Into<String>, error: impl Display) -> Self {
        Self {
            transaction_id: identifier.into(),
            error: error.to_string(),
            timestamp: Utc::now()
        }
    }
}
