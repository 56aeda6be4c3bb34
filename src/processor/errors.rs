use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::bus::BusError;
use crate::models::{TransactionRecord, ValidationError};
use crate::queue::QueueError;
use crate::types::MessageId;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Settlement rejected transaction [{transaction_id}]: {reason}")]
    Rejected {
        transaction_id: String,
        reason: String
    },
    #[error("Settlement dependency unavailable: {reason}")]
    Unavailable {
        reason: String
    }
}

impl SettlementError {
    pub fn rejected(transaction_id: impl Display, reason: impl Display) -> Self {
        Self::Rejected {
            transaction_id: transaction_id.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn unavailable(reason: impl Display) -> Self {
        Self::Unavailable { reason: reason.to_string() }
    }
}

/// Why one queued record failed to process.
///
/// The queue variants are infrastructure failures of the processor itself;
/// everything else is a per-record failure that takes the fraud-alert path.
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Malformed queue message [{message_id}]: {source}")]
    MalformedRecord {
        message_id: MessageId,
        #[source]
        source: serde_json::Error
    },
    #[error("Transaction [{transaction_id}] failed validation: {source}")]
    InvalidRecord {
        transaction_id: String,
        #[source]
        source: ValidationError
    },
    #[error("Settlement of transaction [{transaction_id}] timed out after {timeout:?}")]
    SettlementTimeout {
        transaction_id: String,
        timeout: Duration
    },
    #[error("Settlement of transaction [{transaction_id}] failed: {source}")]
    SettlementFailed {
        transaction_id: String,
        #[source]
        source: SettlementError
    },
    #[error("Failed to publish outcome for transaction [{transaction_id}]: {source}")]
    OutcomePublishFailed {
        transaction_id: String,
        #[source]
        source: BusError
    },
    #[error(transparent)]
    Queue(#[from] QueueError)
}

impl ProcessorError {
    pub fn malformed_record(message_id: &str, source: serde_json::Error) -> Self {
        Self::MalformedRecord {
            message_id: message_id.to_string(),
            source
        }
    }

    pub fn invalid_record(record: &TransactionRecord, source: ValidationError) -> Self {
        Self::InvalidRecord {
            transaction_id: record.transaction_id.to_string(),
            source
        }
    }

    pub fn settlement_timeout(record: &TransactionRecord, timeout: Duration) -> Self {
        Self::SettlementTimeout {
            transaction_id: record.transaction_id.to_string(),
            timeout
        }
    }

    pub fn settlement_failed(record: &TransactionRecord, source: SettlementError) -> Self {
        Self::SettlementFailed {
            transaction_id: record.transaction_id.to_string(),
            source
        }
    }

    pub fn outcome_publish_failed(record: &TransactionRecord, source: BusError) -> Self {
        Self::OutcomePublishFailed {
            transaction_id: record.transaction_id.to_string(),
            source
        }
    }
}
