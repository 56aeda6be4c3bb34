use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::errors::{FieldViolation, ValidationError};
use crate::models::TransactionStatus;
use crate::types::TransactionId;

/// A client-submitted transfer request, before any identifier is assigned.
///
/// Field names follow the external JSON contract (`accountFrom`, `accountTo`).
/// The request is immutable once accepted; everything the pipeline adds lives
/// on [`TransactionRecord`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub amount: Decimal,
    pub currency: String,
    pub account_from: String,
    pub account_to: String
}

impl TransactionRequest {
    /// Checks every schema rule and reports the complete list of violations,
    /// not just the first one found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.amount <= Decimal::ZERO {
            violations.push(FieldViolation::new("amount", "must be a positive number"));
        }

        if self.currency.chars().count() != 3 {
            violations.push(FieldViolation::new("currency", "must be exactly 3 characters"));
        }

        if self.account_from.is_empty() {
            violations.push(FieldViolation::new("accountFrom", "must not be empty"));
        }

        if self.account_to.is_empty() {
            violations.push(FieldViolation::new("accountTo", "must not be empty"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::invalid_fields(violations))
        }
    }
}

/// The unit of work that travels through the durable queue.
///
/// Serialized as-is into the queue message body. Ownership is the queue's
/// while the record is in flight; the processor takes it over on delivery and
/// hands it back (via rejection) if processing does not complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub amount: Decimal,
    pub currency: String,
    pub account_from: String,
    pub account_to: String,
    /// Ingestion time.
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus
}

impl TransactionRecord {
    /// Accepts a validated request: assigns the transaction id, stamps the
    /// ingestion time and marks the record pending.
    pub fn accept(request: TransactionRequest) -> Self {
        Self {
            transaction_id: TransactionId::generate(),
            amount: request.amount,
            currency: request.currency,
            account_from: request.account_from,
            account_to: request.account_to,
            timestamp: Utc::now(),
            status: TransactionStatus::Pending
        }
    }

    /// Business-rule re-check at processing time, guarding against queue
    /// corruption or replay of records that predate a rule change.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.amount <= Decimal::ZERO {
            violations.push(FieldViolation::new("amount", "must be a positive number"));
        }

        if self.account_from.is_empty() {
            violations.push(FieldViolation::new("accountFrom", "must not be empty"));
        }

        if self.account_to.is_empty() {
            violations.push(FieldViolation::new("accountTo", "must not be empty"));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::invalid_fields(violations))
        }
    }
}
