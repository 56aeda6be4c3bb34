use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue is unavailable: {reason}")]
    Unavailable {
        reason: String
    },
    #[error("Unknown receipt handle [{receipt}]")]
    UnknownReceipt {
        receipt: String
    }
}

impl QueueError {
    pub fn unavailable(reason: impl Display) -> Self {
        Self::Unavailable { reason: reason.to_string() }
    }

    pub fn unknown_receipt(receipt: &str) -> Self {
        Self::UnknownReceipt { receipt: receipt.to_string() }
    }
}
