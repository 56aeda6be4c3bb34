use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("Broker connection failed: {reason}")]
    ConnectionFailed {
        reason: String
    },
    #[error("Broker connection retries exhausted after {attempts} attempts")]
    ConnectionExhausted {
        attempts: u32
    },
    #[error("Failed to serialize payload for topic [{topic}]: {source}")]
    Serialization {
        topic: String,
        #[source]
        source: serde_json::Error
    },
    #[error("Failed to publish to topic [{topic}]: {reason}")]
    PublishFailed {
        topic: String,
        reason: String
    },
    #[error("Batch publish of {count} messages to topic [{topic}] failed")]
    BatchFailed {
        topic: String,
        count: usize,
        #[source]
        source: Box<BusError>
    },
    #[error("Failed to subscribe to topic [{topic}] as group [{group_id}]: {reason}")]
    SubscribeFailed {
        topic: String,
        group_id: String,
        reason: String
    },
    #[error("Message handler failed: {reason}")]
    HandlerFailed {
        reason: String
    }
}

impl BusError {
    pub fn connection_failed(reason: impl Display) -> Self {
        Self::ConnectionFailed { reason: reason.to_string() }
    }

    pub fn connection_exhausted(attempts: u32) -> Self {
        Self::ConnectionExhausted { attempts }
    }

    pub fn serialization(topic: &str, source: serde_json::Error) -> Self {
        Self::Serialization { topic: topic.to_string(), source }
    }

    pub fn publish_failed(topic: &str, reason: impl Display) -> Self {
        Self::PublishFailed { topic: topic.to_string(), reason: reason.to_string() }
    }

    pub fn batch_failed(topic: &str, count: usize, source: BusError) -> Self {
        Self::BatchFailed { topic: topic.to_string(), count, source: Box::new(source) }
    }

    pub fn subscribe_failed(topic: &str, group_id: &str, reason: impl Display) -> Self {
        Self::SubscribeFailed {
            topic: topic.to_string(),
            group_id: group_id.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn handler(reason: impl Display) -> Self {
        Self::HandlerFailed { reason: reason.to_string() }
    }
}
