use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::types::errors::IdError;

const PREFIX: &str = "txn";
const SUFFIX_LENGTH: usize = 9;

/// Globally unique identifier assigned to a transaction at ingestion.
///
/// The id doubles as the idempotency key for downstream consumers and as the
/// event-bus partition key, so its format is part of the external contract:
/// `txn-<unix-millis>-<9 lowercase alphanumerics>`. The random suffix keeps
/// collisions between concurrent submissions in the same millisecond
/// overwhelmingly unlikely.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a fresh id from the current time and a random suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = random_suffix(SUFFIX_LENGTH);
        TransactionId(format!("{PREFIX}-{millis}-{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, '-');

        let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IdError::InvalidFormat("Id must have the form txn-<millis>-<suffix>".to_string()));
        };

        if prefix != PREFIX {
            return Err(IdError::InvalidFormat(format!("Id must start with the '{PREFIX}' prefix")));
        }

        if millis.is_empty() || !millis.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(IdError::InvalidFormat("Id timestamp component must be numeric".to_string()));
        }

        if suffix.is_empty() || !suffix.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
            return Err(IdError::InvalidFormat("Id suffix must be alphanumeric".to_string()));
        }

        Ok(TransactionId(value.to_string()))
    }
}

/// Short random alphanumeric string, lowercased to match base36-style suffixes.
pub(crate) fn random_suffix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .map(|character| character.to_ascii_lowercase())
        .collect()
}
