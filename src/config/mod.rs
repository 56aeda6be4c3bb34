
/// Topic layout shared by the processor and the downstream consumers. The
/// topics themselves are provisioned by broker administration, outside this
/// crate.
pub mod topics {
    /// Transaction outcome events, partitioned by transaction id.
    pub const TRANSACTION_EVENTS: &str = "transactions-events";
    /// Failed or suspicious transactions.
    pub const FRAUD_ALERTS: &str = "fraud-alerts";
    /// Downstream notification fan-out.
    pub const NOTIFICATIONS: &str = "notifications";
}

const DEFAULT_BROKERS: &str = "localhost:9092";
const DEFAULT_CLIENT_ID: &str = "transaction-pipeline";
const DEFAULT_GROUP_ID: &str = "transaction-processors";
const DEFAULT_QUEUE_URL: &str = "local://transactions";
const DEFAULT_REGION: &str = "us-east-1";

/// Externally supplied infrastructure addresses and identifiers.
#[derive(Debug, Clone)]
pub struct Config {
    pub broker_addresses: Vec<String>,
    pub client_id: String,
    pub consumer_group_id: String,
    pub queue_url: String,
    pub region: String
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from any key lookup, falling back to local
    /// development defaults. Split out from `from_env` so tests can supply
    /// values without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>
    {
        let brokers = lookup("BROKER_ADDRESSES").unwrap_or_else(|| DEFAULT_BROKERS.to_string());

        Self {
            broker_addresses: brokers.split(',')
                .map(|address| address.trim().to_string())
                .filter(|address| !address.is_empty())
                .collect(),
            client_id: lookup("CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            consumer_group_id: lookup("CONSUMER_GROUP_ID").unwrap_or_else(|| DEFAULT_GROUP_ID.to_string()),
            queue_url: lookup("QUEUE_URL").unwrap_or_else(|| DEFAULT_QUEUE_URL.to_string()),
            region: lookup("REGION").unwrap_or_else(|| DEFAULT_REGION.to_string())
        }
    }
}
