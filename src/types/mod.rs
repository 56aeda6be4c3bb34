mod errors;
mod ids;
#[cfg(test)]
mod tests;

pub use errors::IdError;
pub use ids::TransactionId;
pub(crate) use ids::random_suffix;

/// Queue-assigned identifier of a single enqueued message.
pub type MessageId = String;
/// Opaque handle used to acknowledge or reject one specific delivery.
pub type ReceiptHandle = String;
