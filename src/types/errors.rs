use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdError {
    #[error("Transaction id error: {0}")]
    InvalidFormat(String)
}
