mod errors;
mod settlement;
mod worker;

pub use errors::{ProcessorError, SettlementError};
pub use settlement::{Settlement, SimulatedSettlement};
pub use worker::TransactionProcessor;
