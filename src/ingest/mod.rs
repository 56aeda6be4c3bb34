mod endpoint;

pub use endpoint::{ApiResponse, IngestEndpoint};
