use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::models::{TransactionRecord, TransactionRequest, ValidationError};
use crate::queue::WorkQueue;

/// HTTP-shaped result of one ingestion call.
///
/// The HTTP front door itself (routing, auth, request parsing) lives outside
/// this crate; it maps these fields onto its own response type.
#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: String
}

impl ApiResponse {
    fn json(status_code: u16, body: serde_json::Value) -> Self {
        Self {
            status_code,
            headers: vec![
                ("Content-Type", "application/json"),
                ("Access-Control-Allow-Origin", "*")
            ],
            body: body.to_string()
        }
    }
}

/// Accepts raw transaction submissions and hands them to the durable queue.
///
/// Accepted never means processed: the 202 response only promises that the
/// record was durably enqueued with a fresh transaction id and Pending status.
pub struct IngestEndpoint<Q: WorkQueue> {
    queue: Arc<Q>
}

impl<Q: WorkQueue> IngestEndpoint<Q> {
    pub fn new(queue: Arc<Q>) -> Self {
        Self { queue }
    }

    /// Handles one submission body end to end.
    ///
    /// Validation failures return 400 with the full list of violated fields;
    /// an unreachable queue returns 500. A success response is only produced
    /// after the queue acknowledged the enqueue.
    pub async fn handle(&self, body: Option<&str>) -> ApiResponse {
        let request = match Self::parse(body) {
            Ok(request) => request,
            Err(validation_error) => return Self::rejection(validation_error)
        };

        let record = TransactionRecord::accept(request);

        let queue_body = match serde_json::to_string(&record) {
            Ok(queue_body) => queue_body,
            Err(serialize_error) => {
                error!("Failed to serialize transaction record: {serialize_error}");
                return ApiResponse::json(500, json!({ "error": "Internal server error" }));
            }
        };

        if let Err(queue_error) = self.queue.enqueue(queue_body).await {
            error!("Failed to enqueue transaction [{}]: {queue_error}", record.transaction_id);
            return ApiResponse::json(500, json!({ "error": "Internal server error" }));
        }

        info!("Transaction submitted: {}", record.transaction_id);

        ApiResponse::json(202, json!({
            "message": "Transaction submitted successfully",
            "transactionId": record.transaction_id,
            "status": record.status
        }))
    }

    fn parse(body: Option<&str>) -> Result<TransactionRequest, ValidationError> {
        let Some(body) = body else {
            return Err(ValidationError::MissingBody);
        };

        let request: TransactionRequest = serde_json::from_str(body)
            .map_err(|parse_error| ValidationError::malformed_json(&parse_error))?;

        request.validate()?;

        Ok(request)
    }

    fn rejection(validation_error: ValidationError) -> ApiResponse {
        match &validation_error {
            ValidationError::InvalidFields { violations } => ApiResponse::json(400, json!({
                "error": "Invalid transaction data",
                "details": violations
            })),
            _ => ApiResponse::json(400, json!({ "error": validation_error.to_string() }))
        }
    }
}
