use super::{OutcomeEvent, TransactionRecord, TransactionRequest, TransactionStatus};

use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::errors::ValidationError;
use crate::models::FraudAlertEvent;

fn create_request(amount: &str, currency: &str, account_from: &str, account_to: &str) -> Result<TransactionRequest> {
    Ok(TransactionRequest {
        amount: Decimal::from_str(amount)?,
        currency: currency.to_string(),
        account_from: account_from.to_string(),
        account_to: account_to.to_string()
    })
}

#[test]
fn test_valid_request_passes_validation() -> Result<()> {
    let request = create_request("150.00", "USD", "acc-1", "acc-2")?;

    assert!(request.validate().is_ok());

    Ok(())
}

#[test]
fn test_negative_amount_is_reported_by_field_name() -> Result<()> {
    let request = create_request("-5", "USD", "a", "b")?;

    let Err(error) = request.validate() else {
        panic!("negative amount accepted");
    };

    assert!(error.violations().iter().any(|violation| violation.field == "amount"));

    Ok(())
}

#[test]
fn test_zero_amount_is_rejected() -> Result<()> {
    let request = create_request("0", "USD", "a", "b")?;

    assert!(request.validate().is_err());

    Ok(())
}

#[test]
fn test_all_violations_are_collected_in_one_pass() -> Result<()> {
    let request = create_request("-1", "USDT", "", "")?;

    let Err(ValidationError::InvalidFields { violations }) = request.validate() else {
        panic!("invalid request accepted");
    };

    let fields: Vec<&str> = violations.iter().map(|violation| violation.field.as_str()).collect();

    assert_eq!(fields, vec!["amount", "currency", "accountFrom", "accountTo"]);

    Ok(())
}

#[test]
fn test_request_deserializes_from_external_json_contract() -> Result<()> {
    let body = r#"{"amount": 150.00, "currency": "USD", "accountFrom": "acc-1", "accountTo": "acc-2"}"#;
    let request: TransactionRequest = serde_json::from_str(body)?;

    assert_eq!(request.amount, Decimal::from_str("150.00")?);
    assert_eq!(request.currency, "USD");
    assert_eq!(request.account_from, "acc-1");
    assert_eq!(request.account_to, "acc-2");

    Ok(())
}

#[test]
fn test_accepting_a_request_produces_a_pending_record() -> Result<()> {
    let before = chrono::Utc::now();
    let record = TransactionRecord::accept(create_request("25.50", "EUR", "acc-1", "acc-2")?);

    assert_eq!(record.status, TransactionStatus::Pending);
    assert!(record.transaction_id.as_str().starts_with("txn-"));
    assert!(record.timestamp >= before);
    assert_eq!(record.amount, Decimal::from_str("25.50")?);

    Ok(())
}

#[test]
fn test_record_roundtrips_through_queue_body_json() -> Result<()> {
    let record = TransactionRecord::accept(create_request("10.00", "GBP", "acc-1", "acc-2")?);
    let body = serde_json::to_string(&record)?;

    assert!(body.contains("\"transactionId\""));
    assert!(body.contains("\"accountFrom\""));
    assert!(body.contains("\"status\":\"PENDING\""));

    let parsed: TransactionRecord = serde_json::from_str(&body)?;

    assert_eq!(parsed.transaction_id, record.transaction_id);
    assert_eq!(parsed.amount, record.amount);
    assert_eq!(parsed.timestamp, record.timestamp);

    Ok(())
}

#[test]
fn test_record_revalidation_catches_corrupt_amounts() -> Result<()> {
    let mut record = TransactionRecord::accept(create_request("10.00", "USD", "acc-1", "acc-2")?);
    record.amount = Decimal::from_str("-10.00")?;

    let Err(error) = record.validate() else {
        panic!("corrupt record accepted");
    };

    assert!(error.violations().iter().any(|violation| violation.field == "amount"));

    Ok(())
}

#[test]
fn test_processed_outcome_copies_record_fields() -> Result<()> {
    let record = TransactionRecord::accept(create_request("150.00", "USD", "acc-1", "acc-2")?);
    let outcome = OutcomeEvent::processed(&record, "proc-test01");

    assert_eq!(outcome.transaction_id, record.transaction_id);
    assert_eq!(outcome.amount, record.amount);
    assert_eq!(outcome.currency, record.currency);
    assert_eq!(outcome.account_from, record.account_from);
    assert_eq!(outcome.account_to, record.account_to);
    assert_eq!(outcome.status, TransactionStatus::Processed);
    assert_eq!(outcome.processor_id, "proc-test01");
    assert!(outcome.processed_at >= record.timestamp);

    Ok(())
}

#[test]
fn test_failed_outcome_carries_terminal_failed_status() -> Result<()> {
    let record = TransactionRecord::accept(create_request("150.00", "USD", "acc-1", "acc-2")?);
    let outcome = OutcomeEvent::failed(&record, "proc-test01");

    assert_eq!(outcome.status, TransactionStatus::Failed);

    let json = serde_json::to_string(&outcome)?;
    assert!(json.contains("\"status\":\"FAILED\""));

    Ok(())
}

#[test]
fn test_fraud_alert_accepts_fallback_identifiers() -> Result<()> {
    let alert = FraudAlertEvent::new("msg-42", "Invalid amount: must be positive");
    let json = serde_json::to_string(&alert)?;

    assert_eq!(alert.transaction_id, "msg-42");
    assert!(json.contains("\"error\":\"Invalid amount: must be positive\""));

    Ok(())
}
