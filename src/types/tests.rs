use super::TransactionId;
use super::ids::random_suffix;

use std::str::FromStr;

use anyhow::{Result, anyhow};

#[test]
fn test_generated_id_matches_declared_format() -> Result<()> {
    let id = TransactionId::generate();
    let value = id.as_str();

    let mut parts = value.splitn(3, '-');
    let prefix = parts.next().ok_or_else(|| anyhow!("Id prefix missing"))?;
    let millis = parts.next().ok_or_else(|| anyhow!("Id timestamp missing"))?;
    let suffix = parts.next().ok_or_else(|| anyhow!("Id suffix missing"))?;

    assert_eq!(prefix, "txn");
    assert!(millis.bytes().all(|byte| byte.is_ascii_digit()));
    assert_eq!(suffix.len(), 9);
    assert!(suffix.bytes().all(|byte| byte.is_ascii_alphanumeric()));

    Ok(())
}

#[test]
fn test_generated_ids_are_distinct_across_calls() {
    let first = TransactionId::generate();
    let second = TransactionId::generate();

    assert_ne!(first, second);
}

#[test]
fn test_parsing_accepts_generated_ids() -> Result<()> {
    let id = TransactionId::generate();
    let parsed = TransactionId::from_str(id.as_str())?;

    assert_eq!(parsed, id);

    Ok(())
}

#[test]
fn test_parsing_rejects_malformed_ids() {
    for candidate in ["", "txn", "txn-", "txn-abc-xyz123", "order-17000-abc123def", "txn-17000-"] {
        assert!(TransactionId::from_str(candidate).is_err(), "accepted invalid id: {candidate}");
    }
}

#[test]
fn test_id_serializes_as_plain_string() -> Result<()> {
    let id = TransactionId::from_str("txn-1700000000000-abc123def")?;
    let json = serde_json::to_string(&id)?;

    assert_eq!(json, "\"txn-1700000000000-abc123def\"");

    let roundtrip: TransactionId = serde_json::from_str(&json)?;
    assert_eq!(roundtrip, id);

    Ok(())
}

#[test]
fn test_random_suffix_is_lowercase_alphanumeric() {
    let suffix = random_suffix(32);

    assert_eq!(suffix.len(), 32);
    assert!(suffix.bytes().all(|byte| byte.is_ascii_alphanumeric()));
    assert!(!suffix.bytes().any(|byte| byte.is_ascii_uppercase()));
}
