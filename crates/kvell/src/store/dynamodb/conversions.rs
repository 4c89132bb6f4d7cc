//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! stored records. These are testable in isolation without DynamoDB access.
//!
//! Item layout: `{ "k": S key, "v": B payload, "unixtime": N expiry }`.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use kvell_core::{ttl, StoreError};

pub const KEY_ATTR: &str = "k";
pub const VALUE_ATTR: &str = "v";
pub const TTL_ATTR: &str = "unixtime";

/// Convert a record to a DynamoDB item.
///
/// The expiry attribute is always written; it is ignored by DynamoDB while
/// TTL is disabled on the table.
pub fn record_to_item(
    key: &str,
    payload: Vec<u8>,
    expires_at: i64,
) -> HashMap<String, AttributeValue> {
    let mut item = key_item(key);
    item.insert(
        VALUE_ATTR.to_string(),
        AttributeValue::B(Blob::new(payload)),
    );
    item.insert(TTL_ATTR.to_string(), expires_at_value(expires_at));
    item
}

/// Primary key map for `key`.
pub fn key_item(key: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([(KEY_ATTR.to_string(), AttributeValue::S(key.to_string()))])
}

/// Number attribute holding an absolute expiry.
pub fn expires_at_value(expires_at: i64) -> AttributeValue {
    AttributeValue::N(expires_at.to_string())
}

/// Extract the stored payload from a fetched item.
///
/// Returns `Ok(None)` when the value attribute is missing, or when
/// `check_expiry` is set and the stored expiry has passed: DynamoDB removes
/// expired items lazily, so they can still be returned for a while.
pub fn item_payload(
    item: &HashMap<String, AttributeValue>,
    check_expiry: bool,
    now: DateTime<Utc>,
) -> Result<Option<Vec<u8>>, StoreError> {
    if check_expiry {
        if let Some(expires_at) = get_expires_at(item)? {
            if ttl::is_expired(expires_at, now) {
                return Ok(None);
            }
        }
    }

    match item.get(VALUE_ATTR) {
        None => Ok(None),
        Some(AttributeValue::B(blob)) => Ok(Some(blob.as_ref().to_vec())),
        Some(AttributeValue::S(text)) => Ok(Some(text.clone().into_bytes())),
        Some(other) => Err(StoreError::Deserialization(format!(
            "Unexpected type for attribute '{}': {:?}",
            VALUE_ATTR, other
        ))),
    }
}

fn get_expires_at(item: &HashMap<String, AttributeValue>) -> Result<Option<i64>, StoreError> {
    match item.get(TTL_ATTR) {
        None => Ok(None),
        Some(AttributeValue::N(n)) => n.parse().map(Some).map_err(|e| {
            StoreError::Deserialization(format!(
                "Invalid number in attribute '{}': {} ({})",
                TTL_ATTR, n, e
            ))
        }),
        Some(other) => Err(StoreError::Deserialization(format!(
            "Unexpected type for attribute '{}': {:?}",
            TTL_ATTR, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_record_to_item_layout() {
        let item = record_to_item("test", b"\"testtesttest\"".to_vec(), 1_718_447_420);

        assert_eq!(item.len(), 3);
        assert_eq!(item.get("k"), Some(&AttributeValue::S("test".to_string())));
        assert_eq!(
            item.get("v"),
            Some(&AttributeValue::B(Blob::new(b"\"testtesttest\"".to_vec())))
        );
        assert_eq!(
            item.get("unixtime"),
            Some(&AttributeValue::N("1718447420".to_string()))
        );
    }

    #[test]
    fn test_key_item_has_only_key() {
        let item = key_item("session:1");
        assert_eq!(item.len(), 1);
        assert_eq!(
            item.get(KEY_ATTR),
            Some(&AttributeValue::S("session:1".to_string()))
        );
    }

    #[test]
    fn test_item_payload_roundtrip() {
        let now = fixed_now();
        let item = record_to_item("test", b"[1,2]".to_vec(), now.timestamp() + 20);

        let payload = item_payload(&item, true, now).unwrap();
        assert_eq!(payload, Some(b"[1,2]".to_vec()));
    }

    #[test]
    fn test_item_payload_missing_value_is_none() {
        let item = key_item("test");
        assert_eq!(item_payload(&item, false, fixed_now()).unwrap(), None);
    }

    #[test]
    fn test_item_payload_expired_is_none_when_checked() {
        let now = fixed_now();
        let item = record_to_item("test", b"1".to_vec(), now.timestamp() - 5);

        assert_eq!(item_payload(&item, true, now).unwrap(), None);
        assert_eq!(
            item_payload(&item, false, now).unwrap(),
            Some(b"1".to_vec())
        );
    }

    #[test]
    fn test_item_payload_accepts_string_value() {
        let mut item = key_item("test");
        item.insert(
            VALUE_ATTR.to_string(),
            AttributeValue::S("\"text\"".to_string()),
        );

        assert_eq!(
            item_payload(&item, false, fixed_now()).unwrap(),
            Some(b"\"text\"".to_vec())
        );
    }

    #[test]
    fn test_item_payload_rejects_other_types() {
        let mut item = key_item("test");
        item.insert(VALUE_ATTR.to_string(), AttributeValue::Bool(true));

        let err = item_payload(&item, false, fixed_now()).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }

    #[test]
    fn test_item_payload_rejects_malformed_expiry() {
        let mut item = record_to_item("test", b"1".to_vec(), 0);
        item.insert(
            TTL_ATTR.to_string(),
            AttributeValue::N("soon".to_string()),
        );

        let err = item_payload(&item, true, fixed_now()).unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }
}
