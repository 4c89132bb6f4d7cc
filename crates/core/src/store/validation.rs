use super::{Result, StoreError};

/// Rejects keys no backend can address.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StoreError::Validation("key is empty".to_string()));
    }
    Ok(())
}
