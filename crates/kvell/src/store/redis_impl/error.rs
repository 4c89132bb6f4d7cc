//! Redis error mapping to StoreError.

use kvell_core::StoreError;

/// Maps Redis errors to StoreError.
pub fn map_redis_error(err: redis::RedisError) -> StoreError {
    if is_connection_error(&err) {
        StoreError::Backend(format!("Redis connection failed: {err}"))
    } else {
        StoreError::Backend(err.to_string())
    }
}

/// Whether the connection that produced `err` can no longer be trusted.
fn is_connection_error(err: &redis::RedisError) -> bool {
    err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_io_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{ErrorKind, RedisError};

    #[test]
    fn test_io_error_is_connection_error() {
        let err = RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        ));
        assert!(is_connection_error(&err));
        assert!(map_redis_error(err)
            .to_string()
            .starts_with("Backend error: Redis connection failed"));
    }

    #[test]
    fn test_type_error_is_not_connection_error() {
        let err = RedisError::from((ErrorKind::TypeError, "unexpected type"));
        assert!(!is_connection_error(&err));
        assert!(matches!(map_redis_error(err), StoreError::Backend(_)));
    }
}
