//! DynamoDB store implementation.
//!
//! Implements the `Store` trait from `kvell_core` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use chrono::Utc;
use kvell_core::store::validate_key;
use kvell_core::{Result, Store, StoreError, Ttl};

use super::client::{create_client, DynamoDbOptions};
use super::conversions::{
    expires_at_value, item_payload, key_item, record_to_item, KEY_ATTR, TTL_ATTR,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_update_item_error,
    UpdateItemFailure,
};
use super::planning::table_health;
use super::provisioning::{get_table_status, provision};

/// DynamoDB-backed store.
///
/// The SDK client is cheap to clone and safe to share, so a single store can
/// serve concurrent callers. Writes to the same key are last-writer-wins.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
    ttl: Ttl,
}

impl DynamoDbStore {
    /// Connects to DynamoDB and provisions the table described by `options`.
    ///
    /// Creates the table if it does not exist and enables or disables TTL on
    /// it to match `options.ttl`. Running this repeatedly against the same
    /// table and TTL is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an empty table name, or any error
    /// raised while provisioning.
    pub async fn connect(options: DynamoDbOptions) -> Result<Self> {
        if options.table_name.is_empty() {
            return Err(StoreError::Validation("table name is empty".to_string()));
        }

        tracing::debug!(
            table = %options.table_name,
            target = %options.target_display(),
            "Connecting to DynamoDB"
        );

        let client = create_client(&options).await;
        provision(
            &client,
            &options.table_name,
            options.capacity,
            options.wait_for_table_creation,
            options.ttl,
        )
        .await?;

        Ok(Self::new(client, options.table_name, options.ttl))
    }

    /// Wraps an existing client without provisioning anything.
    pub fn new(client: Client, table_name: impl Into<String>, ttl: Ttl) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            ttl,
        }
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn ttl(&self) -> Ttl {
        self.ttl
    }
}

#[async_trait]
impl Store for DynamoDbStore {
    async fn health(&self) -> Result<()> {
        let status = get_table_status(&self.client, &self.table_name).await?;
        table_health(status, &self.table_name)
    }

    async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<()> {
        validate_key(key)?;
        let item = record_to_item(key, value, self.ttl.expires_at(Utc::now()));

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(map_put_item_error)?;

        tracing::debug!(table = %self.table_name, key = %key, "Put item");
        Ok(())
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key_item(key)))
            .send()
            .await
            .map_err(map_get_item_error)?;

        match result.item {
            Some(item) => item_payload(&item, self.ttl.is_enabled(), Utc::now()),
            None => Ok(None),
        }
    }

    async fn update_ttl(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if !self.ttl.is_enabled() {
            return Ok(());
        }

        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key_item(key)))
            .update_expression("SET #t = :t")
            .condition_expression("attribute_exists(#k)")
            .expression_attribute_names("#t", TTL_ATTR)
            .expression_attribute_names("#k", KEY_ATTR)
            .expression_attribute_values(":t", expires_at_value(self.ttl.expires_at(Utc::now())))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => match map_update_item_error(err) {
                UpdateItemFailure::KeyAbsent => {
                    tracing::debug!(table = %self.table_name, key = %key, "TTL refresh skipped, key absent");
                    Ok(())
                }
                UpdateItemFailure::Other(err) => Err(err),
            },
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key_item(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // The SDK client holds no resources that need explicit release.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::dynamodb::client::TableCapacity;
    use crate::store::dynamodb::provisioning::describe_ttl;
    use crate::store::dynamodb::planning::TtlStatus;
    use kvell_core::StoreExt;
    use uuid::Uuid;

    /// DynamoDB Local endpoint, e.g. `http://localhost:8000`.
    fn test_endpoint() -> Option<String> {
        std::env::var("KVELL_TEST_DYNAMODB_ENDPOINT").ok()
    }

    fn test_options(table_name: &str, ttl: Ttl) -> Option<DynamoDbOptions> {
        let endpoint = test_endpoint()?;
        let mut options = DynamoDbOptions::new("us-west-2", table_name);
        options.capacity = TableCapacity::Provisioned { read: 1, write: 1 };
        options.access_key_id = Some("dummy".to_string());
        options.secret_access_key = Some("fake".to_string());
        options.endpoint_url = Some(endpoint);
        options.ttl = ttl;
        Some(options)
    }

    /// Skip test if DynamoDB Local is not configured.
    async fn get_test_store(ttl: Ttl) -> Option<DynamoDbStore> {
        let options = test_options("kvell_test", ttl)?;
        Some(DynamoDbStore::connect(options).await.unwrap())
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        format!("test:dynamodb_store:{}:{}", Uuid::new_v4(), suffix)
    }

    #[tokio::test]
    async fn test_connect_rejects_empty_table_name() {
        let options = DynamoDbOptions::new("us-west-2", "");
        let err = DynamoDbStore::connect(options).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_dynamodb_roundtrip() {
        let Some(store) = get_test_store(Ttl::from_secs(20)).await else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let key = test_key("roundtrip");
        store.set(&key, "testtesttest").await.unwrap();

        let value: Option<String> = store.get(&key).await.unwrap();
        assert_eq!(value.as_deref(), Some("testtesttest"));

        store.delete(&key).await.unwrap();
        let value: Option<String> = store.get(&key).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_dynamodb_delete_absent_key() {
        let Some(store) = get_test_store(Ttl::from_secs(20)).await else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        store.delete(&test_key("absent")).await.unwrap();
    }

    #[tokio::test]
    async fn test_dynamodb_update_ttl_does_not_create_items() {
        let Some(store) = get_test_store(Ttl::from_secs(20)).await else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let key = test_key("touch_absent");
        store.update_ttl(&key).await.unwrap();

        let raw = store
            .client
            .get_item()
            .table_name(store.table_name())
            .set_key(Some(key_item(&key)))
            .send()
            .await
            .unwrap();
        assert!(raw.item.is_none());
    }

    #[tokio::test]
    async fn test_dynamodb_update_ttl_existing_key() {
        let Some(store) = get_test_store(Ttl::from_secs(20)).await else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let key = test_key("touch");
        store.set(&key, &vec![1, 2, 3]).await.unwrap();
        store.update_ttl(&key).await.unwrap();

        let value: Option<Vec<i32>> = store.get(&key).await.unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));

        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_dynamodb_malformed_payload() {
        let Some(store) = get_test_store(Ttl::from_secs(20)).await else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let key = test_key("malformed");
        store.set_bytes(&key, b"{oops".to_vec()).await.unwrap();

        let err = store.get::<String>(&key).await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));

        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_dynamodb_provisioning_is_idempotent() {
        let table_name = format!("kvell_test_{}", Uuid::new_v4().simple());
        let Some(options) = test_options(&table_name, Ttl::from_secs(20)) else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let first = DynamoDbStore::connect(options.clone()).await.unwrap();
        let before = describe_ttl(&first.client, &table_name).await.unwrap();

        let second = DynamoDbStore::connect(options).await.unwrap();
        let after = describe_ttl(&second.client, &table_name).await.unwrap();

        assert_eq!(before, after);
        assert_eq!(after.status, TtlStatus::Enabled);
        second.health().await.unwrap();

        first.client.delete_table().table_name(&table_name).send().await.unwrap();
    }

    #[tokio::test]
    async fn test_dynamodb_fresh_table_with_ttl_without_waiting() {
        let table_name = format!("kvell_test_{}", Uuid::new_v4().simple());
        let Some(mut options) = test_options(&table_name, Ttl::from_secs(20)) else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };
        options.wait_for_table_creation = false;

        let store = DynamoDbStore::connect(options).await.unwrap();
        let state = describe_ttl(&store.client, &table_name).await.unwrap();
        assert!(state.status.is_enabled());

        store.client.delete_table().table_name(&table_name).send().await.unwrap();
    }

    #[tokio::test]
    async fn test_dynamodb_health_missing_table() {
        let Some(options) = test_options("kvell_test_missing", Ttl::DISABLED) else {
            eprintln!("Skipping test: DynamoDB Local not configured");
            return;
        };

        let client = create_client(&options).await;
        let store = DynamoDbStore::new(client, "kvell_test_missing", Ttl::DISABLED);

        let err = store.health().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "table", .. }));
    }

    /// A store whose client points at a closed local port.
    async fn unreachable_store(ttl: Ttl) -> DynamoDbStore {
        let mut options = DynamoDbOptions::new("us-west-2", "unused");
        options.endpoint_url = Some("http://127.0.0.1:1".to_string());
        options.access_key_id = Some("dummy".to_string());
        options.secret_access_key = Some("fake".to_string());
        let client = create_client(&options).await;
        DynamoDbStore::new(client, "unused", ttl)
    }

    #[tokio::test]
    async fn test_empty_key_rejected_before_backend() {
        let store = unreachable_store(Ttl::from_secs(20)).await;

        // Any request would fail with Backend; Validation proves none was sent.
        let err = store.set("", "value").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store.set_bytes("", b"1".to_vec()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store.get_bytes("").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store.update_ttl("").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = store.delete("").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_ttl_disabled_is_noop() {
        // No endpoint is ever contacted: the client points nowhere.
        let options = DynamoDbOptions::new("us-west-2", "unused");
        let client = create_client(&options).await;
        let store = DynamoDbStore::new(client, "unused", Ttl::DISABLED);

        store.update_ttl("any").await.unwrap();
    }
}
