//! Table and TTL provisioning (Imperative Shell).
//!
//! Runs once per store construction: create the table if it is missing, then
//! bring its TTL setting in line with the configured TTL. Both steps only act
//! on a mismatch, so repeated construction leaves the table untouched.

use std::time::Duration;

use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, TimeToLiveSpecification,
};
use aws_sdk_dynamodb::Client;
use kvell_core::{Result, StoreError, Ttl};

use super::client::TableCapacity;
use super::conversions::{KEY_ATTR, TTL_ATTR};
use super::error::{
    map_build_error, map_create_table_error, map_describe_table_error, map_describe_ttl_error,
    map_update_ttl_error,
};
use super::planning::{
    format_ttl_action, plan_ttl_update, should_wait_for_active, ttl_attribute_mismatch,
    TableStatus, TtlAction, TtlState, TtlStatus,
};

const TABLE_ACTIVE_MAX_ATTEMPTS: u32 = 60;
const TABLE_ACTIVE_POLL_DELAY: Duration = Duration::from_secs(2);

/// Ensure the table exists and its TTL matches `ttl`.
pub async fn provision(
    client: &Client,
    table_name: &str,
    capacity: TableCapacity,
    wait_for_table_creation: bool,
    ttl: Ttl,
) -> Result<()> {
    let status = match get_table_status(client, table_name).await? {
        Some(status) => status,
        None => {
            create_table(client, table_name, capacity).await?;
            tracing::info!(table = %table_name, ?capacity, "Created table");
            TableStatus::Creating
        }
    };

    if should_wait_for_active(status, wait_for_table_creation, ttl) {
        wait_for_table_active(client, table_name).await?;
    }

    reconcile_ttl(client, table_name, ttl).await
}

/// Fetches the table status, returns None if the table doesn't exist.
pub async fn get_table_status(client: &Client, table_name: &str) -> Result<Option<TableStatus>> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(response) => {
            let status = match response.table().and_then(|t| t.table_status()) {
                Some(aws_sdk_dynamodb::types::TableStatus::Active) => TableStatus::Active,
                Some(aws_sdk_dynamodb::types::TableStatus::Creating) => TableStatus::Creating,
                Some(aws_sdk_dynamodb::types::TableStatus::Deleting) => TableStatus::Deleting,
                _ => TableStatus::Other,
            };
            Ok(Some(status))
        }
        Err(err) => match err.into_service_error() {
            DescribeTableError::ResourceNotFoundException(_) => Ok(None),
            err => Err(map_describe_table_error(err)),
        },
    }
}

async fn create_table(client: &Client, table_name: &str, capacity: TableCapacity) -> Result<()> {
    let key_schema = KeySchemaElement::builder()
        .attribute_name(KEY_ATTR)
        .key_type(KeyType::Hash)
        .build()
        .map_err(map_build_error)?;

    let attribute_definition = AttributeDefinition::builder()
        .attribute_name(KEY_ATTR)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(map_build_error)?;

    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_schema)
        .attribute_definitions(attribute_definition);

    request = match capacity {
        TableCapacity::Provisioned { read, write } => request
            .billing_mode(BillingMode::Provisioned)
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(read)
                    .write_capacity_units(write)
                    .build()
                    .map_err(map_build_error)?,
            ),
        TableCapacity::OnDemand => request.billing_mode(BillingMode::PayPerRequest),
    };

    request
        .send()
        .await
        .map_err(|e| map_create_table_error(e, table_name))?;
    Ok(())
}

async fn wait_for_table_active(client: &Client, table_name: &str) -> Result<()> {
    for _ in 0..TABLE_ACTIVE_MAX_ATTEMPTS {
        if let Some(TableStatus::Active) = get_table_status(client, table_name).await? {
            return Ok(());
        }
        tokio::time::sleep(TABLE_ACTIVE_POLL_DELAY).await;
    }

    Err(StoreError::Backend(format!(
        "Timeout waiting for table {table_name} to become active"
    )))
}

/// Fetches the table's current TTL configuration.
pub async fn describe_ttl(client: &Client, table_name: &str) -> Result<TtlState> {
    let response = client
        .describe_time_to_live()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| map_describe_ttl_error(e, table_name))?;

    let Some(description) = response.time_to_live_description() else {
        return Ok(TtlState::default());
    };

    let status = match description.time_to_live_status() {
        Some(aws_sdk_dynamodb::types::TimeToLiveStatus::Enabled) => TtlStatus::Enabled,
        Some(aws_sdk_dynamodb::types::TimeToLiveStatus::Enabling) => TtlStatus::Enabling,
        Some(aws_sdk_dynamodb::types::TimeToLiveStatus::Disabling) => TtlStatus::Disabling,
        _ => TtlStatus::Disabled,
    };

    Ok(TtlState {
        attribute_name: description.attribute_name().map(str::to_string),
        status,
    })
}

async fn reconcile_ttl(client: &Client, table_name: &str, ttl: Ttl) -> Result<()> {
    let current = describe_ttl(client, table_name).await?;

    if ttl_attribute_mismatch(&current, ttl, TTL_ATTR) {
        tracing::warn!(
            table = %table_name,
            attribute = ?current.attribute_name,
            expected = TTL_ATTR,
            "Table TTL is bound to a different attribute; records will not expire"
        );
    }

    let action = plan_ttl_update(&current, ttl, TTL_ATTR);
    let (attribute_name, enabled) = match &action {
        TtlAction::Enable { attribute_name } => (attribute_name, true),
        TtlAction::Disable { attribute_name } => (attribute_name, false),
        TtlAction::Keep => {
            tracing::debug!("{}", format_ttl_action(&action, table_name));
            return Ok(());
        }
    };

    update_ttl_setting(client, table_name, attribute_name, enabled).await?;
    tracing::info!("{}", format_ttl_action(&action, table_name));
    Ok(())
}

async fn update_ttl_setting(
    client: &Client,
    table_name: &str,
    attribute_name: &str,
    enabled: bool,
) -> Result<()> {
    let specification = TimeToLiveSpecification::builder()
        .attribute_name(attribute_name)
        .enabled(enabled)
        .build()
        .map_err(map_build_error)?;

    client
        .update_time_to_live()
        .table_name(table_name)
        .time_to_live_specification(specification)
        .send()
        .await
        .map_err(|e| map_update_ttl_error(e, table_name))?;
    Ok(())
}
