//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `StoreError` from `kvell_core`. Backend failures are
//! passed through as `StoreError::Backend` with the service error's text; the
//! callers decide which specific service errors carry meaning.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::describe_time_to_live::DescribeTimeToLiveError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::operation::update_time_to_live::UpdateTimeToLiveError;
use kvell_core::StoreError;

fn backend(message: impl Into<String>) -> StoreError {
    StoreError::Backend(message.into())
}

/// Map a DescribeTable service error (other than a missing table) to StoreError.
pub fn map_describe_table_error(err: DescribeTableError) -> StoreError {
    match err {
        DescribeTableError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("DescribeTable failed: {:?}", err)),
    }
}

/// Map a CreateTable SDK error to StoreError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            backend(format!("Table {table_name} is already being created"))
        }
        CreateTableError::LimitExceededException(_) => {
            backend("Table operation limit exceeded, please retry")
        }
        CreateTableError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("CreateTable failed: {:?}", err)),
    }
}

/// Map a DescribeTimeToLive SDK error to StoreError.
pub fn map_describe_ttl_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTimeToLiveError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        DescribeTimeToLiveError::ResourceNotFoundException(_) => StoreError::NotFound {
            resource: "table",
            name: table_name.to_string(),
        },
        DescribeTimeToLiveError::InternalServerError(_) => {
            backend("DynamoDB internal server error")
        }
        err => backend(format!("DescribeTimeToLive failed: {:?}", err)),
    }
}

/// Map an UpdateTimeToLive SDK error to StoreError.
pub fn map_update_ttl_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateTimeToLiveError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        UpdateTimeToLiveError::ResourceNotFoundException(_) => StoreError::NotFound {
            resource: "table",
            name: table_name.to_string(),
        },
        UpdateTimeToLiveError::ResourceInUseException(_) => {
            backend(format!("Table {table_name} is busy, TTL cannot be changed yet"))
        }
        UpdateTimeToLiveError::LimitExceededException(_) => {
            backend("Table operation limit exceeded, please retry")
        }
        UpdateTimeToLiveError::InternalServerError(_) => {
            backend("DynamoDB internal server error")
        }
        err => backend(format!("UpdateTimeToLive failed: {:?}", err)),
    }
}

/// Map a GetItem SDK error to StoreError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => backend("Table not found"),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            backend("Throughput exceeded, please retry")
        }
        GetItemError::RequestLimitExceeded(_) => backend("Request limit exceeded, please retry"),
        GetItemError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to StoreError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => backend("Table not found"),
        PutItemError::ProvisionedThroughputExceededException(_) => {
            backend("Throughput exceeded, please retry")
        }
        PutItemError::RequestLimitExceeded(_) => backend("Request limit exceeded, please retry"),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            backend("Item collection size limit exceeded")
        }
        PutItemError::TransactionConflictException(_) => {
            backend("Transaction conflict, please retry")
        }
        PutItemError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("PutItem failed: {:?}", err)),
    }
}

/// Outcome of a conditional TTL refresh.
#[derive(Debug)]
pub enum UpdateItemFailure {
    /// `attribute_exists(k)` did not hold: the key is absent.
    KeyAbsent,
    Other(StoreError),
}

/// Map an UpdateItem SDK error, separating the failed existence condition.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> UpdateItemFailure {
    let err = match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            return UpdateItemFailure::KeyAbsent;
        }
        UpdateItemError::ResourceNotFoundException(_) => backend("Table not found"),
        UpdateItemError::ProvisionedThroughputExceededException(_) => {
            backend("Throughput exceeded, please retry")
        }
        UpdateItemError::RequestLimitExceeded(_) => {
            backend("Request limit exceeded, please retry")
        }
        UpdateItemError::TransactionConflictException(_) => {
            backend("Transaction conflict, please retry")
        }
        UpdateItemError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("UpdateItem failed: {:?}", err)),
    };
    UpdateItemFailure::Other(err)
}

/// Map a DeleteItem SDK error to StoreError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> StoreError {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => backend("Table not found"),
        DeleteItemError::ProvisionedThroughputExceededException(_) => {
            backend("Throughput exceeded, please retry")
        }
        DeleteItemError::RequestLimitExceeded(_) => {
            backend("Request limit exceeded, please retry")
        }
        DeleteItemError::TransactionConflictException(_) => {
            backend("Transaction conflict, please retry")
        }
        DeleteItemError::InternalServerError(_) => backend("DynamoDB internal server error"),
        err => backend(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a request builder failure to StoreError.
pub fn map_build_error(err: impl std::fmt::Display) -> StoreError {
    backend(format!("Invalid DynamoDB request: {err}"))
}
