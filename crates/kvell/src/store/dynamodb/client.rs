//! AWS SDK client setup.

use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;
use kvell_core::Ttl;

/// Throughput mode used when the adapter has to create its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCapacity {
    /// Fixed read/write capacity units.
    Provisioned { read: i64, write: i64 },
    /// Pay-per-request billing.
    OnDemand,
}

impl TableCapacity {
    /// Zero units on both sides means on-demand.
    pub fn from_units(read: i64, write: i64) -> Self {
        if read <= 0 && write <= 0 {
            Self::OnDemand
        } else {
            Self::Provisioned { read, write }
        }
    }
}

/// Options for [`DynamoDbStore`](super::DynamoDbStore).
#[derive(Debug, Clone)]
pub struct DynamoDbOptions {
    /// AWS region.
    pub region: String,
    /// Table holding the records; created on first connect if missing.
    pub table_name: String,
    pub capacity: TableCapacity,
    /// Block construction until a freshly created table is ACTIVE.
    pub wait_for_table_creation: bool,
    /// Static credentials. Both must be set, otherwise the default
    /// credential chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint URL (for DynamoDB Local).
    pub endpoint_url: Option<String>,
    pub ttl: Ttl,
}

impl DynamoDbOptions {
    /// Options for `table_name` in `region` with on-demand capacity and no TTL.
    pub fn new(region: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            table_name: table_name.into(),
            capacity: TableCapacity::OnDemand,
            wait_for_table_creation: true,
            access_key_id: None,
            secret_access_key: None,
            endpoint_url: None,
            ttl: Ttl::DISABLED,
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }

    fn static_credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some(
                Credentials::new(id.clone(), secret.clone(), None, None, "kvell"),
            ),
            _ => None,
        }
    }
}

/// Creates a DynamoDB client with the given options.
pub async fn create_client(options: &DynamoDbOptions) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(options.region.clone()));

    if let Some(endpoint) = &options.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    if let Some(credentials) = options.static_credentials() {
        sdk_config_loader = sdk_config_loader.credentials_provider(credentials);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}
