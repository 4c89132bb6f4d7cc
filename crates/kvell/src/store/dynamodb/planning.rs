//! Pure functions for deciding provisioning changes.
//!
//! The SDK calls in `provisioning` fetch current state and apply whatever the
//! functions here decide, which keeps the decisions testable without AWS.

use kvell_core::{Result, StoreError, Ttl};

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Deleting,
    /// Updating, archiving and other states in which the table still serves requests.
    Other,
}

/// Pure function: decide whether provisioning blocks until the table is ACTIVE.
///
/// A CREATING table rejects `UpdateTimeToLive`, so a wait is forced whenever
/// expiry has to be switched on, even if the caller opted out of waiting.
pub fn should_wait_for_active(status: TableStatus, wait_requested: bool, desired: Ttl) -> bool {
    status == TableStatus::Creating && (wait_requested || desired.is_enabled())
}

/// Pure function: map a table status lookup to the health check result.
pub fn table_health(status: Option<TableStatus>, table_name: &str) -> Result<()> {
    match status {
        None => Err(StoreError::NotFound {
            resource: "table",
            name: table_name.to_string(),
        }),
        Some(TableStatus::Deleting) => Err(StoreError::Backend(format!(
            "Table {table_name} is being deleted"
        ))),
        Some(TableStatus::Active | TableStatus::Creating | TableStatus::Other) => Ok(()),
    }
}

/// TTL status of a table as reported by DescribeTimeToLive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    Enabled,
    Enabling,
    Disabled,
    Disabling,
}

impl TtlStatus {
    /// Whether expiry is on or on its way there.
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled | Self::Enabling)
    }
}

/// Current TTL configuration of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlState {
    pub attribute_name: Option<String>,
    pub status: TtlStatus,
}

impl Default for TtlState {
    fn default() -> Self {
        Self {
            attribute_name: None,
            status: TtlStatus::Disabled,
        }
    }
}

/// Change to apply to a table's TTL configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtlAction {
    Enable { attribute_name: String },
    Disable { attribute_name: String },
    Keep,
}

/// Pure function: decide how to reconcile the table's TTL with the store's.
///
/// Enabling/disabling transitions count as their target state so that a
/// second construction during a transition does not issue a conflicting
/// update. Disabling must name the attribute TTL is currently bound to.
pub fn plan_ttl_update(current: &TtlState, desired: Ttl, attribute_name: &str) -> TtlAction {
    match (desired.is_enabled(), current.status.is_enabled()) {
        (true, false) => TtlAction::Enable {
            attribute_name: attribute_name.to_string(),
        },
        (false, true) => TtlAction::Disable {
            attribute_name: current
                .attribute_name
                .clone()
                .unwrap_or_else(|| attribute_name.to_string()),
        },
        _ => TtlAction::Keep,
    }
}

/// Whether TTL is bound to an attribute other than the one the store writes
/// while the store expects its records to expire.
pub fn ttl_attribute_mismatch(current: &TtlState, desired: Ttl, attribute_name: &str) -> bool {
    desired.is_enabled()
        && current.status.is_enabled()
        && current
            .attribute_name
            .as_deref()
            .is_some_and(|name| name != attribute_name)
}

/// Pure function: Format a TTL action for logging.
pub fn format_ttl_action(action: &TtlAction, table_name: &str) -> String {
    match action {
        TtlAction::Enable { attribute_name } => {
            format!("+ Enable TTL on '{}' for table {}", attribute_name, table_name)
        }
        TtlAction::Disable { attribute_name } => {
            format!("- Disable TTL on '{}' for table {}", attribute_name, table_name)
        }
        TtlAction::Keep => format!("= TTL on table '{}' is up to date", table_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: TtlStatus, attribute: Option<&str>) -> TtlState {
        TtlState {
            attribute_name: attribute.map(str::to_string),
            status,
        }
    }

    #[test]
    fn test_enable_when_desired_and_disabled() {
        let action = plan_ttl_update(&TtlState::default(), Ttl::from_secs(20), "unixtime");
        assert_eq!(
            action,
            TtlAction::Enable {
                attribute_name: "unixtime".to_string()
            }
        );
    }

    #[test]
    fn test_keep_when_desired_and_enabled() {
        let current = state(TtlStatus::Enabled, Some("unixtime"));
        assert_eq!(
            plan_ttl_update(&current, Ttl::from_secs(20), "unixtime"),
            TtlAction::Keep
        );
    }

    #[test]
    fn test_keep_while_enabling() {
        let current = state(TtlStatus::Enabling, Some("unixtime"));
        assert_eq!(
            plan_ttl_update(&current, Ttl::from_secs(20), "unixtime"),
            TtlAction::Keep
        );
    }

    #[test]
    fn test_disable_when_not_desired_and_enabled() {
        let current = state(TtlStatus::Enabled, Some("expires"));
        assert_eq!(
            plan_ttl_update(&current, Ttl::DISABLED, "unixtime"),
            TtlAction::Disable {
                attribute_name: "expires".to_string()
            }
        );
    }

    #[test]
    fn test_disable_falls_back_to_store_attribute() {
        let current = state(TtlStatus::Enabling, None);
        assert_eq!(
            plan_ttl_update(&current, Ttl::DISABLED, "unixtime"),
            TtlAction::Disable {
                attribute_name: "unixtime".to_string()
            }
        );
    }

    #[test]
    fn test_keep_when_not_desired_and_disabled() {
        assert_eq!(
            plan_ttl_update(&TtlState::default(), Ttl::DISABLED, "unixtime"),
            TtlAction::Keep
        );
        let disabling = state(TtlStatus::Disabling, Some("unixtime"));
        assert_eq!(
            plan_ttl_update(&disabling, Ttl::DISABLED, "unixtime"),
            TtlAction::Keep
        );
    }

    #[test]
    fn test_plan_is_idempotent_after_apply() {
        let desired = Ttl::from_secs(20);
        let action = plan_ttl_update(&TtlState::default(), desired, "unixtime");
        let TtlAction::Enable { attribute_name } = action else {
            panic!("expected enable");
        };

        let applied = state(TtlStatus::Enabled, Some(&attribute_name));
        assert_eq!(
            plan_ttl_update(&applied, desired, "unixtime"),
            TtlAction::Keep
        );
    }

    #[test]
    fn test_attribute_mismatch() {
        assert!(ttl_attribute_mismatch(
            &state(TtlStatus::Enabled, Some("expires")),
            Ttl::from_secs(20),
            "unixtime"
        ));
        assert!(!ttl_attribute_mismatch(
            &state(TtlStatus::Enabled, Some("unixtime")),
            Ttl::from_secs(20),
            "unixtime"
        ));
        assert!(!ttl_attribute_mismatch(
            &state(TtlStatus::Disabled, Some("expires")),
            Ttl::from_secs(20),
            "unixtime"
        ));
    }

    #[test]
    fn test_no_mismatch_when_expiry_not_wanted() {
        // The table is about to be disabled; the foreign attribute is irrelevant.
        assert!(!ttl_attribute_mismatch(
            &state(TtlStatus::Enabled, Some("expires")),
            Ttl::DISABLED,
            "unixtime"
        ));
    }

    #[test]
    fn test_creating_table_waits_before_enabling_ttl() {
        assert!(should_wait_for_active(
            TableStatus::Creating,
            false,
            Ttl::from_secs(20)
        ));
        assert!(should_wait_for_active(
            TableStatus::Creating,
            true,
            Ttl::DISABLED
        ));
        assert!(!should_wait_for_active(
            TableStatus::Creating,
            false,
            Ttl::DISABLED
        ));
    }

    #[test]
    fn test_ready_tables_never_wait() {
        for status in [TableStatus::Active, TableStatus::Other, TableStatus::Deleting] {
            assert!(!should_wait_for_active(status, true, Ttl::from_secs(20)));
        }
    }

    #[test]
    fn test_table_health() {
        assert!(table_health(Some(TableStatus::Active), "t").is_ok());
        assert!(table_health(Some(TableStatus::Creating), "t").is_ok());
        assert!(table_health(Some(TableStatus::Other), "t").is_ok());
        assert_eq!(
            table_health(None, "t").unwrap_err(),
            StoreError::NotFound {
                resource: "table",
                name: "t".to_string()
            }
        );
        assert_eq!(
            table_health(Some(TableStatus::Deleting), "t").unwrap_err(),
            StoreError::Backend("Table t is being deleted".to_string())
        );
    }

    #[test]
    fn test_format_ttl_action() {
        assert_eq!(
            format_ttl_action(
                &TtlAction::Enable {
                    attribute_name: "unixtime".to_string()
                },
                "test"
            ),
            "+ Enable TTL on 'unixtime' for table test"
        );
        assert_eq!(
            format_ttl_action(&TtlAction::Keep, "test"),
            "= TTL on table 'test' is up to date"
        );
    }
}
