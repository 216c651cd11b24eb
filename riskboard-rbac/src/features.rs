//! # Feature Flags
//!
//! The catalog of gated UI features and the permissions each one requires.
//! A feature is enabled for a user when they hold *any* of its required
//! permissions.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::permissions::Permission;
use crate::resources::ResourceType;

/// Client features gated behind permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// The risk register grid.
    RiskRegister,
    /// Mitigation planning views.
    MitigationPlanning,
    /// Dashboards and saved layouts.
    Dashboards,
    /// Report generation.
    Reporting,
    /// Advanced analytics views.
    AdvancedAnalytics,
    /// Marketplace connector browsing.
    Marketplace,
    /// Bulk operations over register entries.
    BulkOperations,
    /// Custom field configuration.
    CustomFields,
    /// Role management screens.
    RoleManagement,
    /// User management screens.
    UserManagement,
    /// Audit log viewer.
    AuditLog,
}

impl Feature {
    /// Get the feature-flag name used by the client.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::RiskRegister => "risk-register",
            Feature::MitigationPlanning => "mitigation-planning",
            Feature::Dashboards => "dashboards",
            Feature::Reporting => "reporting",
            Feature::AdvancedAnalytics => "advanced-analytics",
            Feature::Marketplace => "marketplace",
            Feature::BulkOperations => "bulk-operations",
            Feature::CustomFields => "custom-fields",
            Feature::RoleManagement => "role-management",
            Feature::UserManagement => "user-management",
            Feature::AuditLog => "audit-log",
        }
    }

    /// Parse a feature-flag name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "risk-register" => Some(Feature::RiskRegister),
            "mitigation-planning" => Some(Feature::MitigationPlanning),
            "dashboards" => Some(Feature::Dashboards),
            "reporting" => Some(Feature::Reporting),
            "advanced-analytics" => Some(Feature::AdvancedAnalytics),
            "marketplace" => Some(Feature::Marketplace),
            "bulk-operations" => Some(Feature::BulkOperations),
            "custom-fields" => Some(Feature::CustomFields),
            "role-management" => Some(Feature::RoleManagement),
            "user-management" => Some(Feature::UserManagement),
            "audit-log" => Some(Feature::AuditLog),
            _ => None,
        }
    }

    /// Get all features.
    pub fn all() -> Vec<Self> {
        vec![
            Feature::RiskRegister,
            Feature::MitigationPlanning,
            Feature::Dashboards,
            Feature::Reporting,
            Feature::AdvancedAnalytics,
            Feature::Marketplace,
            Feature::BulkOperations,
            Feature::CustomFields,
            Feature::RoleManagement,
            Feature::UserManagement,
            Feature::AuditLog,
        ]
    }

    /// The permissions that unlock this feature.
    ///
    /// Holding any one of them enables the feature.
    pub fn required_permissions(&self) -> Vec<Permission> {
        match self {
            Feature::RiskRegister => vec![Permission::new(ResourceType::Risk, Action::Read)],
            Feature::MitigationPlanning => {
                vec![Permission::new(ResourceType::Mitigation, Action::Read)]
            }
            Feature::Dashboards => vec![Permission::new(ResourceType::Dashboard, Action::Read)],
            Feature::Reporting => vec![Permission::new(ResourceType::Report, Action::Read)],
            Feature::AdvancedAnalytics => {
                vec![Permission::new(ResourceType::Analytics, Action::Read)]
            }
            Feature::Marketplace => vec![Permission::new(ResourceType::Connector, Action::Read)],
            Feature::BulkOperations => {
                vec![Permission::new(ResourceType::BulkOperation, Action::Execute)]
            }
            Feature::CustomFields => vec![Permission::new(ResourceType::CustomField, Action::Read)],
            Feature::RoleManagement => vec![Permission::new(ResourceType::Role, Action::Manage)],
            Feature::UserManagement => vec![Permission::new(ResourceType::User, Action::Manage)],
            Feature::AuditLog => vec![Permission::new(ResourceType::AuditLog, Action::Read)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_parse() {
        assert_eq!(Feature::parse("role-management"), Some(Feature::RoleManagement));
        assert_eq!(Feature::parse("Risk-Register"), Some(Feature::RiskRegister));
        assert_eq!(Feature::parse("unknown-feature"), None);
    }

    #[test]
    fn test_round_trip_as_str_parse() {
        for feature in Feature::all() {
            assert_eq!(Feature::parse(feature.as_str()), Some(feature));
        }
    }

    #[test]
    fn test_required_permissions() {
        let perms = Feature::RoleManagement.required_permissions();
        assert_eq!(perms, vec![Permission::new(ResourceType::Role, Action::Manage)]);

        // Every feature is gated behind at least one permission.
        for feature in Feature::all() {
            assert!(!feature.required_permissions().is_empty());
        }
    }
}
