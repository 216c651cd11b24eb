//! # Resource Types
//!
//! Defines all resource types across the Riskboard platform.
//! Resources are categorized by the module that owns them.

use serde::{Deserialize, Serialize};

use crate::actions::Action;

/// Platform module that owns a resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Core risk-register functionality.
    Core,
    /// Analytics and reporting.
    Analytics,
    /// Marketplace connectors and integrations.
    Marketplace,
    /// Administration and governance.
    Admin,
}

impl Module {
    /// Get the string representation of the module.
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Core => "core",
            Module::Analytics => "analytics",
            Module::Marketplace => "marketplace",
            Module::Admin => "admin",
        }
    }

    /// Parse module from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "core" => Some(Module::Core),
            "analytics" => Some(Module::Analytics),
            "marketplace" => Some(Module::Marketplace),
            "admin" | "administration" => Some(Module::Admin),
            _ => None,
        }
    }
}

/// Resource types that can have permissions assigned.
///
/// Resources are organized by the module that owns them:
/// - **Core**: Risk, Mitigation, Dashboard, CustomField, BulkOperation, Notification
/// - **Analytics**: Analytics, Report
/// - **Marketplace**: Connector
/// - **Admin**: User, Role, Settings, AuditLog, ApiKey
///
/// The string form of a resource is plural (`risks`, `mitigations`, ...)
/// because that is the form permission strings issued by the backend use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    // Core
    /// Risk register entries.
    Risk,
    /// Mitigation plans attached to risks.
    Mitigation,
    /// Dashboards and saved layouts.
    Dashboard,
    /// User-defined custom fields.
    CustomField,
    /// Bulk operations over register entries.
    BulkOperation,
    /// In-app notifications.
    Notification,

    // Analytics
    /// Aggregated analytics views.
    Analytics,
    /// Generated reports.
    Report,

    // Marketplace
    /// Marketplace connectors.
    Connector,

    // Admin
    /// User accounts.
    User,
    /// Roles and role assignments.
    Role,
    /// Organization settings.
    Settings,
    /// Audit log entries.
    AuditLog,
    /// API keys.
    ApiKey,
}

impl ResourceType {
    /// Get the string representation of the resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            // Core
            ResourceType::Risk => "risks",
            ResourceType::Mitigation => "mitigations",
            ResourceType::Dashboard => "dashboards",
            ResourceType::CustomField => "custom_fields",
            ResourceType::BulkOperation => "bulk_operations",
            ResourceType::Notification => "notifications",
            // Analytics
            ResourceType::Analytics => "analytics",
            ResourceType::Report => "reports",
            // Marketplace
            ResourceType::Connector => "connectors",
            // Admin
            ResourceType::User => "users",
            ResourceType::Role => "roles",
            ResourceType::Settings => "settings",
            ResourceType::AuditLog => "audit_logs",
            ResourceType::ApiKey => "api_keys",
        }
    }

    /// Get the module that owns this resource type.
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::resources::{Module, ResourceType};
    ///
    /// assert_eq!(ResourceType::Risk.module(), Module::Core);
    /// assert_eq!(ResourceType::Report.module(), Module::Analytics);
    /// assert_eq!(ResourceType::Connector.module(), Module::Marketplace);
    /// assert_eq!(ResourceType::Role.module(), Module::Admin);
    /// ```
    pub fn module(&self) -> Module {
        match self {
            ResourceType::Risk
            | ResourceType::Mitigation
            | ResourceType::Dashboard
            | ResourceType::CustomField
            | ResourceType::BulkOperation
            | ResourceType::Notification => Module::Core,
            ResourceType::Analytics | ResourceType::Report => Module::Analytics,
            ResourceType::Connector => Module::Marketplace,
            ResourceType::User
            | ResourceType::Role
            | ResourceType::Settings
            | ResourceType::AuditLog
            | ResourceType::ApiKey => Module::Admin,
        }
    }

    /// Parse resource type from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, singular and plural forms)
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::resources::ResourceType;
    ///
    /// assert_eq!(ResourceType::parse("risks"), Some(ResourceType::Risk));
    /// assert_eq!(ResourceType::parse("risk"), Some(ResourceType::Risk));
    /// assert_eq!(ResourceType::parse("custom_fields"), Some(ResourceType::CustomField));
    /// assert_eq!(ResourceType::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            // Core
            "risk" | "risks" => Some(ResourceType::Risk),
            "mitigation" | "mitigations" => Some(ResourceType::Mitigation),
            "dashboard" | "dashboards" => Some(ResourceType::Dashboard),
            "custom_field" | "custom_fields" | "customfield" | "customfields" => {
                Some(ResourceType::CustomField)
            }
            "bulk_operation" | "bulk_operations" | "bulkoperation" | "bulkoperations" | "bulk" => {
                Some(ResourceType::BulkOperation)
            }
            "notification" | "notifications" => Some(ResourceType::Notification),
            // Analytics
            "analytics" => Some(ResourceType::Analytics),
            "report" | "reports" => Some(ResourceType::Report),
            // Marketplace
            "connector" | "connectors" | "integration" | "integrations" => {
                Some(ResourceType::Connector)
            }
            // Admin
            "user" | "users" => Some(ResourceType::User),
            "role" | "roles" => Some(ResourceType::Role),
            "settings" | "setting" => Some(ResourceType::Settings),
            "audit_log" | "audit_logs" | "auditlog" | "auditlogs" => Some(ResourceType::AuditLog),
            "api_key" | "api_keys" | "apikey" | "apikeys" => Some(ResourceType::ApiKey),
            _ => None,
        }
    }

    /// Get all resource types.
    pub fn all() -> Vec<Self> {
        vec![
            // Core
            ResourceType::Risk,
            ResourceType::Mitigation,
            ResourceType::Dashboard,
            ResourceType::CustomField,
            ResourceType::BulkOperation,
            ResourceType::Notification,
            // Analytics
            ResourceType::Analytics,
            ResourceType::Report,
            // Marketplace
            ResourceType::Connector,
            // Admin
            ResourceType::User,
            ResourceType::Role,
            ResourceType::Settings,
            ResourceType::AuditLog,
            ResourceType::ApiKey,
        ]
    }

    /// Get all resource types for a specific module.
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::resources::{Module, ResourceType};
    ///
    /// let core = ResourceType::for_module(Module::Core);
    /// assert!(core.contains(&ResourceType::Risk));
    /// assert!(core.contains(&ResourceType::Mitigation));
    /// ```
    pub fn for_module(module: Module) -> Vec<Self> {
        Self::all()
            .into_iter()
            .filter(|r| r.module() == module)
            .collect()
    }

    /// Get the actions that exist for this resource type.
    ///
    /// This is the catalog used by
    /// [`PermissionEvaluator::available_actions`](crate::evaluator::PermissionEvaluator::available_actions):
    /// it lists the operations the UI exposes for a resource, not what any
    /// particular user may do.
    pub fn actions(&self) -> &'static [Action] {
        match self {
            ResourceType::Risk => &[
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::Assign,
                Action::Approve,
                Action::Export,
                Action::Import,
            ],
            ResourceType::Mitigation => &[
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::Assign,
                Action::Approve,
            ],
            ResourceType::Dashboard => &[
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::Export,
            ],
            ResourceType::CustomField => &[
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::Manage,
            ],
            ResourceType::BulkOperation => &[Action::Execute, Action::Approve],
            ResourceType::Notification => &[Action::Read, Action::Update],
            ResourceType::Analytics => &[Action::Read, Action::Export],
            ResourceType::Report => &[Action::Read, Action::Create, Action::Export],
            ResourceType::Connector => &[Action::Read, Action::Execute, Action::Manage],
            ResourceType::User => &[
                Action::Read,
                Action::Create,
                Action::Update,
                Action::Delete,
                Action::Manage,
            ],
            ResourceType::Role => &[Action::Read, Action::Manage],
            ResourceType::Settings => &[Action::Read, Action::Update, Action::Manage],
            ResourceType::AuditLog => &[Action::Read, Action::Export],
            ResourceType::ApiKey => &[Action::Read, Action::Create, Action::Delete, Action::Manage],
        }
    }
}
