//! # Actions
//!
//! Defines all actions that can be performed on resources.
//! Actions represent the operations users can perform on resources.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on resources.
///
/// Actions represent different levels of access and operations:
/// - **Read**: View/access resource data
/// - **Create**: Create new resource instances
/// - **Update**: Modify existing resource data
/// - **Delete**: Remove resource instances
/// - **Export**: Download/export resource data
/// - **Import**: Upload/import data
/// - **Assign**: Assign ownership of a resource to a user
/// - **Approve**: Approve pending changes
/// - **Execute**: Trigger actions/processes
/// - **Manage**: Administer resource settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view resource.
    Read,

    /// Create new resource.
    Create,

    /// Update existing resource.
    Update,

    /// Delete resource.
    Delete,

    /// Export resource data.
    Export,

    /// Import data into resource.
    Import,

    /// Assign resource ownership to a user.
    Assign,

    /// Approve pending changes.
    Approve,

    /// Execute/trigger actions.
    Execute,

    /// Manage resource settings.
    ///
    /// Grants administrative access to resource configuration.
    Manage,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
            Action::Import => "import",
            Action::Assign => "assign",
            Action::Approve => "approve",
            Action::Execute => "execute",
            Action::Manage => "manage",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("view"), Some(Action::Read)); // Alias
    /// assert_eq!(Action::parse("write"), Some(Action::Update)); // Alias
    /// assert_eq!(Action::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" | "view" | "get" => Some(Action::Read),
            "create" | "add" | "new" => Some(Action::Create),
            "update" | "edit" | "write" | "modify" => Some(Action::Update),
            "delete" | "remove" | "destroy" => Some(Action::Delete),
            "export" | "download" => Some(Action::Export),
            "import" | "upload" => Some(Action::Import),
            "assign" | "reassign" => Some(Action::Assign),
            "approve" | "accept" => Some(Action::Approve),
            "execute" | "run" | "trigger" => Some(Action::Execute),
            "manage" | "admin" | "administer" => Some(Action::Manage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
            Action::Export,
            Action::Import,
            Action::Assign,
            Action::Approve,
            Action::Execute,
            Action::Manage,
        ]
    }

    /// Check if this is a destructive action.
    ///
    /// Destructive actions permanently modify or remove data. Denied
    /// destructive checks are logged at a higher severity.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Action::Delete)
    }

    /// Check if this is a read-only action.
    ///
    /// Read-only actions don't modify resources.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Action::Read | Action::Export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(Action::parse("read"), Some(Action::Read));
        assert_eq!(Action::parse("view"), Some(Action::Read));

        assert_eq!(Action::parse("update"), Some(Action::Update));
        assert_eq!(Action::parse("write"), Some(Action::Update));
        assert_eq!(Action::parse("edit"), Some(Action::Update));

        assert_eq!(Action::parse("delete"), Some(Action::Delete));
        assert_eq!(Action::parse("remove"), Some(Action::Delete));

        assert_eq!(Action::parse("execute"), Some(Action::Execute));
        assert_eq!(Action::parse("run"), Some(Action::Execute));

        assert_eq!(Action::parse("invalid"), None);
    }

    #[test]
    fn test_action_as_str() {
        assert_eq!(Action::Read.as_str(), "read");
        assert_eq!(Action::Assign.as_str(), "assign");
        assert_eq!(Action::Manage.as_str(), "manage");
    }

    #[test]
    fn test_round_trip_as_str_parse() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_is_destructive() {
        assert!(Action::Delete.is_destructive());
        assert!(!Action::Read.is_destructive());
        assert!(!Action::Update.is_destructive());
    }

    #[test]
    fn test_is_read_only() {
        assert!(Action::Read.is_read_only());
        assert!(Action::Export.is_read_only());
        assert!(!Action::Create.is_read_only());
        assert!(!Action::Manage.is_read_only());
    }

    #[test]
    fn test_all_actions_count() {
        assert_eq!(Action::all().len(), 10);
    }
}
