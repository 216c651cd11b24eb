//! Role templates
//!
//! This module defines the built-in role template catalog: a process-wide,
//! read-only set of leveled permission bundles that role assignment and the
//! custom-role builder start from.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use riskboard_rbac::{Action, Feature, Permission, PermissionSet, ResourceType};

/// A named, leveled, immutable bundle of default permissions and features.
///
/// Templates are defined once at process start and never mutated; "custom
/// roles" are new values derived from a template, never edits of the
/// template itself. `level` orders roles weakest to strongest and backs
/// coarse hierarchy checks ([`RoleTemplate::outranks`]); it grants nothing
/// by itself.
///
/// # Examples
///
/// ```
/// use riskboard_roles::RoleTemplate;
///
/// let viewer = RoleTemplate::find("viewer").unwrap();
/// assert_eq!(viewer.level, 0);
/// assert!(viewer.permissions.grants(&"dashboards:read".parse().unwrap()));
/// assert!(!viewer.permissions.grants(&"risks:delete".parse().unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    /// Unique template name.
    pub name: String,

    /// Hierarchy level, 0 (weakest) to 9 (strongest).
    pub level: u8,

    /// Human-readable description.
    pub description: String,

    /// Default permissions granted by this role.
    pub permissions: PermissionSet,

    /// Feature flags enabled for this role.
    pub features: BTreeSet<String>,
}

impl RoleTemplate {
    /// Look up a built-in template by name.
    ///
    /// Lookup is case-insensitive and tolerates `-`/`_` in place of spaces
    /// (`"RISK_MANAGER"` finds "Risk Manager"). Returns an owned clone:
    /// the catalog itself cannot be reached, let alone mutated, through the
    /// returned value.
    ///
    /// # Examples
    ///
    /// ```
    /// use riskboard_roles::RoleTemplate;
    ///
    /// assert!(RoleTemplate::find("VIEWER").is_some());
    /// assert!(RoleTemplate::find("risk_manager").is_some());
    /// assert!(RoleTemplate::find("superuser").is_none());
    /// ```
    pub fn find(name: &str) -> Option<RoleTemplate> {
        let needle = normalize(name);
        catalog()
            .iter()
            .find(|t| normalize(&t.name) == needle)
            .cloned()
    }

    /// Look up a built-in template by level.
    pub fn by_level(level: u8) -> Option<RoleTemplate> {
        catalog().iter().find(|t| t.level == level).cloned()
    }

    /// All built-in templates, ordered weakest to strongest.
    pub fn builtin() -> Vec<RoleTemplate> {
        catalog().to_vec()
    }

    /// The lowest-privilege built-in template (Viewer).
    pub fn lowest() -> RoleTemplate {
        catalog()
            .first()
            .cloned()
            .expect("built-in template catalog is never empty")
    }

    /// Check if this role sits strictly above another in the hierarchy.
    ///
    /// This is the coarse "can a holder of this role modify that one"
    /// comparison; fine-grained decisions go through permissions.
    pub fn outranks(&self, other: &RoleTemplate) -> bool {
        self.level > other.level
    }

    /// Check if this template enables a feature flag.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', '_'], " ")
}

fn feature_names<I: IntoIterator<Item = Feature>>(features: I) -> BTreeSet<String> {
    features
        .into_iter()
        .map(|f| f.as_str().to_string())
        .collect()
}

/// The built-in catalog. Levels 0/3/6/9 are the canonical role scale for
/// the whole platform; nothing else defines role levels.
fn catalog() -> &'static [RoleTemplate] {
    static CATALOG: OnceLock<Vec<RoleTemplate>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let viewer = RoleTemplate {
            name: "Viewer".to_string(),
            level: 0,
            description: "Read-only access to the risk register, dashboards, and reports"
                .to_string(),
            permissions: [
                Permission::new(ResourceType::Risk, Action::Read),
                Permission::new(ResourceType::Mitigation, Action::Read),
                Permission::new(ResourceType::Dashboard, Action::Read),
                Permission::new(ResourceType::Report, Action::Read),
                Permission::new(ResourceType::Analytics, Action::Read),
            ]
            .into_iter()
            .collect(),
            features: feature_names([
                Feature::RiskRegister,
                Feature::MitigationPlanning,
                Feature::Dashboards,
                Feature::Reporting,
            ]),
        };

        let mut analyst_permissions = viewer.permissions.clone();
        analyst_permissions.add_all([
            Permission::new(ResourceType::Risk, Action::Create),
            Permission::new(ResourceType::Risk, Action::Update),
            Permission::new(ResourceType::Mitigation, Action::Create),
            Permission::new(ResourceType::Mitigation, Action::Update),
            Permission::new(ResourceType::Report, Action::Create),
            Permission::new(ResourceType::Report, Action::Export),
            Permission::new(ResourceType::Analytics, Action::Export),
            Permission::new(ResourceType::CustomField, Action::Read),
        ]);
        let mut analyst_features = viewer.features.clone();
        analyst_features.extend(feature_names([
            Feature::AdvancedAnalytics,
            Feature::CustomFields,
        ]));
        let analyst = RoleTemplate {
            name: "Analyst".to_string(),
            level: 3,
            description: "Creates and maintains risks, mitigations, and reports".to_string(),
            permissions: analyst_permissions,
            features: analyst_features,
        };

        let mut manager_permissions = analyst.permissions.clone();
        manager_permissions.add_all([
            Permission::new(ResourceType::Risk, Action::Delete),
            Permission::new(ResourceType::Risk, Action::Assign),
            Permission::new(ResourceType::Risk, Action::Approve),
            Permission::new(ResourceType::Mitigation, Action::Delete),
            Permission::new(ResourceType::Mitigation, Action::Assign),
            Permission::new(ResourceType::Mitigation, Action::Approve),
            Permission::new(ResourceType::BulkOperation, Action::Execute),
            Permission::new(ResourceType::Connector, Action::Read),
            Permission::new(ResourceType::Connector, Action::Manage),
            Permission::new(ResourceType::CustomField, Action::Manage),
            Permission::new(ResourceType::User, Action::Read),
        ]);
        let mut manager_features = analyst.features.clone();
        manager_features.extend(feature_names([Feature::Marketplace, Feature::BulkOperations]));
        let risk_manager = RoleTemplate {
            name: "Risk Manager".to_string(),
            level: 6,
            description: "Owns the register: approvals, assignments, bulk operations, connectors"
                .to_string(),
            permissions: manager_permissions,
            features: manager_features,
        };

        let administrator = RoleTemplate {
            name: "Administrator".to_string(),
            level: 9,
            description: "Full platform access".to_string(),
            permissions: [Permission::any()].into_iter().collect(),
            features: feature_names(Feature::all()),
        };

        vec![viewer, analyst, risk_manager, administrator]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_ordering() {
        let templates = RoleTemplate::builtin();
        assert_eq!(templates.len(), 4);
        let levels: Vec<u8> = templates.iter().map(|t| t.level).collect();
        assert_eq!(levels, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_find_is_case_and_separator_insensitive() {
        assert_eq!(RoleTemplate::find("viewer").unwrap().name, "Viewer");
        assert_eq!(RoleTemplate::find("VIEWER").unwrap().name, "Viewer");
        assert_eq!(
            RoleTemplate::find("risk_manager").unwrap().name,
            "Risk Manager"
        );
        assert_eq!(
            RoleTemplate::find("Risk-Manager").unwrap().name,
            "Risk Manager"
        );
        assert!(RoleTemplate::find("superuser").is_none());
    }

    #[test]
    fn test_by_level() {
        assert_eq!(RoleTemplate::by_level(0).unwrap().name, "Viewer");
        assert_eq!(RoleTemplate::by_level(9).unwrap().name, "Administrator");
        assert!(RoleTemplate::by_level(5).is_none());
    }

    #[test]
    fn test_lookups_return_owned_copies() {
        let mut first = RoleTemplate::find("Viewer").unwrap();
        first.permissions.clear();
        first.features.clear();

        let second = RoleTemplate::find("Viewer").unwrap();
        assert!(!second.permissions.is_empty());
        assert!(!second.features.is_empty());
    }

    #[test]
    fn test_hierarchy_is_cumulative() {
        let templates = RoleTemplate::builtin();
        // Each non-admin template grants everything the one below it does.
        for pair in templates.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            assert!(higher.outranks(lower));
            for perm in lower.permissions.iter() {
                assert!(
                    higher.permissions.grants(perm),
                    "{} should grant {}",
                    higher.name,
                    perm
                );
            }
            for feature in &lower.features {
                assert!(higher.has_feature(feature));
            }
        }
    }

    #[test]
    fn test_administrator_is_full_wildcard() {
        let admin = RoleTemplate::find("Administrator").unwrap();
        assert!(admin.permissions.grants(&Permission::any()));
        assert_eq!(admin.features.len(), Feature::all().len());
    }

    #[test]
    fn test_viewer_feature_flags() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        assert!(viewer.has_feature("dashboards"));
        assert!(!viewer.has_feature("role-management"));
    }
}
