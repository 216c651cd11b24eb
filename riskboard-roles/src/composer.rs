//! Role composition
//!
//! Operations for deriving roles from the template catalog: building a
//! custom role from a template, comparing and merging templates, and
//! cloning with field overrides. All of these are pure set algebra over
//! value types; none of them touch the catalog itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use riskboard_rbac::PermissionSet;

use crate::custom::CustomRole;
use crate::error::{RoleError, RoleResult};
use crate::templates::RoleTemplate;

/// The result of comparing two templates' permission sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateComparison {
    /// Permissions granted by both templates.
    pub common: PermissionSet,
    /// Permissions only the first template grants.
    pub only_in_first: PermissionSet,
    /// Permissions only the second template grants.
    pub only_in_second: PermissionSet,
    /// Permissions granted by either template.
    pub union: PermissionSet,
}

/// Options controlling [`RoleTemplate::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Take the maximum level across inputs instead of the first
    /// template's level.
    pub prefer_higher_level: bool,
    /// Union the feature sets instead of keeping the first template's
    /// features.
    pub combine_features: bool,
}

impl Default for MergeOptions {
    /// A merge combines by default: highest level, union of features.
    fn default() -> Self {
        Self {
            prefer_higher_level: true,
            combine_features: true,
        }
    }
}

/// Field overrides for [`RoleTemplate::clone_with`].
///
/// Unset fields keep the source template's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateOverrides {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement level.
    pub level: Option<u8>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement permission set.
    pub permissions: Option<PermissionSet>,
    /// Replacement feature set.
    pub features: Option<BTreeSet<String>>,
}

impl RoleTemplate {
    /// Compare this template's permissions with another's.
    ///
    /// Pure set algebra; comparing a template with itself yields everything
    /// in `common` and nothing in either `only_in_*` set.
    pub fn compare(&self, other: &RoleTemplate) -> TemplateComparison {
        TemplateComparison {
            common: self.permissions.intersection(&other.permissions),
            only_in_first: self.permissions.difference(&other.permissions),
            only_in_second: other.permissions.difference(&self.permissions),
            union: self.permissions.union(&other.permissions),
        }
    }

    /// Merge several templates into one.
    ///
    /// The permission set is always the union across inputs; level and
    /// features follow `options`. Merging nothing yields the
    /// lowest-privilege template; merging one template yields a clone of
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use riskboard_roles::{MergeOptions, RoleTemplate};
    ///
    /// let viewer = RoleTemplate::find("Viewer").unwrap();
    /// let analyst = RoleTemplate::find("Analyst").unwrap();
    ///
    /// let merged = RoleTemplate::merge(&[viewer, analyst], &MergeOptions::default());
    /// assert_eq!(merged.level, 3);
    ///
    /// assert_eq!(RoleTemplate::merge(&[], &MergeOptions::default()).name, "Viewer");
    /// ```
    pub fn merge(templates: &[RoleTemplate], options: &MergeOptions) -> RoleTemplate {
        let Some(first) = templates.first() else {
            return RoleTemplate::lowest();
        };
        if templates.len() == 1 {
            return first.clone();
        }

        let mut permissions = first.permissions.clone();
        let mut features = first.features.clone();
        let mut level = first.level;
        for template in &templates[1..] {
            permissions.merge(&template.permissions);
            if options.combine_features {
                features.extend(template.features.iter().cloned());
            }
            if options.prefer_higher_level {
                level = level.max(template.level);
            }
        }

        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        RoleTemplate {
            name: first.name.clone(),
            level,
            description: format!("Merged from {}", names.join(", ")),
            permissions,
            features,
        }
    }

    /// Clone this template with field-wise overrides.
    ///
    /// Collection fields not named in `overrides` are copied from the
    /// source.
    pub fn clone_with(&self, overrides: TemplateOverrides) -> RoleTemplate {
        RoleTemplate {
            name: overrides.name.unwrap_or_else(|| self.name.clone()),
            level: overrides.level.unwrap_or(self.level),
            description: overrides
                .description
                .unwrap_or_else(|| self.description.clone()),
            permissions: overrides
                .permissions
                .unwrap_or_else(|| self.permissions.clone()),
            features: overrides.features.unwrap_or_else(|| self.features.clone()),
        }
    }
}

impl CustomRole {
    /// Derive a custom role from a built-in template.
    ///
    /// `level` defaults to the template's level. `additions` are granted on
    /// top of the template; `exclusions` are withheld from it. The
    /// template's permissions are snapshotted into the role.
    ///
    /// # Errors
    ///
    /// [`RoleError::TemplateNotFound`] when `template_name` is not in the
    /// catalog. No template is ever fabricated for an unknown name.
    ///
    /// # Examples
    ///
    /// ```
    /// use riskboard_rbac::PermissionSet;
    /// use riskboard_roles::CustomRole;
    ///
    /// let role = CustomRole::from_template(
    ///     "VIEWER",
    ///     "External Auditor",
    ///     None,
    ///     PermissionSet::from_strings(&["audit_logs:read"]),
    ///     PermissionSet::from_strings(&["dashboards:read"]),
    /// )
    /// .unwrap();
    ///
    /// let effective = role.effective_permissions();
    /// assert!(effective.grants(&"audit_logs:read".parse().unwrap()));
    /// assert!(!effective.grants(&"dashboards:read".parse().unwrap()));
    /// ```
    pub fn from_template(
        template_name: &str,
        custom_name: impl Into<String>,
        level: Option<u8>,
        additions: PermissionSet,
        exclusions: PermissionSet,
    ) -> RoleResult<CustomRole> {
        let template = RoleTemplate::find(template_name)
            .ok_or_else(|| RoleError::TemplateNotFound(template_name.to_string()))?;

        Ok(CustomRole {
            name: custom_name.into(),
            level: level.unwrap_or(template.level),
            description: format!("Custom role based on {}", template.name),
            parent_template: Some(template.name),
            template_permissions: template.permissions,
            custom_permissions: additions,
            excluded_permissions: exclusions,
            features: template.features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_template_effective_permissions() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        let role = CustomRole::from_template(
            "VIEWER",
            "X",
            None,
            PermissionSet::from_strings(&["extra:perm"]),
            PermissionSet::from_strings(&["dashboards:read"]),
        )
        .unwrap();

        let expected = viewer
            .permissions
            .difference(&PermissionSet::from_strings(&["dashboards:read"]))
            .union(&PermissionSet::from_strings(&["extra:perm"]));
        assert_eq!(role.effective_permissions(), expected);
        assert_eq!(role.level, viewer.level);
        assert_eq!(role.parent_template.as_deref(), Some("Viewer"));
    }

    #[test]
    fn test_from_template_level_override() {
        let role = CustomRole::from_template(
            "Analyst",
            "Senior Analyst",
            Some(4),
            PermissionSet::new(),
            PermissionSet::new(),
        )
        .unwrap();
        assert_eq!(role.level, 4);
    }

    #[test]
    fn test_from_template_unknown_name() {
        let result = CustomRole::from_template(
            "superuser",
            "X",
            None,
            PermissionSet::new(),
            PermissionSet::new(),
        );
        assert_eq!(
            result,
            Err(RoleError::TemplateNotFound("superuser".to_string()))
        );
    }

    #[test]
    fn test_compare_with_self() {
        let analyst = RoleTemplate::find("Analyst").unwrap();
        let diff = analyst.compare(&analyst);
        assert_eq!(diff.common, analyst.permissions);
        assert!(diff.only_in_first.is_empty());
        assert!(diff.only_in_second.is_empty());
        assert_eq!(diff.union, analyst.permissions);
    }

    #[test]
    fn test_compare_viewer_analyst() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        let analyst = RoleTemplate::find("Analyst").unwrap();
        let diff = viewer.compare(&analyst);

        // The catalog is cumulative, so viewer contributes nothing unique.
        assert_eq!(diff.common, viewer.permissions);
        assert!(diff.only_in_first.is_empty());
        assert!(!diff.only_in_second.is_empty());
        assert_eq!(diff.union, analyst.permissions);
    }

    #[test]
    fn test_merge_empty_returns_lowest() {
        let merged = RoleTemplate::merge(&[], &MergeOptions::default());
        assert_eq!(merged, RoleTemplate::lowest());
    }

    #[test]
    fn test_merge_single_clones() {
        let analyst = RoleTemplate::find("Analyst").unwrap();
        let merged = RoleTemplate::merge(std::slice::from_ref(&analyst), &MergeOptions::default());
        assert_eq!(merged, analyst);
    }

    #[test]
    fn test_merge_combines() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        let manager = RoleTemplate::find("Risk Manager").unwrap();
        let merged = RoleTemplate::merge(
            &[viewer.clone(), manager.clone()],
            &MergeOptions::default(),
        );

        assert_eq!(merged.level, 6);
        assert_eq!(merged.permissions, viewer.permissions.union(&manager.permissions));
        assert!(merged.features.is_superset(&viewer.features));
        assert!(merged.features.is_superset(&manager.features));
    }

    #[test]
    fn test_merge_keep_first_options() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        let manager = RoleTemplate::find("Risk Manager").unwrap();
        let options = MergeOptions {
            prefer_higher_level: false,
            combine_features: false,
        };
        let merged = RoleTemplate::merge(&[viewer.clone(), manager], &options);

        assert_eq!(merged.level, viewer.level);
        assert_eq!(merged.features, viewer.features);
        // Permissions are always the union.
        assert!(merged.permissions.grants(&"bulk_operations:execute".parse().unwrap()));
    }

    #[test]
    fn test_clone_with_overrides() {
        let viewer = RoleTemplate::find("Viewer").unwrap();
        let cloned = viewer.clone_with(TemplateOverrides {
            name: Some("Viewer Copy".to_string()),
            level: Some(1),
            ..Default::default()
        });

        assert_eq!(cloned.name, "Viewer Copy");
        assert_eq!(cloned.level, 1);
        assert_eq!(cloned.description, viewer.description);
        assert_eq!(cloned.permissions, viewer.permissions);
        assert_eq!(cloned.features, viewer.features);
    }

    #[test]
    fn test_clone_with_no_overrides_is_identity() {
        let analyst = RoleTemplate::find("Analyst").unwrap();
        assert_eq!(analyst.clone_with(TemplateOverrides::default()), analyst);
    }
}
