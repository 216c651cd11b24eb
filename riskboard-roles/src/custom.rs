//! Custom roles
//!
//! A custom role is derived from a template by adding and excluding
//! permissions. The template itself is never mutated; the custom role
//! carries its own snapshot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use riskboard_rbac::PermissionSet;

/// Maximum length of a custom role name.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of a custom role description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A role derived from a template via permission additions and exclusions.
///
/// The effective permission set is
/// `(template permissions − excluded) ∪ custom`. The template's permissions
/// are snapshotted at creation time, so later catalog lookups cannot change
/// an existing custom role.
///
/// Custom roles are built by
/// [`CustomRole::from_template`](crate::CustomRole::from_template); this
/// subsystem never persists them; storage is the backend's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRole {
    /// Role name, unique among an organization's custom roles.
    pub name: String,

    /// Hierarchy level, 0 (weakest) to 9 (strongest).
    pub level: u8,

    /// Human-readable description.
    pub description: String,

    /// Name of the template this role was derived from.
    pub parent_template: Option<String>,

    /// Snapshot of the parent template's permissions at creation time.
    pub template_permissions: PermissionSet,

    /// Permissions granted beyond the template.
    pub custom_permissions: PermissionSet,

    /// Template permissions withheld from this role.
    pub excluded_permissions: PermissionSet,

    /// Feature flags enabled for this role.
    pub features: BTreeSet<String>,
}

impl CustomRole {
    /// The permissions this role actually grants.
    ///
    /// `(template − excluded) ∪ custom`, deduplicated by construction.
    /// Exclusions are applied before additions, so a permission that
    /// appears in both `excluded_permissions` and `custom_permissions` is
    /// granted.
    pub fn effective_permissions(&self) -> PermissionSet {
        self.template_permissions
            .difference(&self.excluded_permissions)
            .union(&self.custom_permissions)
    }

    /// Advisory client-side validation.
    ///
    /// Collects every violation rather than stopping at the first, so a
    /// builder UI can show them all. This never substitutes for the
    /// authoritative server-side validation.
    pub fn validate(&self) -> RoleValidation {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(RoleValidationError::MissingName);
        } else if name.len() > MAX_NAME_LEN {
            errors.push(RoleValidationError::NameTooLong(name.len()));
        }

        if self.level > 9 {
            errors.push(RoleValidationError::LevelOutOfRange(self.level));
        }

        if self.effective_permissions().is_empty() {
            errors.push(RoleValidationError::NoPermissions);
        }

        if self.description.len() > MAX_DESCRIPTION_LEN {
            errors.push(RoleValidationError::DescriptionTooLong(
                self.description.len(),
            ));
        }

        RoleValidation {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// One violation found by [`CustomRole::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleValidationError {
    /// The role name is empty or whitespace.
    #[error("role name is required")]
    MissingName,

    /// The role name exceeds [`MAX_NAME_LEN`] characters.
    #[error("role name exceeds {max} characters (got {0})", max = MAX_NAME_LEN)]
    NameTooLong(usize),

    /// The role level is outside 0..=9.
    #[error("role level {0} is outside 0..=9")]
    LevelOutOfRange(u8),

    /// The role grants no permissions at all.
    #[error("role grants no permissions")]
    NoPermissions,

    /// The description exceeds [`MAX_DESCRIPTION_LEN`] characters.
    #[error("role description exceeds {max} characters (got {0})", max = MAX_DESCRIPTION_LEN)]
    DescriptionTooLong(usize),
}

/// The outcome of validating a custom role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleValidation {
    /// Whether the role passed every check.
    pub valid: bool,
    /// Every violation found, empty when valid.
    pub errors: Vec<RoleValidationError>,
}
