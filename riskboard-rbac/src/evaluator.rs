//! # Permission Evaluator
//!
//! Aggregates the permission matcher over a user's held permission set to
//! answer the gate queries the UI asks on every render.

use crate::actions::Action;
use crate::features::Feature;
use crate::permissions::{Permission, PermissionSet};
use crate::resources::ResourceType;

/// Evaluates permission queries against an immutable snapshot of a user's
/// permission set.
///
/// The evaluator is a pure view over one snapshot: it holds no mutable
/// state, so it is safe to call on every render. When the underlying
/// permission set changes (login with a different account, role change),
/// derive a fresh evaluator from the new set rather than mutating this one.
///
/// Every query is total. Malformed permission strings evaluate to `false`
/// (denying UI visibility is the safe failure mode), never to a widened
/// wildcard.
///
/// # Example
///
/// ```
/// use riskboard_rbac::evaluator::PermissionEvaluator;
///
/// let eval = PermissionEvaluator::from_strings(&["dashboards:read", "dashboards:create"]);
/// assert!(eval.can("dashboards:read"));
/// assert!(!eval.can("dashboards:delete"));
/// assert!(eval.can_all(["dashboards:read", "dashboards:create"]));
/// assert!(!eval.is_feature_enabled("role-management"));
/// ```
#[derive(Debug, Clone)]
pub struct PermissionEvaluator {
    held: PermissionSet,
}

impl PermissionEvaluator {
    /// Create an evaluator over a permission set snapshot.
    pub fn new(held: PermissionSet) -> Self {
        Self { held }
    }

    /// Create an evaluator from raw permission strings.
    ///
    /// Invalid strings are skipped (see [`PermissionSet::from_strings`]).
    pub fn from_strings<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(PermissionSet::from_strings(perms))
    }

    /// The held permission set this evaluator answers for.
    pub fn held(&self) -> &PermissionSet {
        &self.held
    }

    /// Check whether the user holds a permission matching `required`.
    pub fn can_permission(&self, required: &Permission) -> bool {
        self.held.grants(required)
    }

    /// Check a permission given as a string.
    ///
    /// Strings that are not valid permissions are denied.
    pub fn can(&self, required: &str) -> bool {
        match Permission::parse(required) {
            Ok(perm) => self.can_permission(&perm),
            Err(_) => false,
        }
    }

    /// Check that every permission in the list is held.
    ///
    /// Vacuously true for an empty list.
    pub fn can_all<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        required.into_iter().all(|perm| self.can(perm.as_ref()))
    }

    /// Check that at least one permission in the list is held.
    ///
    /// Vacuously false for an empty list.
    pub fn can_any<I, S>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        required.into_iter().any(|perm| self.can(perm.as_ref()))
    }

    /// Check one action on one resource.
    ///
    /// Sugar for `can("{resource}:{action}")` with the typed catalog.
    pub fn can_do(&self, action: Action, resource: ResourceType) -> bool {
        self.can_permission(&Permission::new(resource, action))
    }

    /// Check whether the user holds full access (`*`).
    ///
    /// Only the literal `*` permission grants this; `resource:*` and
    /// `*:action` do not.
    pub fn is_admin(&self) -> bool {
        self.can_permission(&Permission::any())
    }

    /// Check whether a named feature is enabled for the user.
    ///
    /// A feature is enabled when the user holds any of its required
    /// permissions. Unknown feature names have an empty requirement list
    /// and therefore evaluate to disabled.
    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        match Feature::parse(feature) {
            Some(feature) => self.held.grants_any(feature.required_permissions().iter()),
            None => false,
        }
    }

    /// The actions on a resource the user may currently perform.
    ///
    /// Filters the resource's known action catalog down to the actions the
    /// held permission set grants.
    pub fn available_actions(&self, resource: ResourceType) -> Vec<Action> {
        resource
            .actions()
            .iter()
            .copied()
            .filter(|action| self.can_do(*action, resource))
            .collect()
    }
}

impl From<PermissionSet> for PermissionEvaluator {
    fn from(held: PermissionSet) -> Self {
        Self::new(held)
    }
}
