//! # Permissions
//!
//! Core permission types and sets for the RBAC system.
//! A permission combines a resource with an action, either of which may be
//! the `*` wildcard.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::Action;
use crate::resources::ResourceType;

/// Error returned when a permission string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePermissionError {
    /// The string is empty.
    #[error("permission string is empty")]
    Empty,

    /// The string is not `*` and has no `resource:action` separator.
    #[error("permission {0:?} is missing the `resource:action` separator")]
    MissingSeparator(String),

    /// The string has more than one `:` separator.
    #[error("permission {0:?} has too many segments")]
    TooManySegments(String),

    /// One side of the separator is empty (e.g. `risks:` or `:read`).
    #[error("permission {0:?} has an empty segment")]
    EmptySegment(String),
}

/// One segment of a permission: a concrete name or the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionPart {
    /// The `*` wildcard, matching any name.
    Any,
    /// A concrete resource or action name.
    Named(String),
}

impl PermissionPart {
    /// Get the string representation (`*` for the wildcard).
    pub fn as_str(&self) -> &str {
        match self {
            PermissionPart::Any => "*",
            PermissionPart::Named(name) => name,
        }
    }

    fn from_token(token: &str) -> Self {
        if token == "*" {
            PermissionPart::Any
        } else {
            PermissionPart::Named(token.to_string())
        }
    }
}

/// A permission is a combination of a resource and an action.
///
/// Permissions take one of four forms:
/// - `resource:action`: one action on one resource
/// - `resource:*`: all actions on a resource
/// - `*:action`: one action on all resources
/// - `*`: full access
///
/// Internally a permission is a value type of two [`PermissionPart`]
/// segments; strings are parsed at the boundary so matching never has to
/// reason about malformed input. Segments are opaque names: construction
/// helpers accept the [`ResourceType`] and [`Action`] enums, but parsing and
/// matching place no closed-enum constraint on them, so permissions issued
/// for resources this build does not know about still evaluate correctly.
///
/// # Example
///
/// ```
/// use riskboard_rbac::permissions::Permission;
/// use riskboard_rbac::resources::ResourceType;
/// use riskboard_rbac::actions::Action;
///
/// let perm = Permission::new(ResourceType::Risk, Action::Read);
/// assert_eq!(perm.to_string(), "risks:read");
///
/// let all_dashboards = Permission::parse("dashboards:*").unwrap();
/// assert!(all_dashboards.grants(&Permission::new(ResourceType::Dashboard, Action::Delete)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    resource: PermissionPart,
    action: PermissionPart,
}

impl Permission {
    /// Create a permission for one action on one resource.
    pub fn new(resource: ResourceType, action: Action) -> Self {
        Self {
            resource: PermissionPart::Named(resource.as_str().to_string()),
            action: PermissionPart::Named(action.as_str().to_string()),
        }
    }

    /// The full-access wildcard permission `*`.
    pub fn any() -> Self {
        Self {
            resource: PermissionPart::Any,
            action: PermissionPart::Any,
        }
    }

    /// All actions on one resource (`resource:*`).
    pub fn any_action(resource: ResourceType) -> Self {
        Self {
            resource: PermissionPart::Named(resource.as_str().to_string()),
            action: PermissionPart::Any,
        }
    }

    /// One action on all resources (`*:action`).
    pub fn any_resource(action: Action) -> Self {
        Self {
            resource: PermissionPart::Any,
            action: PermissionPart::Named(action.as_str().to_string()),
        }
    }

    /// Parse a permission string.
    ///
    /// Accepts exactly the four documented forms. Anything else (empty
    /// strings, missing or extra separators, empty segments) is an error;
    /// callers that must stay total use [`Permission::parse_lossy`].
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::permissions::Permission;
    ///
    /// let perm = Permission::parse("risks:read").unwrap();
    /// assert_eq!(perm.resource().as_str(), "risks");
    /// assert_eq!(perm.action().as_str(), "read");
    ///
    /// assert_eq!(Permission::parse("*").unwrap(), Permission::any());
    /// assert!(Permission::parse("risks").is_err());
    /// assert!(Permission::parse("risks:read:extra").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ParsePermissionError> {
        if s.is_empty() {
            return Err(ParsePermissionError::Empty);
        }
        if s == "*" {
            return Ok(Self::any());
        }

        let mut parts = s.split(':');
        let resource = parts.next().unwrap_or_default();
        let action = parts
            .next()
            .ok_or_else(|| ParsePermissionError::MissingSeparator(s.to_string()))?;
        if parts.next().is_some() {
            return Err(ParsePermissionError::TooManySegments(s.to_string()));
        }
        if resource.is_empty() || action.is_empty() {
            return Err(ParsePermissionError::EmptySegment(s.to_string()));
        }

        Ok(Self {
            resource: PermissionPart::from_token(resource),
            action: PermissionPart::from_token(action),
        })
    }

    /// Parse a permission string, degrading malformed input to `*`.
    ///
    /// This preserves the legacy split behavior for display purposes (audit
    /// labels). It must never feed a matching decision: a malformed string
    /// widened to `*` would grant everything. Evaluation paths use the
    /// strict [`Permission::parse`] and deny instead.
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|_| Self::any())
    }

    /// The resource segment.
    pub fn resource(&self) -> &PermissionPart {
        &self.resource
    }

    /// The action segment.
    pub fn action(&self) -> &PermissionPart {
        &self.action
    }

    /// Check if this is the full-access wildcard `*`.
    pub fn is_any(&self) -> bool {
        self.resource == PermissionPart::Any && self.action == PermissionPart::Any
    }

    /// Check if either segment is a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.resource == PermissionPart::Any || self.action == PermissionPart::Any
    }

    /// Check whether holding this permission satisfies `required`.
    ///
    /// The rules, in order:
    /// 1. Exact equality.
    /// 2. Holding `*` grants everything.
    /// 3. `resource:*` grants any action on the same resource.
    /// 4. `*:action` grants that action on any resource.
    ///
    /// No other wildcard combination matches; in particular `resource:*`
    /// does not grant `*:action` or `*`. The order mirrors the evaluation
    /// precedence: exact match and the full wildcard are checked before
    /// partial wildcards.
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::permissions::Permission;
    ///
    /// let held = Permission::parse("risks:*").unwrap();
    /// assert!(held.grants(&Permission::parse("risks:read").unwrap()));
    /// assert!(!held.grants(&Permission::parse("roles:read").unwrap()));
    /// assert!(!held.grants(&Permission::parse("*:read").unwrap()));
    /// ```
    pub fn grants(&self, required: &Permission) -> bool {
        if self == required {
            return true;
        }
        if self.is_any() {
            return true;
        }
        if self.action == PermissionPart::Any && self.resource == required.resource {
            return true;
        }
        if self.resource == PermissionPart::Any && self.action == required.action {
            return true;
        }
        false
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            write!(f, "*")
        } else {
            write!(f, "{}:{}", self.resource.as_str(), self.action.as_str())
        }
    }
}

impl FromStr for Permission {
    type Err = ParsePermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Permission {
    type Error = ParsePermissionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Permission> for String {
    fn from(perm: Permission) -> Self {
        perm.to_string()
    }
}

/// A set of permissions that can be assigned to roles or users.
///
/// Membership is what matters: insertion order is irrelevant and duplicates
/// collapse.
///
/// # Example
///
/// ```
/// use riskboard_rbac::permissions::{Permission, PermissionSet};
/// use riskboard_rbac::resources::ResourceType;
/// use riskboard_rbac::actions::Action;
///
/// let mut set = PermissionSet::new();
/// set.add(Permission::new(ResourceType::Risk, Action::Read));
/// set.add(Permission::new(ResourceType::Risk, Action::Create));
///
/// assert!(set.grants(&Permission::new(ResourceType::Risk, Action::Read)));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    permissions: HashSet<Permission>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Add multiple permissions to the set.
    pub fn add_all<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = Permission>,
    {
        self.permissions.extend(permissions);
    }

    /// Remove a permission from the set.
    ///
    /// Removal is by exact value, not by match: removing `risks:read` does
    /// not carve an exception out of a held `risks:*`.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(permission)
    }

    /// Check if the set contains this exact permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Check if any held permission grants `required`.
    ///
    /// This is the existential check the evaluator's `can` is built on.
    pub fn grants(&self, required: &Permission) -> bool {
        self.permissions.iter().any(|held| held.grants(required))
    }

    /// Check if every permission in `required` is granted.
    ///
    /// Vacuously true when `required` yields nothing.
    pub fn grants_all<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        required.into_iter().all(|perm| self.grants(perm))
    }

    /// Check if at least one permission in `required` is granted.
    ///
    /// Vacuously false when `required` yields nothing.
    pub fn grants_any<'a, I>(&self, required: I) -> bool
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        required.into_iter().any(|perm| self.grants(perm))
    }

    /// Create from a list of permission strings, skipping invalid entries.
    ///
    /// Strings that fail strict parsing are dropped rather than widened to
    /// wildcards; a malformed grant must never become full access.
    ///
    /// # Example
    ///
    /// ```
    /// use riskboard_rbac::permissions::PermissionSet;
    ///
    /// let set = PermissionSet::from_strings(&["risks:read", "not a permission"]);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn from_strings<I, S>(perms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        perms
            .into_iter()
            .filter_map(|s| Permission::parse(s.as_ref()).ok())
            .collect()
    }

    /// Iterate over the permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    /// Get the permission strings in sorted order.
    ///
    /// Sorted for stable display and comparison in UIs and exports.
    pub fn strings(&self) -> Vec<String> {
        let mut out: Vec<String> = self.permissions.iter().map(|p| p.to_string()).collect();
        out.sort();
        out
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// The permissions present in both sets.
    pub fn intersection(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions
            .intersection(&other.permissions)
            .cloned()
            .collect()
    }

    /// The permissions present in this set but not in `other`.
    pub fn difference(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions
            .difference(&other.permissions)
            .cloned()
            .collect()
    }

    /// The permissions present in either set.
    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        self.permissions
            .union(&other.permissions)
            .cloned()
            .collect()
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Clear all permissions.
    pub fn clear(&mut self) {
        self.permissions.clear();
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        Self {
            permissions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = &'a Permission;
    type IntoIter = std::collections::hash_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.permissions.iter()
    }
}
