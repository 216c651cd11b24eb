//! Session context
//!
//! Ties one authenticated user's evaluator snapshot to the session-scoped
//! cache and audit log. This is the object UI gates call into; it is
//! constructed once at session start and passed by handle to consumers,
//! never held as an ambient global.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use riskboard_rbac::{Action, Permission, PermissionEvaluator, ResourceType};

use crate::audit::AuditLog;
use crate::cache::PermissionCache;
use crate::debounce::{shared_cache, ClearDebouncer, SharedPermissionCache};

/// The user record the authentication service supplies after login.
///
/// Produced outside this subsystem; `permissions` is the raw string list
/// the evaluator snapshot is derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// User ID.
    pub user_id: Uuid,

    /// Assigned role name.
    pub role: String,

    /// Role hierarchy level, if the backend supplies one.
    #[serde(default)]
    pub role_level: Option<u8>,

    /// Held permission strings.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// One authenticated user's session-scoped access state.
///
/// `check` answers the same question as
/// [`PermissionEvaluator::can`] but memoizes through the cache and records
/// the decision in the audit log. The evaluator itself stays a pure
/// snapshot: when the user's permission set changes, [`Session::refresh`]
/// re-derives it and drops the cache.
///
/// # Example
///
/// ```
/// use riskboard_session::{Session, UserAccount};
/// use uuid::Uuid;
///
/// let user = UserAccount {
///     user_id: Uuid::now_v7(),
///     role: "Analyst".to_string(),
///     role_level: Some(3),
///     permissions: vec!["risks:read".to_string(), "risks:create".to_string()],
/// };
///
/// let mut session = Session::new(&user);
/// assert!(session.check("risks:read"));
/// assert!(!session.check("risks:delete"));
/// ```
pub struct Session {
    user_id: Uuid,
    evaluator: PermissionEvaluator,
    cache: SharedPermissionCache,
    invalidator: ClearDebouncer,
    audit: AuditLog,
}

impl Session {
    /// Create a session for a user with a default cache and a disabled
    /// audit log.
    pub fn new(user: &UserAccount) -> Self {
        Self::with_parts(user, PermissionCache::new(), AuditLog::new())
    }

    /// Create a session with an explicitly configured cache and audit log.
    pub fn with_parts(user: &UserAccount, cache: PermissionCache, audit: AuditLog) -> Self {
        let cache = shared_cache(cache);
        let invalidator = ClearDebouncer::new(Arc::clone(&cache));
        Self {
            user_id: user.user_id,
            evaluator: PermissionEvaluator::from_strings(&user.permissions),
            cache,
            invalidator,
            audit,
        }
    }

    /// The user this session belongs to.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The evaluator snapshot for direct, uncached queries.
    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// The audit log.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The audit log, for enabling/draining.
    pub fn audit_mut(&mut self) -> &mut AuditLog {
        &mut self.audit
    }

    /// The shared cache handle.
    pub fn cache(&self) -> &SharedPermissionCache {
        &self.cache
    }

    /// Check a permission through the cache, recording the decision.
    ///
    /// Denied destructive actions are additionally surfaced as warnings.
    pub fn check(&mut self, permission: &str) -> bool {
        let evaluator = &self.evaluator;
        let allowed = match self.cache.lock() {
            Ok(mut cache) => cache.check_or_compute(permission, || evaluator.can(permission)),
            // Poisoned lock: a timer task panicked; evaluate uncached.
            Err(_) => evaluator.can(permission),
        };

        if allowed {
            self.audit.log_check(self.user_id, permission, true);
        } else {
            let reason = match Permission::parse(permission) {
                Ok(required) => {
                    if let Some(action) = Action::parse(required.action().as_str()) {
                        if action.is_destructive() {
                            tracing::warn!(
                                user_id = %self.user_id,
                                permission,
                                "destructive action denied"
                            );
                        }
                    }
                    "permission not held"
                }
                Err(_) => "malformed permission string",
            };
            self.audit.log_denied(self.user_id, permission, reason);
        }
        allowed
    }

    /// Check whether a feature is enabled for this user.
    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        self.evaluator.is_feature_enabled(feature)
    }

    /// The actions on a resource this user may currently perform.
    pub fn available_actions(&self, resource: ResourceType) -> Vec<Action> {
        self.evaluator.available_actions(resource)
    }

    /// Note that permissions changed somewhere and the cache will need
    /// clearing.
    ///
    /// Bursts of notifications coalesce into one clear after a quiet
    /// period; must be called from within a tokio runtime.
    pub fn notify_permissions_changed(&mut self) {
        self.invalidator.schedule_clear();
    }

    /// Replace the evaluator snapshot after the user's permission set
    /// changed.
    ///
    /// Clears the cache immediately and cancels any pending debounced
    /// clear; the new snapshot must not answer from stale entries.
    pub fn refresh(&mut self, user: &UserAccount) {
        self.user_id = user.user_id;
        self.evaluator = PermissionEvaluator::from_strings(&user.permissions);
        self.invalidator.cancel_pending_clear();
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
        tracing::debug!(user_id = %self.user_id, "session permissions refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditAction;

    fn analyst() -> UserAccount {
        UserAccount {
            user_id: Uuid::now_v7(),
            role: "Analyst".to_string(),
            role_level: Some(3),
            permissions: vec![
                "dashboards:read".to_string(),
                "dashboards:create".to_string(),
            ],
        }
    }

    #[test]
    fn test_check_matches_evaluator() {
        let mut session = Session::new(&analyst());
        assert!(session.check("dashboards:read"));
        assert!(!session.check("dashboards:delete"));
        assert!(session.evaluator().can_all(["dashboards:read", "dashboards:create"]));
        assert!(!session.is_feature_enabled("role-management"));
    }

    #[test]
    fn test_check_memoizes() {
        let mut session = Session::new(&analyst());
        session.check("dashboards:read");
        session.check("dashboards:read");
        session.check("dashboards:delete");

        let cache = session.cache().lock().unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_check_records_audit_events() {
        let user = analyst();
        let mut session = Session::with_parts(
            &user,
            PermissionCache::new(),
            AuditLog::new().with_enabled(true),
        );

        session.check("dashboards:read");
        session.check("risks:delete");
        session.check("garbage");

        let stats = session.audit().stats();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.by_action[&AuditAction::Check], 1);
        assert_eq!(stats.by_action[&AuditAction::Deny], 2);

        let denied: Vec<_> = session
            .audit()
            .events()
            .filter(|e| e.action == AuditAction::Deny)
            .collect();
        assert_eq!(denied[0].reason.as_deref(), Some("permission not held"));
        assert_eq!(denied[1].reason.as_deref(), Some("malformed permission string"));
    }

    #[test]
    fn test_refresh_rederives_and_clears() {
        let mut session = Session::new(&analyst());
        session.check("dashboards:read");
        assert!(!session.check("risks:read"));

        let mut upgraded = analyst();
        upgraded.permissions.push("risks:read".to_string());
        session.refresh(&upgraded);

        assert!(session.cache().lock().unwrap().is_empty());
        assert!(session.check("risks:read"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_burst_clears_once() {
        let mut session = Session::new(&analyst());
        session.check("dashboards:read");

        session.notify_permissions_changed();
        session.notify_permissions_changed();
        session.notify_permissions_changed();
        assert_eq!(session.cache().lock().unwrap().len(), 1);

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(std::time::Duration::from_millis(1100)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(session.cache().lock().unwrap().is_empty());
    }

    #[test]
    fn test_user_account_deserializes_with_defaults() {
        let user: UserAccount = serde_json::from_str(
            r#"{"user_id":"018f0e5e-7e6a-7d32-b1ab-1d79d1c4e000","role":"Viewer"}"#,
        )
        .unwrap();
        assert_eq!(user.role, "Viewer");
        assert_eq!(user.role_level, None);
        assert!(user.permissions.is_empty());
    }
}
