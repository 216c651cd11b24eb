//! Audit log
//!
//! An append-only, bounded record of permission decisions for inspection.
//! This is an observability sink, never an authorization input: nothing may
//! base an allow/deny decision on what the log contains.
//!
//! The in-memory buffer is session-scoped and lost on reload. Production
//! deployments drain it to a real backend through [`AuditSink`].

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use riskboard_rbac::Permission;

/// Default maximum number of buffered events.
pub const DEFAULT_MAX_EVENTS: usize = 1000;

/// What kind of permission event happened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A permission was checked and held.
    Check,
    /// A permission was checked and not held.
    Deny,
    /// A permission was granted to a user.
    Grant,
    /// A permission was revoked from a user.
    Revoke,
    /// An attempted grant failed.
    GrantFailed,
}

impl AuditAction {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Check => "check",
            AuditAction::Deny => "deny",
            AuditAction::Grant => "grant",
            AuditAction::Revoke => "revoke",
            AuditAction::GrantFailed => "grant_failed",
        }
    }
}

/// One recorded permission event.
///
/// `resource` and `permission_action` are display labels split out of the
/// permission string; a malformed string labels as the wildcard rather than
/// failing, which is harmless here because the log grants nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub id: Uuid,

    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,

    /// The user the event concerns.
    pub user_id: Uuid,

    /// What happened.
    pub action: AuditAction,

    /// Resource segment of the permission.
    pub resource: String,

    /// Action segment of the permission.
    pub permission_action: String,

    /// The full permission string as checked/granted.
    pub permission: String,

    /// Whether the operation was allowed.
    pub allowed: bool,

    /// Optional human-readable reason.
    pub reason: Option<String>,

    /// Additional structured context.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Create a new event for a permission string.
    pub fn new(user_id: Uuid, action: AuditAction, permission: &str, allowed: bool) -> Self {
        let label = Permission::parse_lossy(permission);
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            user_id,
            action,
            resource: label.resource().as_str().to_string(),
            permission_action: label.action().as_str().to_string(),
            permission: permission.to_string(),
            allowed,
            reason: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Criteria for [`AuditLog::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    user_id: Option<Uuid>,
    permission: Option<String>,
    action: Option<AuditAction>,
    allowed: Option<bool>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl AuditFilter {
    /// A filter matching every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match only events for this user.
    pub fn user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Match only events for this exact permission string.
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Match only events of this kind.
    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Match only events with this outcome.
    pub fn allowed(mut self, allowed: bool) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Match only events at or after this instant.
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Match only events at or before this instant.
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Check whether an event satisfies every set criterion.
    pub fn matches(&self, event: &AuditEvent) -> bool {
        if let Some(user_id) = self.user_id {
            if event.user_id != user_id {
                return false;
            }
        }
        if let Some(ref permission) = self.permission {
            if &event.permission != permission {
                return false;
            }
        }
        if let Some(action) = self.action {
            if event.action != action {
                return false;
            }
        }
        if let Some(allowed) = self.allowed {
            if event.allowed != allowed {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if event.timestamp > until {
                return false;
            }
        }
        true
    }
}

/// Derived counters over the buffered events. Computed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditStats {
    /// Events currently buffered.
    pub total_events: usize,
    /// Event count per action kind.
    pub by_action: BTreeMap<AuditAction, usize>,
    /// Distinct users seen.
    pub unique_users: usize,
    /// Distinct permission strings seen.
    pub unique_permissions: usize,
}

/// The full buffer serialized for download/inspection.
#[derive(Debug, Clone, Serialize)]
pub struct AuditExport {
    /// When the export was taken.
    pub exported_at: DateTime<Utc>,
    /// Stats at export time.
    pub stats: AuditStats,
    /// Buffered events, oldest first.
    pub events: Vec<AuditEvent>,
}

/// Error draining events to a backend sink.
#[derive(Debug, Error)]
pub enum AuditSinkError {
    /// The sink could not be reached.
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),

    /// The sink refused the event.
    #[error("audit sink rejected event: {0}")]
    Rejected(String),
}

/// A backend destination for audit events.
///
/// The buffer in [`AuditLog`] is not persistence; deployments that need
/// durable audit records implement this against their backend and drain
/// with [`AuditLog::flush_to`].
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one event.
    async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError>;
}

/// Append-only bounded ring buffer of audit events.
///
/// Once the buffer holds `max_events` entries, recording another drops the
/// oldest. The log starts disabled: a disabled log silently discards
/// events, so enabling it is an explicit deployment decision.
///
/// # Example
///
/// ```
/// use riskboard_session::audit::{AuditAction, AuditLog};
/// use uuid::Uuid;
///
/// let mut log = AuditLog::new().with_enabled(true);
/// let user = Uuid::now_v7();
/// log.log_check(user, "risks:read", true);
/// log.log_denied(user, "risks:delete", "permission not held");
///
/// assert_eq!(log.len(), 2);
/// assert_eq!(log.stats().by_action[&AuditAction::Deny], 1);
/// ```
#[derive(Debug)]
pub struct AuditLog {
    events: VecDeque<AuditEvent>,
    max_events: usize,
    enabled: bool,
}

impl AuditLog {
    /// Create a disabled log with the default buffer size.
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            max_events: DEFAULT_MAX_EVENTS,
            enabled: false,
        }
    }

    /// Set the buffer bound.
    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events.max(1);
        self
    }

    /// Set the enabled switch.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Turn recording on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check whether recording is on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a fully-formed event, dropping the oldest at capacity.
    ///
    /// Discards the event when the log is disabled.
    pub fn record(&mut self, event: AuditEvent) {
        if !self.enabled {
            return;
        }
        match event.action {
            AuditAction::Deny | AuditAction::GrantFailed => tracing::warn!(
                user_id = %event.user_id,
                permission = %event.permission,
                action = event.action.as_str(),
                reason = event.reason.as_deref().unwrap_or(""),
                "permission denied"
            ),
            _ => tracing::trace!(
                user_id = %event.user_id,
                permission = %event.permission,
                action = event.action.as_str(),
                "audit event"
            ),
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Record a permission check and its outcome.
    pub fn log_check(&mut self, user_id: Uuid, permission: &str, allowed: bool) {
        self.record(AuditEvent::new(user_id, AuditAction::Check, permission, allowed));
    }

    /// Record a denied permission check with a reason.
    pub fn log_denied(&mut self, user_id: Uuid, permission: &str, reason: impl Into<String>) {
        self.record(
            AuditEvent::new(user_id, AuditAction::Deny, permission, false).with_reason(reason),
        );
    }

    /// Record a permission grant.
    pub fn log_grant(&mut self, user_id: Uuid, permission: &str) {
        self.record(AuditEvent::new(user_id, AuditAction::Grant, permission, true));
    }

    /// Record a permission revocation.
    pub fn log_revoke(&mut self, user_id: Uuid, permission: &str) {
        self.record(AuditEvent::new(user_id, AuditAction::Revoke, permission, true));
    }

    /// Record a failed grant attempt with a reason.
    pub fn log_grant_failed(&mut self, user_id: Uuid, permission: &str, reason: impl Into<String>) {
        self.record(
            AuditEvent::new(user_id, AuditAction::GrantFailed, permission, false)
                .with_reason(reason),
        );
    }

    /// The buffered events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter()
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The configured buffer bound.
    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// Drop every buffered event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Linear-scan the buffer for events matching `filter`.
    pub fn filter(&self, filter: &AuditFilter) -> Vec<&AuditEvent> {
        self.events.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Compute counters over the buffered events.
    pub fn stats(&self) -> AuditStats {
        let mut by_action = BTreeMap::new();
        let mut users = HashSet::new();
        let mut permissions = HashSet::new();
        for event in &self.events {
            *by_action.entry(event.action).or_insert(0) += 1;
            users.insert(event.user_id);
            permissions.insert(event.permission.as_str());
        }
        AuditStats {
            total_events: self.events.len(),
            by_action,
            unique_users: users.len(),
            unique_permissions: permissions.len(),
        }
    }

    /// Serialize the buffer and its stats as one document.
    pub fn export(&self) -> AuditExport {
        AuditExport {
            exported_at: Utc::now(),
            stats: self.stats(),
            events: self.events.iter().cloned().collect(),
        }
    }

    /// Drain buffered events into a backend sink, oldest first.
    ///
    /// Stops at the first sink error; the failed event and everything after
    /// it stay buffered for a retry.
    ///
    /// # Returns
    ///
    /// The number of events flushed.
    pub async fn flush_to(&mut self, sink: &dyn AuditSink) -> Result<usize, AuditSinkError> {
        let mut flushed = 0;
        while let Some(event) = self.events.pop_front() {
            if let Err(err) = sink.record(event.clone()).await {
                self.events.push_front(event);
                return Err(err);
            }
            flushed += 1;
        }
        Ok(flushed)
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn enabled_log() -> AuditLog {
        AuditLog::new().with_enabled(true)
    }

    #[test]
    fn test_disabled_log_discards() {
        let mut log = AuditLog::new();
        assert!(!log.is_enabled());
        log.log_check(Uuid::now_v7(), "risks:read", true);
        assert!(log.is_empty());

        log.set_enabled(true);
        log.log_check(Uuid::now_v7(), "risks:read", true);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_event_labels_from_permission() {
        let mut log = enabled_log();
        let user = Uuid::now_v7();
        log.log_check(user, "risks:read", true);

        let event = log.events().next().unwrap();
        assert_eq!(event.resource, "risks");
        assert_eq!(event.permission_action, "read");
        assert_eq!(event.permission, "risks:read");
        assert_eq!(event.action, AuditAction::Check);
        assert!(event.allowed);
    }

    #[test]
    fn test_malformed_permission_labels_as_wildcard() {
        let mut log = enabled_log();
        log.log_check(Uuid::now_v7(), "garbage", false);

        let event = log.events().next().unwrap();
        assert_eq!(event.resource, "*");
        assert_eq!(event.permission_action, "*");
        assert_eq!(event.permission, "garbage");
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut log = enabled_log().with_max_events(3);
        let user = Uuid::now_v7();
        for i in 0..5 {
            log.log_check(user, &format!("risks:perm{i}"), true);
        }

        assert_eq!(log.len(), 3);
        let permissions: Vec<&str> = log.events().map(|e| e.permission.as_str()).collect();
        assert_eq!(permissions, vec!["risks:perm2", "risks:perm3", "risks:perm4"]);
    }

    #[test]
    fn test_filter() {
        let mut log = enabled_log();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        log.log_check(alice, "risks:read", true);
        log.log_denied(alice, "risks:delete", "permission not held");
        log.log_grant(bob, "risks:read");

        let denied = log.filter(&AuditFilter::new().allowed(false));
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].permission, "risks:delete");

        let alices = log.filter(&AuditFilter::new().user(alice));
        assert_eq!(alices.len(), 2);

        let grants = log.filter(&AuditFilter::new().action(AuditAction::Grant));
        assert_eq!(grants.len(), 1);

        let read_events = log.filter(&AuditFilter::new().permission("risks:read"));
        assert_eq!(read_events.len(), 2);

        assert_eq!(log.filter(&AuditFilter::new()).len(), 3);
    }

    #[test]
    fn test_filter_time_range() {
        let mut log = enabled_log();
        let user = Uuid::now_v7();
        log.log_check(user, "risks:read", true);

        let now = Utc::now();
        assert_eq!(log.filter(&AuditFilter::new().until(now)).len(), 1);
        assert_eq!(
            log.filter(&AuditFilter::new().since(now + chrono::Duration::seconds(1)))
                .len(),
            0
        );
    }

    #[test]
    fn test_stats() {
        let mut log = enabled_log();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        log.log_check(alice, "risks:read", true);
        log.log_check(bob, "risks:read", true);
        log.log_denied(bob, "roles:manage", "permission not held");
        log.log_grant_failed(alice, "roles:manage", "template not found");

        let stats = log.stats();
        assert_eq!(stats.total_events, 4);
        assert_eq!(stats.by_action[&AuditAction::Check], 2);
        assert_eq!(stats.by_action[&AuditAction::Deny], 1);
        assert_eq!(stats.by_action[&AuditAction::GrantFailed], 1);
        assert_eq!(stats.unique_users, 2);
        assert_eq!(stats.unique_permissions, 2);
    }

    #[test]
    fn test_export_serializes() {
        let mut log = enabled_log();
        log.log_check(Uuid::now_v7(), "risks:read", true);
        log.log_revoke(Uuid::now_v7(), "risks:read");

        let export = log.export();
        assert_eq!(export.events.len(), 2);
        assert_eq!(export.stats.total_events, 2);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["events"][0]["action"], "check");
        assert_eq!(json["events"][1]["action"], "revoke");
        assert!(json["exported_at"].is_string());
    }

    struct RecordingSink {
        received: Mutex<Vec<AuditEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl AuditSink for RecordingSink {
        async fn record(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
            if self.fail {
                return Err(AuditSinkError::Unavailable("backend offline".to_string()));
            }
            self.received.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_flush_to_drains_buffer() {
        let mut log = enabled_log();
        let user = Uuid::now_v7();
        log.log_check(user, "risks:read", true);
        log.log_revoke(user, "risks:read");

        let sink = RecordingSink {
            received: Mutex::new(Vec::new()),
            fail: false,
        };
        let flushed = log.flush_to(&sink).await.unwrap();
        assert_eq!(flushed, 2);
        assert!(log.is_empty());
        assert_eq!(sink.received.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_flush_to_keeps_events_on_error() {
        let mut log = enabled_log();
        log.log_check(Uuid::now_v7(), "risks:read", true);

        let sink = RecordingSink {
            received: Mutex::new(Vec::new()),
            fail: true,
        };
        assert!(log.flush_to(&sink).await.is_err());
        assert_eq!(log.len(), 1);
    }
}
