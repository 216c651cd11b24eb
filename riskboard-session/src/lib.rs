//! # Riskboard Session
//!
//! Session-scoped mutable state for the Riskboard RBAC core: the permission
//! check cache, the audit log, and the [`Session`] context tying them to an
//! evaluator snapshot.
//!
//! ## Overview
//!
//! The riskboard-session crate handles:
//! - **Caching**: Bounded, TTL-aware memoization of permission checks
//! - **Invalidation**: Debounced cache clearing under notification bursts
//! - **Audit**: A bounded ring buffer of permission decisions with
//!   filtering, stats, export, and a backend sink boundary
//! - **Session context**: One object per authenticated user wiring the
//!   pieces together
//!
//! ## Architecture
//!
//! ```text
//! UI gate ─→ Session::check
//!              ├─ PermissionCache (hit? answer)
//!              ├─ PermissionEvaluator (miss: evaluate, store)
//!              └─ AuditLog (record decision)
//!
//! permission-change notifications ─→ ClearDebouncer ─→ cache.clear()
//! ```
//!
//! Everything here is explicitly constructed and owned: one cache and one
//! audit log per session, passed by handle. Multi-session hosting is just
//! multiple [`Session`] values.
//!
//! ## Usage
//!
//! ```rust
//! use riskboard_session::{AuditLog, PermissionCache, Session, UserAccount};
//! use uuid::Uuid;
//!
//! let user = UserAccount {
//!     user_id: Uuid::now_v7(),
//!     role: "Viewer".to_string(),
//!     role_level: Some(0),
//!     permissions: vec!["dashboards:read".to_string()],
//! };
//!
//! let mut session = Session::with_parts(
//!     &user,
//!     PermissionCache::new(),
//!     AuditLog::new().with_enabled(true),
//! );
//!
//! assert!(session.check("dashboards:read"));
//! assert!(!session.check("dashboards:delete"));
//! assert_eq!(session.audit().len(), 2);
//! ```
//!
//! The audit log is an observability sink, not an authorization boundary,
//! and its buffer is not persistence; production deployments drain it to
//! a backend through [`audit::AuditSink`].

pub mod audit;
pub mod cache;
pub mod debounce;
pub mod user;

// Re-export main types for convenience
pub use audit::{AuditAction, AuditEvent, AuditExport, AuditFilter, AuditLog, AuditSink,
    AuditSinkError, AuditStats};
pub use cache::PermissionCache;
pub use debounce::{shared_cache, ClearDebouncer, SharedPermissionCache};
pub use user::{Session, UserAccount};
