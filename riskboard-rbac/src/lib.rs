//! # Riskboard RBAC (Role-Based Access Control)
//!
//! This crate provides the permission model for the Riskboard platform:
//! the types behind every "can this user see this?" decision the client
//! makes.
//!
//! ## Overview
//!
//! The riskboard-rbac crate handles:
//! - **Resources**: All resource types across platform modules
//! - **Actions**: Operations that can be performed on resources
//! - **Permissions**: Resource + Action combinations with wildcard forms
//! - **Evaluation**: Gate queries over a user's permission set
//! - **Features**: Feature flags gated behind required permissions
//!
//! ## Architecture
//!
//! ```text
//! Permission = Resource ':' Action, either side may be '*'
//!
//! Examples:
//!   "risks:read"       - Read risk register entries
//!   "dashboards:*"     - All actions on dashboards
//!   "*:read"           - Read on every resource
//!   "*"                - Full access
//! ```
//!
//! Matching precedence: exact match, then the full `*` wildcard, then
//! `resource:*`, then `*:action`. No other wildcard combination matches.
//!
//! ## Usage
//!
//! ```rust
//! use riskboard_rbac::{Action, Permission, PermissionEvaluator, ResourceType};
//!
//! // Permissions usually arrive as strings from the auth backend.
//! let eval = PermissionEvaluator::from_strings(&["risks:read", "risks:create", "dashboards:*"]);
//!
//! assert!(eval.can("risks:read"));
//! assert!(eval.can("dashboards:delete"));
//! assert!(!eval.can("roles:manage"));
//! assert!(eval.can_do(Action::Create, ResourceType::Risk));
//!
//! // Typed construction for known resources and actions.
//! let perm = Permission::new(ResourceType::Risk, Action::Read);
//! assert_eq!(perm.to_string(), "risks:read");
//! ```
//!
//! ## Safety posture
//!
//! This is advisory, client-side gating: the authoritative authorization
//! boundary is the backend. Failure modes are therefore biased toward
//! denial: malformed permission strings, unknown features, and unknown
//! resources all evaluate to `false` rather than erroring or widening.

pub mod actions;
pub mod evaluator;
pub mod features;
pub mod permissions;
pub mod resources;

// Re-export main types for convenience
pub use actions::Action;
pub use evaluator::PermissionEvaluator;
pub use features::Feature;
pub use permissions::{ParsePermissionError, Permission, PermissionPart, PermissionSet};
pub use resources::{Module, ResourceType};
