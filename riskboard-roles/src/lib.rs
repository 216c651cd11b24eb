//! # Riskboard Roles
//!
//! Role templates and custom-role composition for the Riskboard platform.
//!
//! ## Overview
//!
//! The riskboard-roles crate handles:
//! - **Templates**: The built-in catalog of leveled permission bundles
//! - **Composition**: Deriving custom roles via additions and exclusions
//! - **Comparison & merging**: Set algebra over template permission sets
//! - **Validation**: Advisory checks for the custom-role builder
//!
//! ## Architecture
//!
//! ```text
//! Catalog (immutable, process-wide)
//!   Viewer (0) ⊂ Analyst (3) ⊂ Risk Manager (6) ⊂ Administrator (9, "*")
//!        │
//!        └─ CustomRole = (template − excluded) ∪ custom
//! ```
//!
//! Every catalog accessor returns owned clones, so a caller can never
//! mutate the shared templates through a lookup result.
//!
//! ## Usage
//!
//! ```rust
//! use riskboard_rbac::PermissionSet;
//! use riskboard_roles::{CustomRole, RoleTemplate};
//!
//! // Derive a read-mostly role with audit access.
//! let role = CustomRole::from_template(
//!     "Viewer",
//!     "External Auditor",
//!     None,
//!     PermissionSet::from_strings(&["audit_logs:read"]),
//!     PermissionSet::from_strings(&["dashboards:read"]),
//! )
//! .unwrap();
//!
//! assert!(role.validate().valid);
//! assert!(role.effective_permissions().grants(&"audit_logs:read".parse().unwrap()));
//!
//! // Compare two templates.
//! let viewer = RoleTemplate::find("Viewer").unwrap();
//! let analyst = RoleTemplate::find("Analyst").unwrap();
//! let diff = viewer.compare(&analyst);
//! assert!(diff.only_in_first.is_empty());
//! ```
//!
//! This crate never persists roles; it prepares values for the backend and
//! previews them in the builder UI.

pub mod composer;
pub mod custom;
pub mod error;
pub mod templates;

// Re-export main types for convenience
pub use composer::{MergeOptions, TemplateComparison, TemplateOverrides};
pub use custom::{CustomRole, RoleValidation, RoleValidationError};
pub use error::{RoleError, RoleResult};
pub use templates::RoleTemplate;
