//! Error types for role operations
//!
//! Role lookups and composition have exactly one fallible path: naming a
//! template that does not exist. Everything else in this crate is total.

use thiserror::Error;

/// Role operation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// The named role template does not exist in the catalog.
    #[error("role template not found: {0}")]
    TemplateNotFound(String),
}

/// Result type for role operations.
pub type RoleResult<T> = Result<T, RoleError>;
