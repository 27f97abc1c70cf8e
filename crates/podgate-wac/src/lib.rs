//! Podgate WAC: Web Access Control.
//!
//! Authorization documents list rules granting modes to agents, agent
//! classes and groups. A resource without its own document inherits the
//! default rules of the nearest ancestor that has one.
//!
//! # Modules
//!
//! - [`document`]: Authorization documents and rules
//! - [`calculator`]: Access computed from a document's rules
//! - [`resolver`]: Finding the document that governs a resource
//! - [`mutation`]: Next-state documents for grants and revocations

#![warn(missing_docs)]

pub mod calculator;
pub mod document;
pub mod mutation;
pub mod resolver;

pub use calculator::{compute_access, explicit_access, explicit_access_all};
pub use document::{AuthorizationDocument, Rule};
pub use mutation::{derive_from_fallback, set_principal_access};
pub use resolver::{ApplicableAcl, resolve_applicable_acl, resolve_fallback, resolve_from_info};

/// Scheme name used in errors.
pub const SCHEME: &str = "WAC";
