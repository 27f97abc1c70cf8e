//! Podgate ACP: Access Control Policies.
//!
//! An Access Control Resource attaches policies to a resource, to a
//! container's members, and to the ACR itself. A policy applies when its
//! matchers say so; applying policies allow and deny modes, and deny wins.
//!
//! # Modules
//!
//! - [`acr`]: ACR, policy and matcher model
//! - [`matcher`]: Matcher evaluation
//! - [`policy`]: Policy evaluation and effective access
//! - [`mutation`]: Next-state ACRs for grants and revocations

#![warn(missing_docs)]

pub mod acr;
pub mod matcher;
pub mod mutation;
pub mod policy;

pub use acr::{AccessControlResource, Attachment, Matcher, Policy};
pub use matcher::{matcher_applies, matcher_names};
pub use mutation::set_principal_access;
pub use policy::{
    effective_access, explicit_access, explicit_access_all, member_effective_access,
    policy_applies,
};

/// Scheme name used in errors.
pub const SCHEME: &str = "ACP";
