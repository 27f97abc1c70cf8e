//! Podgate Core: shared types, collaborator contracts, and the I/O session.
//!
//! This crate provides the foundations used by the WAC and ACP crates and by
//! the access facade. It has no internal Podgate dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`iri`]: Resource IRIs and the container hierarchy
//! - [`dataset`]: Subject-indexed triple store
//! - [`vocab`]: Vocabulary IRIs
//! - [`access`]: Access-mode sets
//! - [`context`]: Request contexts and principals
//! - [`headers`]: `Link` and `WAC-Allow` parsing
//! - [`codec`]: RDF codec contract and Turtle codec
//! - [`transport`]: HTTP exchange contract
//! - [`pod`]: The I/O session

#![warn(missing_docs)]

pub mod access;
pub mod codec;
pub mod context;
pub mod dataset;
pub mod error;
pub mod headers;
pub mod iri;
pub mod pod;
pub mod transport;
pub mod vocab;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types at crate root for convenience
pub use access::{AccessModes, AccessScope, Mode, NormalizedAccess};
pub use codec::{RdfCodec, TurtleCodec};
pub use context::{Principal, RequestContext};
pub use dataset::{Dataset, Literal, SubjectView, Term, Triple};
pub use error::{Error, Result};
pub use headers::EffectiveAccess;
pub use iri::ResourceIri;
pub use pod::{Fetched, Pod, Probe, ResourceInfo};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
