//! Podgate Client: one access API over WAC and ACP.
//!
//! [`AccessClient`] detects which authorization scheme governs a resource
//! and answers access questions, and applies changes, in the normalized
//! [`NormalizedAccess`](podgate_core::NormalizedAccess) vocabulary.
//!
//! ```no_run
//! use podgate_client::{AccessClient, ClientConfig};
//! use podgate_core::{RequestContext, ResourceIri};
//!
//! # async fn run() -> podgate_core::Result<()> {
//! let client = AccessClient::from_config(&ClientConfig::load(None)?)?;
//! let resource = ResourceIri::parse("https://pod.example/notes/today.ttl")?;
//! let access = client.get_access(&resource, &RequestContext::anonymous()).await?;
//! println!("{access:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Client configuration
//! - [`http`]: `reqwest` transport
//! - [`facade`]: Scheme detection and the access facade

#![warn(missing_docs)]

pub mod config;
pub mod facade;
pub mod http;

pub use config::ClientConfig;
pub use facade::{AccessClient, AccessControl, AccessScheme, AcpState, WacState};
pub use http::HttpTransport;
