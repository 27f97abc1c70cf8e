//! Podgate umbrella crate.
//!
//! This crate re-exports all Podgate components for convenience.
//! Use feature flags to enable specific functionality.

#![doc = include_str!("../README.md")]

pub use podgate_core as core;

#[cfg(feature = "wac")]
pub use podgate_wac as wac;

#[cfg(feature = "acp")]
pub use podgate_acp as acp;

#[cfg(feature = "client")]
pub use podgate_client as client;

#[cfg(feature = "client")]
pub use podgate_client::{AccessClient, AccessScheme, ClientConfig};

pub use podgate_core::{
    AccessModes, EffectiveAccess, Error, NormalizedAccess, Principal, RequestContext,
    ResourceIri, Result,
};
