//! Finding the authorization document that governs a resource.
//!
//! A resource without its own document inherits the default rules of the
//! nearest ancestor container that has one. The walk is one container at a
//! time, nearest first, and stops at the first inaccessible document: the
//! server would evaluate that document, so nothing further up can apply.

use podgate_core::{AccessScope, Pod, Probe, ResourceInfo, ResourceIri, Result};

use crate::document::AuthorizationDocument;

/// The document governing a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplicableAcl {
    /// The resource's own document; its resource-scope rules apply.
    Own(AuthorizationDocument),
    /// An ancestor's document; only its default-scope rules apply.
    Fallback(AuthorizationDocument),
}

impl ApplicableAcl {
    /// The governing document.
    pub fn document(&self) -> &AuthorizationDocument {
        match self {
            Self::Own(doc) | Self::Fallback(doc) => doc,
        }
    }

    /// Take the governing document.
    pub fn into_document(self) -> AuthorizationDocument {
        match self {
            Self::Own(doc) | Self::Fallback(doc) => doc,
        }
    }

    /// Which rules of the document apply.
    pub fn scope(&self) -> AccessScope {
        match self {
            Self::Own(_) => AccessScope::Resource,
            Self::Fallback(_) => AccessScope::Default,
        }
    }
}

/// Resolve the document governing `resource`.
///
/// Returns `None` when the governing document cannot be read or no document
/// exists up to the storage root. A missing `resource` is an error.
pub async fn resolve_applicable_acl(
    pod: &Pod,
    resource: &ResourceIri,
) -> Result<Option<ApplicableAcl>> {
    let info = pod.resource_info(resource).await?;
    resolve_from_info(pod, &info).await
}

/// Like [`resolve_applicable_acl`], starting from already fetched metadata.
pub async fn resolve_from_info(pod: &Pod, info: &ResourceInfo) -> Result<Option<ApplicableAcl>> {
    let resource = info.iri();
    let Some(acl) = info.acl_iri() else {
        log::debug!("{resource} advertises no acl link");
        return Ok(None);
    };
    match pod.probe_dataset(&acl).await? {
        Probe::Found(fetched) => {
            log::debug!("{resource} is governed by its own document {acl}");
            let doc = AuthorizationDocument::from_dataset(acl, resource.clone(), fetched.dataset);
            return Ok(Some(ApplicableAcl::Own(doc)));
        }
        Probe::Inaccessible => return Ok(None),
        Probe::Missing => {}
    }

    resolve_fallback(pod, resource, info.is_storage_root()).await
}

/// Walk the ancestors of `resource` for the nearest readable document.
///
/// `at_root` says whether `resource` itself declared `pim:Storage`.
pub async fn resolve_fallback(
    pod: &Pod,
    resource: &ResourceIri,
    at_root: bool,
) -> Result<Option<ApplicableAcl>> {
    let mut current = resource.clone();
    let mut at_root = at_root;

    while !at_root {
        let Some(parent) = current.parent() else {
            break;
        };
        log::debug!("Probing ancestor {parent} of {resource}");

        let parent_info = match pod.probe_info(&parent).await? {
            Probe::Found(info) => info,
            Probe::Inaccessible => return Ok(None),
            Probe::Missing => {
                current = parent;
                continue;
            }
        };
        let Some(acl) = parent_info.acl_iri() else {
            log::debug!("{parent} advertises no acl link");
            return Ok(None);
        };
        match pod.probe_dataset(&acl).await? {
            Probe::Found(fetched) => {
                log::debug!("{resource} inherits from {acl}");
                let doc = AuthorizationDocument::from_dataset(acl, parent, fetched.dataset);
                return Ok(Some(ApplicableAcl::Fallback(doc)));
            }
            Probe::Inaccessible => return Ok(None),
            Probe::Missing => {
                at_root = parent_info.is_storage_root();
                current = parent;
            }
        }
    }

    log::debug!("No authorization document governs {resource}");
    Ok(None)
}
