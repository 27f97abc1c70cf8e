//! One access vocabulary over both authorization schemes.
//!
//! Every call starts from the resource's metadata: its `acl` link names the
//! document that controls it, and that document's type tells WAC from ACP.
//! Nothing is cached between calls.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use podgate_acp::AccessControlResource;
use podgate_core::vocab::acp;
use podgate_core::{
    AccessScope, Dataset, EffectiveAccess, Error, NormalizedAccess, Pod, Principal, Probe,
    RequestContext, ResourceInfo, ResourceIri, Result, Term,
};
use podgate_wac::{ApplicableAcl, AuthorizationDocument};

use crate::config::ClientConfig;
use crate::http::HttpTransport;

/// Authorization scheme a resource is under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessScheme {
    /// Web Access Control
    Wac,
    /// Access Control Policies
    Acp,
}

impl fmt::Display for AccessScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wac => podgate_wac::SCHEME,
            Self::Acp => podgate_acp::SCHEME,
        })
    }
}

/// WAC state of one resource.
#[derive(Clone, Debug)]
pub struct WacState {
    info: ResourceInfo,
    acl_iri: ResourceIri,
    own: Option<AuthorizationDocument>,
}

impl WacState {
    /// The resource.
    pub fn resource(&self) -> &ResourceIri {
        self.info.iri()
    }

    /// Where the resource's own document lives or would live.
    pub fn acl_iri(&self) -> &ResourceIri {
        &self.acl_iri
    }

    /// The resource's own document, if it has one.
    pub fn own(&self) -> Option<&AuthorizationDocument> {
        self.own.as_ref()
    }

    /// The document governing the resource, walking ancestors when needed.
    pub async fn applicable(&self, pod: &Pod) -> Result<Option<ApplicableAcl>> {
        match &self.own {
            Some(doc) => Ok(Some(ApplicableAcl::Own(doc.clone()))),
            None => {
                podgate_wac::resolve_fallback(pod, self.info.iri(), self.info.is_storage_root())
                    .await
            }
        }
    }
}

/// ACP state of one resource.
#[derive(Clone, Debug)]
pub struct AcpState {
    acr: AccessControlResource,
}

impl AcpState {
    /// The resource's Access Control Resource.
    pub fn acr(&self) -> &AccessControlResource {
        &self.acr
    }
}

/// Access-control state of a resource, by scheme.
#[derive(Clone, Debug)]
pub enum AccessControl {
    /// Governed by WAC documents.
    Wac(WacState),
    /// Governed by an ACR.
    Acp(AcpState),
}

impl AccessControl {
    /// Which scheme this is.
    pub fn scheme(&self) -> AccessScheme {
        match self {
            Self::Wac(_) => AccessScheme::Wac,
            Self::Acp(_) => AccessScheme::Acp,
        }
    }
}

/// Reads and changes access on resources of a pod.
#[derive(Clone, Debug)]
pub struct AccessClient {
    pod: Pod,
}

impl AccessClient {
    /// A client over an existing session.
    pub fn new(pod: Pod) -> Self {
        Self { pod }
    }

    /// A client speaking HTTP as configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Pod::new(Arc::new(transport))))
    }

    /// The underlying session.
    pub fn pod(&self) -> &Pod {
        &self.pod
    }

    /// Load the access-control state of `resource`.
    ///
    /// `None` when the resource advertises no `acl` link or its linked
    /// document cannot be read.
    pub async fn access_control(&self, resource: &ResourceIri) -> Result<Option<AccessControl>> {
        let info = self.pod.resource_info(resource).await?;
        self.access_control_from(info).await
    }

    async fn access_control_from(&self, info: ResourceInfo) -> Result<Option<AccessControl>> {
        let Some(acl_iri) = info.acl_iri() else {
            log::debug!("{} advertises no acl link", info.iri());
            return Ok(None);
        };
        let control = match self.pod.probe_dataset(&acl_iri).await? {
            Probe::Inaccessible => return Ok(None),
            Probe::Found(fetched) if is_acr(&acl_iri, &fetched.info, &fetched.dataset) => {
                let acr = AccessControlResource::from_dataset(
                    acl_iri,
                    info.iri().clone(),
                    fetched.dataset,
                );
                AccessControl::Acp(AcpState { acr })
            }
            Probe::Found(fetched) => {
                let own = AuthorizationDocument::from_dataset(
                    acl_iri.clone(),
                    info.iri().clone(),
                    fetched.dataset,
                );
                AccessControl::Wac(WacState {
                    info,
                    acl_iri,
                    own: Some(own),
                })
            }
            Probe::Missing => AccessControl::Wac(WacState {
                info,
                acl_iri,
                own: None,
            }),
        };
        log::debug!("Access scheme: {}", control.scheme());
        Ok(Some(control))
    }

    /// Which scheme governs `resource`.
    pub async fn detect_scheme(&self, resource: &ResourceIri) -> Result<Option<AccessScheme>> {
        Ok(self
            .access_control(resource)
            .await?
            .map(|control| control.scheme()))
    }

    /// Access the requester of `context` has to `resource`.
    pub async fn get_access(
        &self,
        resource: &ResourceIri,
        context: &RequestContext,
    ) -> Result<Option<NormalizedAccess>> {
        match self.access_control(resource).await? {
            None => Ok(None),
            Some(AccessControl::Wac(state)) => Ok(state.applicable(&self.pod).await?.map(|acl| {
                podgate_wac::compute_access(acl.document(), context, acl.scope()).into()
            })),
            Some(AccessControl::Acp(state)) => {
                Ok(Some(podgate_acp::effective_access(&state.acr, context)))
            }
        }
    }

    /// Access granted to `principal` itself on `resource`.
    pub async fn get_principal_access(
        &self,
        resource: &ResourceIri,
        principal: &Principal,
    ) -> Result<Option<NormalizedAccess>> {
        match self.access_control(resource).await? {
            None => Ok(None),
            Some(AccessControl::Wac(state)) => Ok(state.applicable(&self.pod).await?.map(|acl| {
                podgate_wac::explicit_access(acl.document(), principal, acl.scope()).into()
            })),
            Some(AccessControl::Acp(state)) => {
                reject_group(principal)?;
                Ok(Some(podgate_acp::explicit_access(
                    &state.acr,
                    principal,
                    AccessScope::Resource,
                )))
            }
        }
    }

    /// Explicit access of every agent named for `resource`, keyed by WebID.
    pub async fn get_agent_access_all(
        &self,
        resource: &ResourceIri,
    ) -> Result<Option<BTreeMap<String, NormalizedAccess>>> {
        match self.access_control(resource).await? {
            None => Ok(None),
            Some(AccessControl::Wac(state)) => Ok(state.applicable(&self.pod).await?.map(|acl| {
                podgate_wac::explicit_access_all(acl.document(), acl.scope())
                    .into_iter()
                    .map(|(agent, modes)| (agent, modes.into()))
                    .collect()
            })),
            Some(AccessControl::Acp(state)) => Ok(Some(podgate_acp::explicit_access_all(
                &state.acr,
                AccessScope::Resource,
            ))),
        }
    }

    /// Give `principal` exactly `desired` on `resource`.
    ///
    /// Returns the principal's access as saved, or `None` when there was no
    /// document to change.
    pub async fn set_access(
        &self,
        resource: &ResourceIri,
        principal: &Principal,
        desired: NormalizedAccess,
    ) -> Result<Option<NormalizedAccess>> {
        self.set_in_scope(resource, principal, desired, AccessScope::Resource)
            .await
    }

    /// Access the requester of `context` inherits on members of `container`.
    pub async fn get_default_access(
        &self,
        container: &ResourceIri,
        context: &RequestContext,
    ) -> Result<Option<NormalizedAccess>> {
        require_container(container)?;
        match self.access_control(container).await? {
            None => Ok(None),
            Some(AccessControl::Wac(state)) => Ok(state.applicable(&self.pod).await?.map(|acl| {
                podgate_wac::compute_access(acl.document(), context, AccessScope::Default).into()
            })),
            Some(AccessControl::Acp(state)) => Ok(Some(podgate_acp::member_effective_access(
                &state.acr, context,
            ))),
        }
    }

    /// Give `principal` exactly `desired` on the members of `container`.
    pub async fn set_default_access(
        &self,
        container: &ResourceIri,
        principal: &Principal,
        desired: NormalizedAccess,
    ) -> Result<Option<NormalizedAccess>> {
        require_container(container)?;
        self.set_in_scope(container, principal, desired, AccessScope::Default)
            .await
    }

    /// Access the server reports through the `WAC-Allow` header.
    pub async fn get_effective_access(&self, resource: &ResourceIri) -> Result<EffectiveAccess> {
        Ok(self.pod.resource_info(resource).await?.effective_access())
    }

    /// Delete the resource's own WAC document so it inherits again.
    ///
    /// Returns whether a document was deleted. The storage root must keep
    /// its document, and ACRs cannot be deleted.
    pub async fn delete_resource_acl(&self, resource: &ResourceIri) -> Result<bool> {
        let info = self.pod.resource_info(resource).await?;
        if resource.is_root() || info.is_storage_root() {
            return Err(Error::UnsupportedOperation {
                scheme: podgate_wac::SCHEME,
                operation: format!("delete the ACL of storage root {resource}"),
            });
        }
        match self.access_control_from(info).await? {
            Some(AccessControl::Wac(state)) => match state.own {
                Some(doc) => {
                    self.pod.delete(doc.iri()).await?;
                    Ok(true)
                }
                None => {
                    log::debug!("{resource} has no ACL of its own");
                    Ok(false)
                }
            },
            Some(AccessControl::Acp(_)) => Err(Error::UnsupportedOperation {
                scheme: podgate_acp::SCHEME,
                operation: format!("delete the access control resource of {resource}"),
            }),
            None => Ok(false),
        }
    }

    async fn set_in_scope(
        &self,
        resource: &ResourceIri,
        principal: &Principal,
        desired: NormalizedAccess,
        scope: AccessScope,
    ) -> Result<Option<NormalizedAccess>> {
        match self.access_control(resource).await? {
            None => Ok(None),
            Some(AccessControl::Wac(state)) => {
                let modes = desired.to_wac(resource.as_str())?;
                let document = match state.own {
                    Some(doc) => doc,
                    None => {
                        let fallback = podgate_wac::resolve_fallback(
                            &self.pod,
                            resource,
                            state.info.is_storage_root(),
                        )
                        .await?;
                        let Some(fallback) = fallback else {
                            log::warn!("No ACL to derive a new one for {resource} from");
                            return Ok(None);
                        };
                        log::info!(
                            "Creating {} from {}",
                            state.acl_iri,
                            fallback.document().iri()
                        );
                        podgate_wac::derive_from_fallback(
                            fallback.document(),
                            state.acl_iri,
                            resource.clone(),
                        )
                    }
                };
                let next = podgate_wac::set_principal_access(&document, principal, modes, scope);
                self.pod.save_dataset(next.iri(), next.dataset()).await?;
                Ok(Some(
                    podgate_wac::explicit_access(&next, principal, scope).into(),
                ))
            }
            Some(AccessControl::Acp(state)) => {
                let next =
                    podgate_acp::set_principal_access(&state.acr, principal, desired, scope)?;
                self.pod.save_dataset(next.iri(), next.dataset()).await?;
                Ok(Some(podgate_acp::explicit_access(&next, principal, scope)))
            }
        }
    }
}

/// Whether the document at `acl_iri` is an ACR, by `Link` type or by the
/// type it gives itself.
fn is_acr(acl_iri: &ResourceIri, info: &ResourceInfo, dataset: &Dataset) -> bool {
    info.declares_type(acp::ACCESS_CONTROL_RESOURCE)
        || dataset
            .subject(&Term::from(acl_iri))
            .has_type(acp::ACCESS_CONTROL_RESOURCE)
}

fn reject_group(principal: &Principal) -> Result<()> {
    match principal {
        Principal::Group(_) => Err(Error::UnsupportedPrincipal {
            scheme: podgate_acp::SCHEME,
            principal: principal.to_string(),
        }),
        _ => Ok(()),
    }
}

fn require_container(iri: &ResourceIri) -> Result<()> {
    if iri.is_container() {
        Ok(())
    } else {
        Err(Error::invalid_iri(
            iri.as_str(),
            "default access applies to containers only",
        ))
    }
}
