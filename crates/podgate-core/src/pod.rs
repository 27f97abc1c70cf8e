//! The I/O session every access operation runs against.
//!
//! A [`Pod`] bundles the transport and the RDF codec. It is passed explicitly
//! to resolvers and the facade; cloning it is cheap and shares both
//! collaborators.

use std::fmt;
use std::sync::Arc;

use crate::codec::{RdfCodec, TurtleCodec};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::headers::{EffectiveAccess, Link, parse_link_header, parse_wac_allow};
use crate::iri::ResourceIri;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::vocab::pim;

// ============================================================================
// Probe
// ============================================================================

/// Outcome of a fetch whose "absent" and "forbidden" answers are expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Probe<T> {
    /// The resource was fetched.
    Found(T),
    /// The server answered 404.
    Missing,
    /// The server answered 401 or 403, or nothing could be fetched at all.
    Inaccessible,
}

impl<T> Probe<T> {
    /// Transform the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Self::Found(value) => Probe::Found(f(value)),
            Self::Missing => Probe::Missing,
            Self::Inaccessible => Probe::Inaccessible,
        }
    }

    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// ResourceInfo
// ============================================================================

/// Metadata of a resource, taken from its response headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceInfo {
    iri: ResourceIri,
    links: Vec<Link>,
    wac_allow: Option<String>,
}

impl ResourceInfo {
    /// Collect the metadata carried by `response` to a request for `iri`.
    pub fn from_response(iri: ResourceIri, response: &HttpResponse) -> Self {
        let links = response
            .header_values("link")
            .flat_map(|value| parse_link_header(value, &iri))
            .collect();
        Self {
            wac_allow: response.header("wac-allow").map(str::to_string),
            iri,
            links,
        }
    }

    /// The resource this metadata describes.
    pub fn iri(&self) -> &ResourceIri {
        &self.iri
    }

    /// All `Link` entries.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Targets of links with relation `rel`.
    pub fn linked<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.links
            .iter()
            .filter(move |l| l.has_rel(rel))
            .map(|l| l.target.as_str())
    }

    /// The access-control document advertised with `rel="acl"`.
    pub fn acl_iri(&self) -> Option<ResourceIri> {
        let target = self.linked("acl").next()?;
        match ResourceIri::parse(target) {
            Ok(iri) => Some(iri),
            Err(e) => {
                log::warn!("Ignoring acl link of {}: {e}", self.iri);
                None
            }
        }
    }

    /// Types declared with `rel="type"`.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.linked("type")
    }

    /// Whether `rel="type"` declares `type_iri`.
    pub fn declares_type(&self, type_iri: &str) -> bool {
        self.types().any(|t| t == type_iri)
    }

    /// Whether the resource declares itself a storage root.
    pub fn is_storage_root(&self) -> bool {
        self.declares_type(pim::STORAGE)
    }

    /// The access reported in `WAC-Allow`; none when the header is absent.
    pub fn effective_access(&self) -> EffectiveAccess {
        self.wac_allow
            .as_deref()
            .map(parse_wac_allow)
            .unwrap_or_default()
    }
}

/// A parsed RDF document together with its response metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    /// Document contents.
    pub dataset: Dataset,
    /// Response metadata.
    pub info: ResourceInfo,
}

// ============================================================================
// Pod
// ============================================================================

/// Transport and codec for one client.
#[derive(Clone)]
pub struct Pod {
    transport: Arc<dyn Transport>,
    codec: Arc<dyn RdfCodec>,
}

impl Pod {
    /// A session speaking Turtle over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_codec(transport, Arc::new(TurtleCodec))
    }

    /// A session with a custom codec.
    pub fn with_codec(transport: Arc<dyn Transport>, codec: Arc<dyn RdfCodec>) -> Self {
        Self { transport, codec }
    }

    /// The RDF codec.
    pub fn codec(&self) -> &dyn RdfCodec {
        self.codec.as_ref()
    }

    /// Fetch the metadata of a resource that must exist.
    pub async fn resource_info(&self, iri: &ResourceIri) -> Result<ResourceInfo> {
        match self.probe_info(iri).await? {
            Probe::Found(info) => Ok(info),
            Probe::Missing => Err(Error::NotFound {
                url: iri.to_string(),
            }),
            Probe::Inaccessible => Err(Error::http(403, iri.as_str())),
        }
    }

    /// Fetch the metadata of a resource, treating 404/401/403 as states.
    pub async fn probe_info(&self, iri: &ResourceIri) -> Result<Probe<ResourceInfo>> {
        log::debug!("HEAD {iri}");
        let response = self
            .transport
            .send(HttpRequest::new(Method::Head, iri.as_str()))
            .await?;
        classify(iri, &response)?;
        Ok(probe_status(&response).map(|()| ResourceInfo::from_response(iri.clone(), &response)))
    }

    /// Fetch and parse an RDF document, treating 404/401/403 as states.
    pub async fn probe_dataset(&self, iri: &ResourceIri) -> Result<Probe<Fetched>> {
        log::debug!("GET {iri}");
        let request =
            HttpRequest::new(Method::Get, iri.as_str()).header("Accept", self.codec.media_type());
        let response = self.transport.send(request).await?;
        classify(iri, &response)?;
        match probe_status(&response) {
            Probe::Found(()) => {
                let dataset = self.codec.parse(&response.body, iri)?;
                let info = ResourceInfo::from_response(iri.clone(), &response);
                log::debug!("{iri}: {} triples", dataset.len());
                Ok(Probe::Found(Fetched { dataset, info }))
            }
            Probe::Missing => {
                log::debug!("{iri}: not found");
                Ok(Probe::Missing)
            }
            Probe::Inaccessible => {
                log::debug!("{iri}: inaccessible ({})", response.status);
                Ok(Probe::Inaccessible)
            }
        }
    }

    /// Replace the document at `iri` with `dataset`.
    pub async fn save_dataset(&self, iri: &ResourceIri, dataset: &Dataset) -> Result<()> {
        let body = self.codec.serialize(dataset)?;
        let request = HttpRequest::new(Method::Put, iri.as_str())
            .header("Content-Type", self.codec.media_type())
            .body(body);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::http(response.status, iri.as_str()));
        }
        log::info!("Saved {iri} ({} triples)", dataset.len());
        Ok(())
    }

    /// Delete the document at `iri`.
    pub async fn delete(&self, iri: &ResourceIri) -> Result<()> {
        let response = self
            .transport
            .send(HttpRequest::new(Method::Delete, iri.as_str()))
            .await?;
        match response.status {
            404 => Err(Error::NotFound {
                url: iri.to_string(),
            }),
            _ if response.is_success() => {
                log::info!("Deleted {iri}");
                Ok(())
            }
            status => Err(Error::http(status, iri.as_str())),
        }
    }
}

impl fmt::Debug for Pod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pod")
            .field("media_type", &self.codec.media_type())
            .finish_non_exhaustive()
    }
}

/// Reject statuses that are neither success nor an expected probe state.
fn classify(iri: &ResourceIri, response: &HttpResponse) -> Result<()> {
    match response.status {
        401 | 403 | 404 => Ok(()),
        _ if response.is_success() => Ok(()),
        status => Err(Error::http(status, iri.as_str())),
    }
}

fn probe_status(response: &HttpResponse) -> Probe<()> {
    match response.status {
        404 => Probe::Missing,
        401 | 403 => Probe::Inaccessible,
        _ => Probe::Found(()),
    }
}
