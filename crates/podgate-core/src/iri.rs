//! Resource identifiers and the container hierarchy.
//!
//! Containers are identified by a trailing `/`. The hierarchy is pure path
//! prefix containment, so walking from a resource to the storage root always
//! terminates: [`ResourceIri::parent`] strictly decreases [`ResourceIri::depth`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// An absolute `http(s)` IRI of a Linked-Data resource or container.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceIri(Url);

impl ResourceIri {
    /// Parse an absolute IRI.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| Error::invalid_iri(input, e.to_string()))?;
        Self::from_url(url)
    }

    /// Wrap an already parsed URL, rejecting non-hierarchical schemes.
    pub fn from_url(url: Url) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_iri(
                url.as_str(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.cannot_be_a_base() {
            return Err(Error::invalid_iri(url.as_str(), "not a hierarchical IRI"));
        }
        Ok(Self(url))
    }

    /// The IRI as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Whether this IRI names a container.
    pub fn is_container(&self) -> bool {
        self.0.path().ends_with('/')
    }

    /// Number of non-empty path segments. The storage root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.path().split('/').filter(|s| !s.is_empty()).count()
    }

    /// Whether the path is `/`.
    pub fn is_root(&self) -> bool {
        self.depth() == 0
    }

    /// The container holding this resource, or `None` at the root.
    ///
    /// Query and fragment are dropped.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let trimmed = self.0.path().trim_end_matches('/');
        let cut = trimmed.rfind('/')?;

        let mut url = self.0.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.set_path(&trimmed[..=cut]);
        Some(Self(url))
    }

    /// Iterate over all ancestor containers, nearest first.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Resolve a (possibly relative) reference against this IRI.
    pub fn join(&self, reference: &str) -> Result<Self> {
        let url = self
            .0
            .join(reference)
            .map_err(|e| Error::invalid_iri(reference, e.to_string()))?;
        Self::from_url(url)
    }

    /// This IRI with the given fragment identifier.
    pub fn with_fragment(&self, fragment: &str) -> Self {
        let mut url = self.0.clone();
        url.set_fragment(Some(fragment));
        Self(url)
    }

    /// This IRI without its fragment identifier.
    pub fn without_fragment(&self) -> Self {
        let mut url = self.0.clone();
        url.set_fragment(None);
        Self(url)
    }
}

/// Iterator returned by [`ResourceIri::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<ResourceIri>,
}

impl Iterator for Ancestors {
    type Item = ResourceIri;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent();
        Some(current)
    }
}

impl fmt::Display for ResourceIri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for ResourceIri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceIri {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ResourceIri> for String {
    fn from(value: ResourceIri) -> Self {
        value.0.into()
    }
}

impl AsRef<str> for ResourceIri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
