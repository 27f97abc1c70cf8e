//! Who is asking, and who a grant is about.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The requester an access decision is evaluated for.
///
/// An empty context is an anonymous request from an unidentified client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestContext {
    /// WebID of the authenticated agent.
    pub agent: Option<String>,
    /// Identifier of the client application.
    pub client: Option<String>,
    /// Whether the agent created the resource.
    #[serde(default)]
    pub is_creator: bool,
}

impl RequestContext {
    /// An anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A request made by `agent`.
    pub fn agent(agent: impl Into<String>) -> Self {
        Self {
            agent: Some(agent.into()),
            ..Self::default()
        }
    }

    /// Set the client identifier.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Mark the agent as the resource's creator.
    pub fn as_creator(mut self) -> Self {
        self.is_creator = true;
        self
    }

    /// Whether an agent is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.agent.is_some()
    }
}

/// The subject of an explicit grant or query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "iri", rename_all = "lowercase")]
pub enum Principal {
    /// A single agent, by WebID.
    Agent(String),
    /// A group of agents, by group IRI. WAC only.
    Group(String),
    /// Everyone.
    Public,
    /// Every authenticated agent.
    Authenticated,
}

impl Principal {
    /// Shorthand for [`Principal::Agent`].
    pub fn agent(webid: impl Into<String>) -> Self {
        Self::Agent(webid.into())
    }

    /// Shorthand for [`Principal::Group`].
    pub fn group(iri: impl Into<String>) -> Self {
        Self::Group(iri.into())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(iri) => write!(f, "agent <{iri}>"),
            Self::Group(iri) => write!(f, "group <{iri}>"),
            Self::Public => f.write_str("public"),
            Self::Authenticated => f.write_str("authenticated agents"),
        }
    }
}
