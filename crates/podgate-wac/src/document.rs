//! WAC authorization documents and the rules derived from them.

use podgate_core::vocab::{acl, foaf};
use podgate_core::{AccessModes, AccessScope, Dataset, Principal, RequestContext, ResourceIri, Term};

/// An authorization document and the resource it protects.
///
/// Documents are values: mutation functions in [`crate::mutation`] return a
/// new document and leave the original untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationDocument {
    iri: ResourceIri,
    resource: ResourceIri,
    dataset: Dataset,
}

impl AuthorizationDocument {
    /// An empty document at `iri` protecting `resource`.
    pub fn new(iri: ResourceIri, resource: ResourceIri) -> Self {
        Self::from_dataset(iri, resource, Dataset::new())
    }

    /// Wrap fetched contents.
    pub fn from_dataset(iri: ResourceIri, resource: ResourceIri, dataset: Dataset) -> Self {
        Self {
            iri,
            resource,
            dataset,
        }
    }

    /// The document IRI.
    pub fn iri(&self) -> &ResourceIri {
        &self.iri
    }

    /// The protected resource.
    pub fn resource(&self) -> &ResourceIri {
        &self.resource
    }

    /// The underlying triples.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub(crate) fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    /// Every `acl:Authorization` in the document.
    pub fn rules(&self) -> Vec<Rule> {
        self.dataset
            .subjects_of_type(acl::AUTHORIZATION)
            .map(|subject| Rule::read(&self.dataset, subject))
            .collect()
    }

    /// Rules governing this document's resource in `scope`.
    pub fn rules_in_scope(&self, scope: AccessScope) -> impl Iterator<Item = Rule> + '_ {
        self.rules()
            .into_iter()
            .filter(move |rule| rule.applies_to(self.resource.as_str(), scope))
    }
}

/// One `acl:Authorization`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rule {
    /// The rule's subject in the document.
    pub subject: Option<Term>,
    /// `acl:accessTo` targets.
    pub access_to: Vec<String>,
    /// `acl:default` (and legacy `acl:defaultForNew`) targets.
    pub default: Vec<String>,
    /// `acl:agent` WebIDs.
    pub agents: Vec<String>,
    /// `acl:agentGroup` IRIs.
    pub groups: Vec<String>,
    /// `acl:agentClass foaf:Agent`.
    pub public: bool,
    /// `acl:agentClass acl:AuthenticatedAgent`.
    pub authenticated: bool,
    /// `acl:origin` values. Kept for copying; not evaluated.
    pub origins: Vec<String>,
    /// Granted modes, as stated.
    pub modes: AccessModes,
}

impl Rule {
    fn read(dataset: &Dataset, subject: &Term) -> Self {
        let view = dataset.subject(subject);
        let collect = |predicate: &str| view.iris(predicate).map(str::to_string).collect::<Vec<_>>();

        let mut default = collect(acl::DEFAULT);
        default.extend(collect(acl::DEFAULT_FOR_NEW));

        Self {
            subject: Some(subject.clone()),
            access_to: collect(acl::ACCESS_TO),
            default,
            agents: collect(acl::AGENT),
            groups: collect(acl::AGENT_GROUP),
            public: view.has_iri(acl::AGENT_CLASS, foaf::AGENT),
            authenticated: view.has_iri(acl::AGENT_CLASS, acl::AUTHENTICATED_AGENT),
            origins: collect(acl::ORIGIN),
            modes: AccessModes::from_iris(view.iris(acl::MODE)),
        }
    }

    /// Whether the rule targets `resource` in `scope`.
    pub fn applies_to(&self, resource: &str, scope: AccessScope) -> bool {
        self.targets(scope).iter().any(|t| t == resource)
    }

    /// Targets in `scope`.
    pub fn targets(&self, scope: AccessScope) -> &[String] {
        match scope {
            AccessScope::Resource => &self.access_to,
            AccessScope::Default => &self.default,
        }
    }

    /// Whether the rule grants to the requester of `context`.
    pub fn matches_context(&self, context: &RequestContext) -> bool {
        self.public
            || (self.authenticated && context.is_authenticated())
            || context
                .agent
                .as_ref()
                .is_some_and(|agent| self.agents.iter().any(|a| a == agent))
    }

    /// Whether the rule names `principal` itself.
    pub fn names(&self, principal: &Principal) -> bool {
        match principal {
            Principal::Agent(iri) => self.agents.iter().any(|a| a == iri),
            Principal::Group(iri) => self.groups.iter().any(|g| g == iri),
            Principal::Public => self.public,
            Principal::Authenticated => self.authenticated,
        }
    }

    /// Whether the rule names anyone at all.
    pub fn has_principals(&self) -> bool {
        self.public || self.authenticated || !self.agents.is_empty() || !self.groups.is_empty()
    }
}

/// The predicate and object that state `principal` in a rule.
pub(crate) fn principal_statement(principal: &Principal) -> (&'static str, Term) {
    match principal {
        Principal::Agent(iri) => (acl::AGENT, Term::iri(iri.as_str())),
        Principal::Group(iri) => (acl::AGENT_GROUP, Term::iri(iri.as_str())),
        Principal::Public => (acl::AGENT_CLASS, Term::iri(foaf::AGENT)),
        Principal::Authenticated => (acl::AGENT_CLASS, Term::iri(acl::AUTHENTICATED_AGENT)),
    }
}
