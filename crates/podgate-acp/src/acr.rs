//! Access Control Resources, and the policies and matchers they describe.

use std::fmt;

use podgate_core::vocab::{acl, acp};
use podgate_core::{AccessModes, AccessScope, Dataset, Mode, ResourceIri, Term};

/// Where a policy is attached in an ACR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attachment {
    /// `acp:accessControl / acp:apply`: governs the resource.
    Resource,
    /// `acp:memberAccessControl / acp:apply`: governs the container's members.
    Member,
    /// `acp:access`: governs the ACR itself.
    Control,
    /// `acp:accessMembers`: governs the members' ACRs.
    MemberControl,
}

impl Attachment {
    /// The attachment for resource modes in `scope`.
    pub fn for_resource(scope: AccessScope) -> Self {
        match scope {
            AccessScope::Resource => Self::Resource,
            AccessScope::Default => Self::Member,
        }
    }

    /// The attachment for control modes in `scope`.
    pub fn for_control(scope: AccessScope) -> Self {
        match scope {
            AccessScope::Resource => Self::Control,
            AccessScope::Default => Self::MemberControl,
        }
    }

    /// Whether policies hang off an access-control node.
    pub fn is_indirect(self) -> bool {
        matches!(self, Self::Resource | Self::Member)
    }

    /// Predicate linking the ACR to a policy or access-control node.
    pub fn predicate(self) -> &'static str {
        match self {
            Self::Resource => acp::ACCESS_CONTROL,
            Self::Member => acp::MEMBER_ACCESS_CONTROL,
            Self::Control => acp::ACCESS,
            Self::MemberControl => acp::ACCESS_MEMBERS,
        }
    }

    /// Short name used in managed fragment identifiers.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Member => "member",
            Self::Control => "control",
            Self::MemberControl => "member-control",
        }
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Conditions on the requester.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matcher {
    /// The matcher's subject.
    pub id: Option<Term>,
    /// `acp:agent` WebIDs.
    pub agents: Vec<String>,
    /// `acp:client` identifiers.
    pub clients: Vec<String>,
    /// `acp:agent acp:PublicAgent`.
    pub public: bool,
    /// `acp:agent acp:AuthenticatedAgent`.
    pub authenticated: bool,
    /// `acp:agent acp:CreatorAgent`.
    pub creator: bool,
    /// `acp:client acp:PublicClient`.
    pub any_client: bool,
}

impl Matcher {
    /// Whether the matcher states no condition at all.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
            && self.clients.is_empty()
            && !self.public
            && !self.authenticated
            && !self.creator
            && !self.any_client
    }
}

/// Modes granted or denied when matchers apply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    /// The policy's subject.
    pub id: Option<Term>,
    /// Every one of these must apply.
    pub all_of: Vec<Term>,
    /// At least one of these must apply, if any are listed.
    pub any_of: Vec<Term>,
    /// None of these may apply.
    pub none_of: Vec<Term>,
    /// `acp:allow` modes.
    pub allow: AccessModes,
    /// `acp:deny` modes.
    pub deny: AccessModes,
}

impl Policy {
    /// Whether no combinator lists a matcher.
    pub fn is_unconditional(&self) -> bool {
        self.all_of.is_empty() && self.any_of.is_empty() && self.none_of.is_empty()
    }

    /// Whether the policy denies anything.
    pub fn has_deny(&self) -> bool {
        !self.deny.is_empty()
    }
}

/// An ACR and the resource it governs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessControlResource {
    iri: ResourceIri,
    resource: ResourceIri,
    dataset: Dataset,
}

impl AccessControlResource {
    /// An empty ACR at `iri` for `resource`.
    pub fn new(iri: ResourceIri, resource: ResourceIri) -> Self {
        Self {
            iri,
            resource,
            dataset: Dataset::new(),
        }
    }

    /// Wrap fetched contents. `acp:resource`, when stated, overrides
    /// `discovered_from` as the governed resource.
    pub fn from_dataset(iri: ResourceIri, discovered_from: ResourceIri, dataset: Dataset) -> Self {
        let stated = dataset
            .subject(&Term::from(&iri))
            .iris(acp::RESOURCE)
            .next()
            .and_then(|r| ResourceIri::parse(r).ok());
        Self {
            resource: stated.unwrap_or(discovered_from),
            iri,
            dataset,
        }
    }

    /// The ACR's IRI.
    pub fn iri(&self) -> &ResourceIri {
        &self.iri
    }

    /// The governed resource.
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

    pub(crate) fn subject(&self) -> Term {
        Term::from(&self.iri)
    }

    /// Access-control nodes at an indirect attachment.
    pub(crate) fn access_controls(&self, attachment: Attachment) -> Vec<Term> {
        if !attachment.is_indirect() {
            return Vec::new();
        }
        self.dataset
            .subject(&self.subject())
            .objects(attachment.predicate())
            .cloned()
            .collect()
    }

    /// Identifiers of policies at `attachment`.
    pub fn policy_ids(&self, attachment: Attachment) -> Vec<Term> {
        let root = self.dataset.subject(&self.subject());
        let mut ids: Vec<Term> = if attachment.is_indirect() {
            self.access_controls(attachment)
                .iter()
                .flat_map(|ac| self.dataset.subject(ac).objects(acp::APPLY).cloned().collect::<Vec<_>>())
                .collect()
        } else {
            root.objects(attachment.predicate()).cloned().collect()
        };
        ids.sort();
        ids.dedup();
        ids
    }

    /// Policies at `attachment`.
    pub fn policies(&self, attachment: Attachment) -> Vec<Policy> {
        self.policy_ids(attachment)
            .iter()
            .map(|id| self.policy(id))
            .collect()
    }

    /// Every policy at any attachment.
    pub fn all_policies(&self) -> Vec<Policy> {
        [
            Attachment::Resource,
            Attachment::Member,
            Attachment::Control,
            Attachment::MemberControl,
        ]
        .into_iter()
        .flat_map(|a| self.policies(a))
        .collect()
    }

    /// The policy described by `id`. An undescribed policy is unconditional
    /// and therefore never applies.
    pub fn policy(&self, id: &Term) -> Policy {
        let view = self.dataset.subject(id);
        if view.is_empty() {
            log::debug!("Policy {id} is not described in {}", self.iri);
        }
        let list = |predicate: &str| view.objects(predicate).cloned().collect::<Vec<_>>();
        Policy {
            id: Some(id.clone()),
            all_of: list(acp::ALL_OF),
            any_of: list(acp::ANY_OF),
            none_of: list(acp::NONE_OF),
            allow: resource_modes(view.iris(acp::ALLOW)),
            deny: resource_modes(view.iris(acp::DENY)),
        }
    }

    /// The matcher described by `id`; empty if undescribed.
    pub fn matcher(&self, id: &Term) -> Matcher {
        let view = self.dataset.subject(id);
        let mut matcher = Matcher {
            id: Some(id.clone()),
            ..Matcher::default()
        };
        for agent in view.iris(acp::AGENT) {
            match agent {
                acp::PUBLIC_AGENT => matcher.public = true,
                acp::AUTHENTICATED_AGENT => matcher.authenticated = true,
                acp::CREATOR_AGENT => matcher.creator = true,
                webid => matcher.agents.push(webid.to_string()),
            }
        }
        for client in view.iris(acp::CLIENT) {
            match client {
                acp::PUBLIC_CLIENT => matcher.any_client = true,
                id => matcher.clients.push(id.to_string()),
            }
        }
        matcher
    }
}

/// Modes valid in `acp:allow`/`acp:deny`. `acl:Control` has no meaning there.
fn resource_modes<'a>(iris: impl Iterator<Item = &'a str>) -> AccessModes {
    iris.filter_map(|iri| match Mode::from_iri(iri) {
        Some(Mode::Control) => {
            log::warn!("Ignoring <{}> in ACP policy", acl::CONTROL);
            None
        }
        Some(mode) => Some(mode),
        None => {
            log::warn!("Ignoring unknown access mode <{iri}>");
            None
        }
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use podgate_core::vocab::rdf;

    pub const ACR: &str = "https://pod.example/doc.ttl?ext=acr";
    pub const RES: &str = "https://pod.example/doc.ttl";

    pub fn iri(s: &str) -> ResourceIri {
        ResourceIri::parse(s).unwrap()
    }

    pub fn node(fragment: &str) -> Term {
        Term::iri(format!("{ACR}#{fragment}"))
    }

    /// Attach `policy` at `attachment`, creating an access-control node for
    /// indirect attachments.
    pub fn attach(ds: &mut Dataset, attachment: Attachment, policy: &Term) {
        let acr = Term::iri(ACR);
        if attachment.is_indirect() {
            let ac = node(&format!("{}-ac", attachment.slug()));
            ds.add(acr, attachment.predicate(), ac.clone());
            ds.add(ac, acp::APPLY, policy.clone());
        } else {
            ds.add(acr, attachment.predicate(), policy.clone());
        }
    }

    pub fn sample() -> AccessControlResource {
        let mut ds = Dataset::new();
        let policy = node("policy");
        let matcher = node("matcher");
        attach(&mut ds, Attachment::Resource, &policy);
        attach(&mut ds, Attachment::Control, &node("owner-policy"));
        ds.add(policy.clone(), rdf::TYPE, Term::iri(acp::POLICY));
        ds.add(policy.clone(), acp::ANY_OF, matcher.clone());
        ds.add(policy.clone(), acp::ALLOW, Term::iri(acl::READ));
        ds.add(policy.clone(), acp::ALLOW, Term::iri(acl::CONTROL));
        ds.add(matcher.clone(), acp::AGENT, Term::iri(acp::PUBLIC_AGENT));
        ds.add(matcher.clone(), acp::AGENT, Term::iri("https://alice.example/#me"));
        ds.add(matcher.clone(), acp::CLIENT, Term::iri(acp::PUBLIC_CLIENT));
        AccessControlResource::from_dataset(iri(ACR), iri(RES), ds)
    }

    #[test]
    fn test_resource_defaults_to_discovery_target() {
        let acr = sample();
        assert_eq!(acr.resource(), &iri(RES));
    }

    #[test]
    fn test_stated_resource_wins() {
        let mut ds = Dataset::new();
        ds.add(Term::iri(ACR), acp::RESOURCE, Term::iri("https://pod.example/other"));
        let acr = AccessControlResource::from_dataset(iri(ACR), iri(RES), ds);
        assert_eq!(acr.resource(), &iri("https://pod.example/other"));
    }

    #[test]
    fn test_policies_by_attachment() {
        let acr = sample();
        assert_eq!(acr.policy_ids(Attachment::Resource), vec![node("policy")]);
        assert_eq!(acr.policy_ids(Attachment::Control), vec![node("owner-policy")]);
        assert!(acr.policy_ids(Attachment::Member).is_empty());
        assert_eq!(acr.all_policies().len(), 2);
    }

    #[test]
    fn test_policy_fields_skip_control_mode() {
        let policy = sample().policy(&node("policy"));
        assert_eq!(policy.any_of, vec![node("matcher")]);
        assert_eq!(policy.allow, AccessModes::READ);
        assert!(!policy.has_deny());
        assert!(!policy.is_unconditional());
    }

    #[test]
    fn test_undescribed_policy_is_unconditional() {
        let policy = sample().policy(&node("owner-policy"));
        assert!(policy.is_unconditional());
    }

    #[test]
    fn test_matcher_fields() {
        let matcher = sample().matcher(&node("matcher"));
        assert!(matcher.public);
        assert!(matcher.any_client);
        assert!(!matcher.authenticated);
        assert_eq!(matcher.agents, vec!["https://alice.example/#me".to_string()]);
        assert!(sample().matcher(&node("nothing")).is_empty());
    }
}
