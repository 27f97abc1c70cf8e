//! Next-state computation for WAC documents.
//!
//! Nothing here performs I/O. Each function takes a document and returns the
//! document that should be saved.

use podgate_core::vocab::{acl, rdf};
use podgate_core::{AccessModes, AccessScope, Mode, Principal, ResourceIri, Term};

use crate::document::{AuthorizationDocument, Rule, principal_statement};

/// Give `principal` exactly `modes` on the document's resource in `scope`.
///
/// Rules naming the principal for this resource and scope lose that
/// principal. Targets such a rule also covered elsewhere keep their access
/// through a new rule. A rule left naming nobody is removed. If `modes` is
/// not empty a new rule grants it.
pub fn set_principal_access(
    document: &AuthorizationDocument,
    principal: &Principal,
    modes: AccessModes,
    scope: AccessScope,
) -> AuthorizationDocument {
    let mut next = document.clone();
    let resource = document.resource().as_str();
    let (predicate, object) = principal_statement(principal);

    for rule in document.rules() {
        if !rule.applies_to(resource, scope) || !rule.names(principal) {
            continue;
        }
        let Some(subject) = rule.subject.as_ref() else {
            continue;
        };

        let remainder = Rule {
            access_to: without(&rule.access_to, resource, scope == AccessScope::Resource),
            default: without(&rule.default, resource, scope == AccessScope::Default),
            ..single_principal(&rule, principal)
        };
        if !remainder.access_to.is_empty() || !remainder.default.is_empty() {
            write_rule(&mut next, &remainder);
        }

        let dataset = next.dataset_mut();
        dataset.remove(subject, predicate, Some(&object));
        let trimmed = Rule {
            agents: rule.agents.iter().filter(|a| !matches!(principal, Principal::Agent(p) if p == *a)).cloned().collect(),
            groups: rule.groups.iter().filter(|g| !matches!(principal, Principal::Group(p) if p == *g)).cloned().collect(),
            public: rule.public && *principal != Principal::Public,
            authenticated: rule.authenticated && *principal != Principal::Authenticated,
            ..rule.clone()
        };
        if !trimmed.has_principals() {
            log::debug!("Removing rule {subject} from {}", document.iri());
            dataset.remove_subject(subject);
        }
    }

    let modes = modes.normalized();
    if !modes.is_empty() {
        let target = vec![resource.to_string()];
        let rule = Rule {
            access_to: if scope == AccessScope::Resource { target.clone() } else { Vec::new() },
            default: if scope == AccessScope::Default { target } else { Vec::new() },
            modes,
            ..single_principal(&Rule::default(), principal)
        };
        write_rule(&mut next, &rule);
    }
    next
}

/// A new document for `resource` at `acl_iri`, seeded from the default rules
/// of an ancestor's document.
///
/// Copied rules grant on the resource itself and, when it is a container,
/// as defaults for its members too.
pub fn derive_from_fallback(
    fallback: &AuthorizationDocument,
    acl_iri: ResourceIri,
    resource: ResourceIri,
) -> AuthorizationDocument {
    let mut next = AuthorizationDocument::new(acl_iri, resource.clone());
    let target = vec![resource.as_str().to_string()];
    for inherited in fallback.rules_in_scope(AccessScope::Default) {
        let rule = Rule {
            subject: None,
            access_to: target.clone(),
            default: if resource.is_container() { target.clone() } else { Vec::new() },
            ..inherited
        };
        write_rule(&mut next, &rule);
    }
    log::debug!(
        "Derived {} rules for {resource} from {}",
        next.rules().len(),
        fallback.iri()
    );
    next
}

/// A copy of `rule` naming only `principal`.
fn single_principal(rule: &Rule, principal: &Principal) -> Rule {
    let mut copy = Rule {
        subject: None,
        access_to: rule.access_to.clone(),
        default: rule.default.clone(),
        origins: rule.origins.clone(),
        modes: rule.modes,
        ..Rule::default()
    };
    match principal {
        Principal::Agent(iri) => copy.agents.push(iri.clone()),
        Principal::Group(iri) => copy.groups.push(iri.clone()),
        Principal::Public => copy.public = true,
        Principal::Authenticated => copy.authenticated = true,
    }
    copy
}

fn without(targets: &[String], resource: &str, drop: bool) -> Vec<String> {
    targets
        .iter()
        .filter(|t| !(drop && t.as_str() == resource))
        .cloned()
        .collect()
}

/// Add `rule` to `document` under a fresh subject.
fn write_rule(document: &mut AuthorizationDocument, rule: &Rule) {
    let subject = Term::from(
        document
            .iri()
            .with_fragment(&uuid::Uuid::new_v4().to_string()),
    );
    let dataset = document.dataset_mut();
    dataset.add(subject.clone(), rdf::TYPE, Term::iri(acl::AUTHORIZATION));
    for target in &rule.access_to {
        dataset.add(subject.clone(), acl::ACCESS_TO, Term::iri(target.as_str()));
    }
    for target in &rule.default {
        dataset.add(subject.clone(), acl::DEFAULT, Term::iri(target.as_str()));
    }
    for agent in &rule.agents {
        dataset.add(subject.clone(), acl::AGENT, Term::iri(agent.as_str()));
    }
    for group in &rule.groups {
        dataset.add(subject.clone(), acl::AGENT_GROUP, Term::iri(group.as_str()));
    }
    if rule.public {
        let (predicate, object) = principal_statement(&Principal::Public);
        dataset.add(subject.clone(), predicate, object);
    }
    if rule.authenticated {
        let (predicate, object) = principal_statement(&Principal::Authenticated);
        dataset.add(subject.clone(), predicate, object);
    }
    for origin in &rule.origins {
        dataset.add(subject.clone(), acl::ORIGIN, Term::iri(origin.as_str()));
    }
    for mode in Mode::ALL.into_iter().filter(|m| rule.modes.has(*m)) {
        dataset.add(subject.clone(), acl::MODE, Term::iri(mode.iri()));
    }
}
