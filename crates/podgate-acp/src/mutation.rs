//! Next-state computation for ACRs.
//!
//! Grants go through managed policies: one policy and one matcher per
//! attachment point and mode, at `<acr>#podgate-<attachment>-<mode>-policy`
//! and `...-matcher`. Revoking also takes the principal out of matchers it
//! shares with others in allow-only policies. Matchers referenced by any
//! policy that denies, or by any `noneOf`, are never edited. Access the
//! principal loses at attachments outside the change through a shared
//! matcher is granted back through their managed policies.

use std::collections::BTreeSet;

use podgate_core::vocab::{acp, rdf};
use podgate_core::{
    AccessModes, AccessScope, Error, Mode, NormalizedAccess, Principal, Result, Term,
};

use crate::acr::{AccessControlResource, Attachment};
use crate::matcher::matcher_names;
use crate::policy::attachment_access;

/// Modes a policy at a resource or member attachment can grant.
const RESOURCE_MODES: &[Mode] = &[Mode::Read, Mode::Append, Mode::Write];

/// Modes meaningful at a control attachment.
const CONTROL_MODES: &[Mode] = &[Mode::Read, Mode::Write];

const ATTACHMENTS: [Attachment; 4] = [
    Attachment::Resource,
    Attachment::Member,
    Attachment::Control,
    Attachment::MemberControl,
];

/// Give `principal` exactly `desired` in `scope`.
///
/// Group principals have no ACP representation and are rejected.
pub fn set_principal_access(
    acr: &AccessControlResource,
    principal: &Principal,
    desired: NormalizedAccess,
    scope: AccessScope,
) -> Result<AccessControlResource> {
    let statement = matcher_statement(principal)?;
    let desired = desired.normalized();

    let resource_modes = AccessModes {
        read: desired.read,
        append: desired.append,
        write: desired.write,
        control: false,
    };
    let control_modes = AccessModes {
        read: desired.control_read,
        write: desired.control_write,
        ..AccessModes::NONE
    };
    let plan = [
        (Attachment::for_resource(scope), RESOURCE_MODES, resource_modes),
        (Attachment::for_control(scope), CONTROL_MODES, control_modes),
    ];

    let untouched: Vec<(Attachment, AccessModes)> = ATTACHMENTS
        .into_iter()
        .filter(|a| plan.iter().all(|(planned, _, _)| planned != a))
        .map(|a| (a, named_access(acr, a, principal)))
        .collect();

    let mut next = acr.clone();
    for (attachment, modes, wanted) in plan {
        let revoked: Vec<Mode> = modes.iter().copied().filter(|m| !wanted.has(*m)).collect();
        revoke(&mut next, attachment, principal, &statement, &revoked);
        for mode in modes.iter().copied().filter(|m| wanted.has(*m)) {
            grant(&mut next, attachment, mode, &statement);
        }
        remove_empty_managed(&mut next, attachment, modes);
    }

    for (attachment, before) in untouched {
        let after = named_access(&next, attachment, principal);
        for mode in before.without(after).modes() {
            log::debug!("Keeping {mode} for {principal} at {attachment}");
            grant(&mut next, attachment, mode, &statement);
        }
    }
    Ok(next)
}

/// Modes `principal` gets at `attachment` through matchers naming it.
fn named_access(acr: &AccessControlResource, attachment: Attachment, principal: &Principal) -> AccessModes {
    attachment_access(acr, attachment, |m| matcher_names(m, principal))
}

/// The `acp:agent` object naming `principal`.
fn matcher_statement(principal: &Principal) -> Result<Term> {
    match principal {
        Principal::Agent(iri) => Ok(Term::iri(iri.as_str())),
        Principal::Public => Ok(Term::iri(acp::PUBLIC_AGENT)),
        Principal::Authenticated => Ok(Term::iri(acp::AUTHENTICATED_AGENT)),
        Principal::Group(_) => Err(Error::UnsupportedPrincipal {
            scheme: crate::SCHEME,
            principal: principal.to_string(),
        }),
    }
}

/// Managed policy and matcher subjects for `(attachment, mode)`.
pub fn managed_ids(acr: &AccessControlResource, attachment: Attachment, mode: Mode) -> (Term, Term) {
    let stem = format!("podgate-{}-{}", attachment.slug(), mode.keyword());
    (
        Term::from(acr.iri().with_fragment(&format!("{stem}-policy"))),
        Term::from(acr.iri().with_fragment(&format!("{stem}-matcher"))),
    )
}

fn managed_access_control(acr: &AccessControlResource, attachment: Attachment) -> Term {
    Term::from(
        acr.iri()
            .with_fragment(&format!("podgate-{}-access-control", attachment.slug())),
    )
}

/// Take `principal` out of every editable matcher that grants it one of
/// `revoked` at `attachment`.
fn revoke(
    acr: &mut AccessControlResource,
    attachment: Attachment,
    principal: &Principal,
    statement: &Term,
    revoked: &[Mode],
) {
    if revoked.is_empty() {
        return;
    }
    let mut protected = BTreeSet::new();
    for policy in acr.all_policies() {
        if policy.has_deny() {
            protected.extend(policy.all_of);
            protected.extend(policy.any_of);
        }
        protected.extend(policy.none_of);
    }

    let mut edits = BTreeSet::new();
    for policy in acr.policies(attachment) {
        if policy.has_deny() || !revoked.iter().any(|m| policy.allow.has(*m)) {
            continue;
        }
        for id in policy.all_of.iter().chain(&policy.any_of) {
            if protected.contains(id) {
                log::debug!("Leaving matcher {id} alone: it denies or excludes");
                continue;
            }
            if matcher_names(&acr.matcher(id), principal) {
                edits.insert(id.clone());
            }
        }
    }
    for mode in revoked {
        let (_, matcher) = managed_ids(acr, attachment, *mode);
        if !protected.contains(&matcher) {
            edits.insert(matcher);
        }
    }

    let dataset = acr.dataset_mut();
    for id in edits {
        if dataset.remove(&id, acp::AGENT, Some(statement)) > 0 {
            log::debug!("Removed {principal} from matcher {id}");
        }
    }
}

/// Put `principal` into the managed matcher for `(attachment, mode)`,
/// creating and attaching the managed policy as needed.
fn grant(acr: &mut AccessControlResource, attachment: Attachment, mode: Mode, statement: &Term) {
    let (policy, matcher) = managed_ids(acr, attachment, mode);
    let root = acr.subject();
    let ac = managed_access_control(acr, attachment);

    let dataset = acr.dataset_mut();
    dataset.add(policy.clone(), rdf::TYPE, Term::iri(acp::POLICY));
    dataset.add(policy.clone(), acp::ANY_OF, matcher.clone());
    dataset.add(policy.clone(), acp::ALLOW, Term::iri(mode.iri()));
    dataset.add(matcher.clone(), rdf::TYPE, Term::iri(acp::MATCHER));
    dataset.add(matcher, acp::AGENT, statement.clone());
    if attachment.is_indirect() {
        dataset.add(root, attachment.predicate(), ac.clone());
        dataset.add(ac.clone(), rdf::TYPE, Term::iri(acp::ACCESS_CONTROL_TYPE));
        dataset.add(ac, acp::APPLY, policy);
    } else {
        dataset.add(root, attachment.predicate(), policy);
    }
}

/// Drop managed policies whose matcher no longer names anyone.
fn remove_empty_managed(acr: &mut AccessControlResource, attachment: Attachment, modes: &[Mode]) {
    let root = acr.subject();
    let ac = managed_access_control(acr, attachment);
    for mode in modes {
        let (policy, matcher) = managed_ids(acr, attachment, *mode);
        if !acr.matcher(&matcher).is_empty() {
            continue;
        }
        let dataset = acr.dataset_mut();
        let removed = dataset.remove_subject(&matcher) + dataset.remove_subject(&policy);
        if removed == 0 {
            continue;
        }
        log::debug!("Removed empty managed policy {policy}");
        if attachment.is_indirect() {
            dataset.remove(&ac, acp::APPLY, Some(&policy));
        } else {
            dataset.remove(&root, attachment.predicate(), Some(&policy));
        }
    }

    if attachment.is_indirect() && acr.dataset().subject(&ac).iris(acp::APPLY).next().is_none() {
        let dataset = acr.dataset_mut();
        dataset.remove_subject(&ac);
        dataset.remove(&root, attachment.predicate(), Some(&ac));
    }
}
