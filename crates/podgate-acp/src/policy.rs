//! Policy evaluation.
//!
//! Effective access is the union of `allow` over applying policies minus the
//! union of `deny` over them; deny wins per mode regardless of order.
//! Resource modes come from the resource attachment, control modes from the
//! control attachment (`Read` reads the ACR, `Write` changes it).

use std::collections::{BTreeMap, BTreeSet};

use podgate_core::{AccessModes, AccessScope, NormalizedAccess, Principal, RequestContext, Term};

use crate::acr::{AccessControlResource, Attachment, Matcher, Policy};
use crate::matcher::{matcher_applies, matcher_names};

/// Whether `policy` applies to the requester of `context`.
pub fn policy_applies(
    policy: &Policy,
    acr: &AccessControlResource,
    context: &RequestContext,
) -> bool {
    applies_with(policy, acr, |m| matcher_applies(m, context))
}

/// Whether `policy` applies when matchers are decided by `test`.
///
/// A policy with no matcher in any combinator never applies. An empty
/// `anyOf` does not block.
pub fn applies_with(
    policy: &Policy,
    acr: &AccessControlResource,
    test: impl Fn(&Matcher) -> bool,
) -> bool {
    if policy.is_unconditional() {
        return false;
    }
    let holds = |id: &Term| test(&acr.matcher(id));
    policy.all_of.iter().all(holds)
        && (policy.any_of.is_empty() || policy.any_of.iter().any(holds))
        && !policy.none_of.iter().any(holds)
}

/// Allowed minus denied modes over the applying policies at `attachment`.
pub fn attachment_access(
    acr: &AccessControlResource,
    attachment: Attachment,
    test: impl Fn(&Matcher) -> bool,
) -> AccessModes {
    let mut allowed = AccessModes::NONE;
    let mut denied = AccessModes::NONE;
    for policy in acr.policies(attachment) {
        if applies_with(&policy, acr, &test) {
            allowed = allowed.union(policy.allow);
            denied = denied.union(policy.deny);
        }
    }
    allowed.without(denied)
}

fn scoped_access(
    acr: &AccessControlResource,
    scope: AccessScope,
    test: impl Fn(&Matcher) -> bool,
) -> NormalizedAccess {
    let resource = attachment_access(acr, Attachment::for_resource(scope), &test);
    let control = attachment_access(acr, Attachment::for_control(scope), &test);
    NormalizedAccess::from_parts(resource, control)
}

/// Access the requester of `context` has to the ACR's resource.
pub fn effective_access(acr: &AccessControlResource, context: &RequestContext) -> NormalizedAccess {
    scoped_access(acr, AccessScope::Resource, |m| matcher_applies(m, context))
}

/// Access the requester of `context` has to the container's members.
pub fn member_effective_access(
    acr: &AccessControlResource,
    context: &RequestContext,
) -> NormalizedAccess {
    scoped_access(acr, AccessScope::Default, |m| matcher_applies(m, context))
}

/// Access granted through matchers that name `principal` itself.
pub fn explicit_access(
    acr: &AccessControlResource,
    principal: &Principal,
    scope: AccessScope,
) -> NormalizedAccess {
    scoped_access(acr, scope, |m| matcher_names(m, principal))
}

/// Explicit access of every agent named by a matcher in `scope`.
pub fn explicit_access_all(
    acr: &AccessControlResource,
    scope: AccessScope,
) -> BTreeMap<String, NormalizedAccess> {
    let mut agents = BTreeSet::new();
    for attachment in [Attachment::for_resource(scope), Attachment::for_control(scope)] {
        for policy in acr.policies(attachment) {
            for id in policy.all_of.iter().chain(&policy.any_of) {
                agents.extend(acr.matcher(id).agents);
            }
        }
    }
    agents
        .into_iter()
        .map(|agent| {
            let access = explicit_access(acr, &Principal::Agent(agent.clone()), scope);
            (agent, access)
        })
        .filter(|(_, access)| !access.is_empty())
        .collect()
}
