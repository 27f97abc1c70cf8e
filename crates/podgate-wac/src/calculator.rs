//! Access computed from the rules of one authorization document.
//!
//! WAC has no deny: access is the union of the modes of every applicable
//! rule, normalized so that `write` carries `append`.

use std::collections::BTreeMap;

use podgate_core::{AccessModes, AccessScope, Principal, RequestContext};

use crate::document::AuthorizationDocument;

/// Access the requester of `context` has to the document's resource.
pub fn compute_access(
    document: &AuthorizationDocument,
    context: &RequestContext,
    scope: AccessScope,
) -> AccessModes {
    document
        .rules_in_scope(scope)
        .filter(|rule| rule.matches_context(context))
        .fold(AccessModes::NONE, |acc, rule| acc.union(rule.modes))
        .normalized()
}

/// Access granted to `principal` by rules that name it directly.
///
/// Classes are not expanded: a public rule does not count towards an
/// agent's explicit access.
pub fn explicit_access(
    document: &AuthorizationDocument,
    principal: &Principal,
    scope: AccessScope,
) -> AccessModes {
    document
        .rules_in_scope(scope)
        .filter(|rule| rule.names(principal))
        .fold(AccessModes::NONE, |acc, rule| acc.union(rule.modes))
        .normalized()
}

/// Explicit access of every agent named in the document, keyed by WebID.
pub fn explicit_access_all(
    document: &AuthorizationDocument,
    scope: AccessScope,
) -> BTreeMap<String, AccessModes> {
    let mut access: BTreeMap<String, AccessModes> = BTreeMap::new();
    for rule in document.rules_in_scope(scope) {
        for agent in &rule.agents {
            let entry = access.entry(agent.clone()).or_default();
            *entry = entry.union(rule.modes).normalized();
        }
    }
    access
}
