//! Matcher evaluation.

use podgate_core::{Principal, RequestContext};

use crate::acr::Matcher;

/// Whether `matcher` is satisfied by the requester of `context`.
///
/// Conditions are alternatives. An empty matcher matches nothing.
pub fn matcher_applies(matcher: &Matcher, context: &RequestContext) -> bool {
    let agent_listed = context
        .agent
        .as_ref()
        .is_some_and(|agent| matcher.agents.iter().any(|a| a == agent));
    let client_listed = context
        .client
        .as_ref()
        .is_some_and(|client| matcher.clients.iter().any(|c| c == client));

    agent_listed
        || matcher.public
        || (matcher.authenticated && context.is_authenticated())
        || (matcher.creator && context.is_creator)
        || client_listed
        || (matcher.any_client && context.client.is_some())
}

/// Whether `matcher` names `principal` itself, without expanding classes.
///
/// ACP has no groups, so a group principal is never named.
pub fn matcher_names(matcher: &Matcher, principal: &Principal) -> bool {
    match principal {
        Principal::Agent(iri) => matcher.agents.iter().any(|a| a == iri),
        Principal::Public => matcher.public,
        Principal::Authenticated => matcher.authenticated,
        Principal::Group(_) => false,
    }
}
