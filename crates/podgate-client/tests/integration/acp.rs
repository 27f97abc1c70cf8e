//! Integration tests for resources governed by Access Control Resources.

use podgate_acp::AccessControlResource;
use podgate_client::AccessScheme;
use podgate_core::vocab::{acl, acp, rdf};
use podgate_core::{
    AccessScope, Error, Method, NormalizedAccess, Principal, RequestContext, Term,
};

use crate::common::{ALICE, BOB, PodHarness, access, acp_policy, iri, nt, read_only};

const DOC: &str = "https://pod.example/notes/doc.ttl";
const ACR: &str = "https://pod.example/notes/doc.ttl.acr";
const NOTES: &str = "https://pod.example/notes/";
const NOTES_ACR: &str = "https://pod.example/notes/.acr";

fn node(fragment: &str) -> String {
    format!("{ACR}#{fragment}")
}

/// `anyOf` the public matcher, allowing read.
fn public_read() -> String {
    let mut body = acp_policy(
        ACR,
        acp::ACCESS_CONTROL,
        &node("public-read"),
        acp::ANY_OF,
        &node("anyone"),
        acp::ALLOW,
        &[acl::READ],
    );
    body.push_str(&nt(&node("anyone"), acp::AGENT, acp::PUBLIC_AGENT));
    body
}

fn harness_with(body: String) -> PodHarness {
    let harness = PodHarness::new();
    harness.resource(DOC, ACR);
    harness.acr(ACR, body);
    harness.accept_writes(ACR);
    harness
}

#[tokio::test]
async fn test_public_any_of_grants_read_to_anonymous() {
    let harness = harness_with(public_read());

    let scheme = harness.client.detect_scheme(&iri(DOC)).await.unwrap();
    assert_eq!(scheme, Some(AccessScheme::Acp));

    let anonymous = harness
        .client
        .get_access(&iri(DOC), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(anonymous, Some(read_only()));

    let alice = harness
        .client
        .get_access(&iri(DOC), &RequestContext::agent(ALICE))
        .await
        .unwrap();
    assert_eq!(alice, Some(read_only()));
}

#[tokio::test]
async fn test_acr_recognized_by_its_own_type() {
    let harness = PodHarness::new();
    harness.resource(DOC, ACR);
    let mut body = nt(ACR, rdf::TYPE, acp::ACCESS_CONTROL_RESOURCE);
    body.push_str(&public_read());
    harness.document(ACR, body);

    let scheme = harness.client.detect_scheme(&iri(DOC)).await.unwrap();
    assert_eq!(scheme, Some(AccessScheme::Acp));
}

#[tokio::test]
async fn test_deny_overrides_allow() {
    let mut body = public_read();
    body.push_str(&acp_policy(
        ACR,
        acp::ACCESS_CONTROL,
        &node("no-alice"),
        acp::ALL_OF,
        &node("alice"),
        acp::DENY,
        &[acl::READ],
    ));
    body.push_str(&nt(&node("alice"), acp::AGENT, ALICE));
    let harness = harness_with(body);

    let alice = harness
        .client
        .get_access(&iri(DOC), &RequestContext::agent(ALICE))
        .await
        .unwrap();
    assert_eq!(alice, Some(NormalizedAccess::NONE));

    let bob = harness
        .client
        .get_access(&iri(DOC), &RequestContext::agent(BOB))
        .await
        .unwrap();
    assert_eq!(bob, Some(read_only()));
}

#[tokio::test]
async fn test_group_principal_is_unsupported() {
    let harness = harness_with(public_read());
    let group = Principal::group("https://pod.example/groups#team");

    let err = harness
        .client
        .get_principal_access(&iri(DOC), &group)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedPrincipal { scheme: "ACP", .. }));

    let err = harness
        .client
        .set_access(&iri(DOC), &group, read_only())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedPrincipal { .. }));
    assert!(harness.transport.writes().is_empty());
}

#[tokio::test]
async fn test_grant_through_managed_policies() {
    let harness = harness_with(public_read());
    let desired = access(true, false, true, true, false);

    let result = harness
        .client
        .set_access(&iri(DOC), &Principal::agent(ALICE), desired)
        .await
        .unwrap();
    // write brings append with it
    assert_eq!(result, Some(access(true, true, true, true, false)));

    let saved = harness.saved(ACR);
    let write_matcher = Term::iri(node("podgate-resource-write-matcher"));
    assert!(saved.subject(&write_matcher).has_iri(acp::AGENT, ALICE));
    let control_matcher = Term::iri(node("podgate-control-read-matcher"));
    assert!(saved.subject(&control_matcher).has_iri(acp::AGENT, ALICE));
    assert!(saved
        .subject(&Term::iri(node("podgate-control-write-matcher")))
        .is_empty());

    // The existing public policy is left as it was
    let acr = AccessControlResource::from_dataset(iri(ACR), iri(DOC), saved);
    let anonymous = podgate_acp::effective_access(&acr, &RequestContext::anonymous());
    assert_eq!(anonymous, read_only());
}

#[tokio::test]
async fn test_revoke_leaves_other_agents_in_shared_matcher() {
    let mut body = acp_policy(
        ACR,
        acp::ACCESS_CONTROL,
        &node("team-read"),
        acp::ANY_OF,
        &node("team"),
        acp::ALLOW,
        &[acl::READ],
    );
    body.push_str(&nt(&node("team"), acp::AGENT, ALICE));
    body.push_str(&nt(&node("team"), acp::AGENT, BOB));
    let harness = harness_with(body);

    let before = harness
        .client
        .get_agent_access_all(&iri(DOC))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(before.len(), 2);

    let result = harness
        .client
        .set_access(&iri(DOC), &Principal::agent(ALICE), NormalizedAccess::NONE)
        .await
        .unwrap();
    assert_eq!(result, Some(NormalizedAccess::NONE));

    let acr = AccessControlResource::from_dataset(iri(ACR), iri(DOC), harness.saved(ACR));
    let bob = podgate_acp::explicit_access(&acr, &Principal::agent(BOB), AccessScope::Resource);
    assert_eq!(bob, read_only());
    let all = podgate_acp::explicit_access_all(&acr, AccessScope::Resource);
    assert!(!all.contains_key(ALICE));
}

#[tokio::test]
async fn test_deny_policy_matchers_are_not_edited() {
    let mut body = acp_policy(
        ACR,
        acp::ACCESS_CONTROL,
        &node("mixed"),
        acp::ANY_OF,
        &node("crowd"),
        acp::ALLOW,
        &[acl::READ],
    );
    body.push_str(&nt(&node("mixed"), acp::DENY, acl::WRITE));
    body.push_str(&nt(&node("crowd"), acp::AGENT, ALICE));
    let harness = harness_with(body);

    harness
        .client
        .set_access(&iri(DOC), &Principal::agent(ALICE), NormalizedAccess::NONE)
        .await
        .unwrap();

    let saved = harness.saved(ACR);
    assert!(saved
        .subject(&Term::iri(node("crowd")))
        .has_iri(acp::AGENT, ALICE));
}

#[tokio::test]
async fn test_member_policies_give_default_access() {
    let harness = PodHarness::new();
    harness.resource(NOTES, NOTES_ACR);
    let mut body = acp_policy(
        NOTES_ACR,
        acp::MEMBER_ACCESS_CONTROL,
        &format!("{NOTES_ACR}#members"),
        acp::ANY_OF,
        &format!("{NOTES_ACR}#signed-in"),
        acp::ALLOW,
        &[acl::READ, acl::APPEND],
    );
    body.push_str(&nt(
        &format!("{NOTES_ACR}#signed-in"),
        acp::AGENT,
        acp::AUTHENTICATED_AGENT,
    ));
    harness.acr(NOTES_ACR, body);

    let anonymous = harness
        .client
        .get_default_access(&iri(NOTES), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(anonymous, Some(NormalizedAccess::NONE));

    let alice = harness
        .client
        .get_default_access(&iri(NOTES), &RequestContext::agent(ALICE))
        .await
        .unwrap();
    assert_eq!(alice, Some(access(true, true, false, false, false)));

    // Member policies say nothing about the container itself
    let own = harness
        .client
        .get_access(&iri(NOTES), &RequestContext::agent(ALICE))
        .await
        .unwrap();
    assert_eq!(own, Some(NormalizedAccess::NONE));
}

#[tokio::test]
async fn test_acr_cannot_be_deleted() {
    let harness = harness_with(public_read());
    let err = harness.client.delete_resource_acl(&iri(DOC)).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { scheme: "ACP", .. }));
    assert_eq!(harness.transport.count(Method::Delete, ACR), 0);
}
