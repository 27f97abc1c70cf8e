//! Integration tests for resources governed by WAC documents.

use podgate_client::AccessScheme;
use podgate_core::vocab::{acl, foaf};
use podgate_core::{AccessScope, Error, Method, NormalizedAccess, Principal, RequestContext};
use podgate_wac::AuthorizationDocument;

use crate::common::{ALICE, BOB, PodHarness, access, iri, read_only, wac_rule};

const ROOT: &str = "https://pod.example/";
const A: &str = "https://pod.example/a/";
const B: &str = "https://pod.example/a/b/";
const C: &str = "https://pod.example/a/b/c.ttl";
const C_ACL: &str = "https://pod.example/a/b/c.ttl.acl";

/// `c.ttl` without a document, `b/` without a document, `a/` with one.
fn nested() -> PodHarness {
    let harness = PodHarness::new();
    harness.storage_root(ROOT, "https://pod.example/.acl");
    harness.resource(A, "https://pod.example/a/.acl");
    harness.resource(B, "https://pod.example/a/b/.acl");
    harness.resource(C, C_ACL);
    harness
}

fn public_default_read() -> String {
    wac_rule(
        "https://pod.example/a/.acl#public",
        acl::DEFAULT,
        A,
        (acl::AGENT_CLASS, foaf::AGENT),
        &[acl::READ],
    )
}

#[tokio::test]
async fn test_inherits_public_read_from_grandparent() {
    let harness = nested();
    harness.document("https://pod.example/a/.acl", public_default_read());

    let scheme = harness.client.detect_scheme(&iri(C)).await.unwrap();
    assert_eq!(scheme, Some(AccessScheme::Wac));

    let before = harness.transport.requests().len();
    let result = harness
        .client
        .get_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(result, Some(read_only()));

    // HEAD c.ttl, GET c.ttl.acl, then two ancestor probes
    let probes: Vec<_> = harness.transport.requests()[before..]
        .iter()
        .map(|r| (r.method, r.url.clone()))
        .collect();
    assert_eq!(
        probes,
        vec![
            (Method::Head, C.to_string()),
            (Method::Get, C_ACL.to_string()),
            (Method::Head, B.to_string()),
            (Method::Get, "https://pod.example/a/b/.acl".to_string()),
            (Method::Head, A.to_string()),
            (Method::Get, "https://pod.example/a/.acl".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_inaccessible_parent_document_yields_none() {
    let harness = nested();
    harness.forbidden("https://pod.example/a/b/.acl");
    harness.document("https://pod.example/a/.acl", public_default_read());

    let result = harness
        .client
        .get_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(result, None);
    assert_eq!(harness.transport.count(Method::Head, A), 0);
    assert_eq!(harness.transport.count(Method::Get, "https://pod.example/a/.acl"), 0);
}

#[tokio::test]
async fn test_inaccessible_own_document_yields_no_scheme() {
    let harness = nested();
    harness.forbidden(C_ACL);

    assert_eq!(harness.client.detect_scheme(&iri(C)).await.unwrap(), None);
    assert_eq!(
        harness
            .client
            .get_principal_access(&iri(C), &Principal::Public)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_own_document_agent_access() {
    let harness = nested();
    let mut body = wac_rule(
        "https://pod.example/a/b/c.ttl.acl#alice",
        acl::ACCESS_TO,
        C,
        (acl::AGENT, ALICE),
        &[acl::READ, acl::WRITE],
    );
    body.push_str(&wac_rule(
        "https://pod.example/a/b/c.ttl.acl#bob",
        acl::ACCESS_TO,
        C,
        (acl::AGENT, BOB),
        &[acl::READ],
    ));
    harness.document(C_ACL, body);

    let alice = harness
        .client
        .get_principal_access(&iri(C), &Principal::agent(ALICE))
        .await
        .unwrap();
    assert_eq!(alice, Some(access(true, true, true, false, false)));

    let all = harness.client.get_agent_access_all(&iri(C)).await.unwrap().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[BOB], read_only());

    // A named agent is not the public
    let public = harness
        .client
        .get_principal_access(&iri(C), &Principal::Public)
        .await
        .unwrap();
    assert_eq!(public, Some(NormalizedAccess::NONE));
}

#[tokio::test]
async fn test_control_mode_mismatch_writes_nothing() {
    let harness = nested();
    harness.document(
        C_ACL,
        wac_rule(
            "https://pod.example/a/b/c.ttl.acl#alice",
            acl::ACCESS_TO,
            C,
            (acl::AGENT, ALICE),
            &[acl::READ],
        ),
    );
    harness.accept_writes(C_ACL);

    let err = harness
        .client
        .set_access(
            &iri(C),
            &Principal::agent(ALICE),
            access(true, false, false, true, false),
        )
        .await
        .unwrap_err();
    match &err {
        Error::ControlModeMismatch {
            resource,
            control_read,
            control_write,
        } => {
            assert_eq!(resource, C);
            assert!(*control_read);
            assert!(!*control_write);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("WAC requires controlRead and controlWrite to be equal"));
    assert!(harness.transport.writes().is_empty());
}

#[tokio::test]
async fn test_set_access_derives_document_from_fallback() {
    let harness = nested();
    harness.document("https://pod.example/a/.acl", public_default_read());
    harness.accept_writes(C_ACL);

    let result = harness
        .client
        .set_access(&iri(C), &Principal::agent(ALICE), access(true, true, true, true, true))
        .await
        .unwrap();
    assert_eq!(result, Some(access(true, true, true, true, true)));

    let writes = harness.transport.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].url, C_ACL);

    let saved = AuthorizationDocument::from_dataset(iri(C_ACL), iri(C), harness.saved(C_ACL));
    // The inherited public read now applies to c.ttl directly
    let public = podgate_wac::compute_access(
        &saved,
        &RequestContext::anonymous(),
        AccessScope::Resource,
    );
    assert!(public.read && !public.write);
    let alice = podgate_wac::explicit_access(&saved, &Principal::agent(ALICE), AccessScope::Resource);
    assert!(alice.control && alice.write && alice.append);
    // c.ttl is not a container, so nothing is granted as a default
    assert_eq!(saved.rules_in_scope(AccessScope::Default).count(), 0);
}

#[tokio::test]
async fn test_set_access_without_any_document_writes_nothing() {
    let harness = PodHarness::new();
    harness.resource(C, C_ACL);

    let result = harness
        .client
        .set_access(&iri(C), &Principal::agent(ALICE), read_only())
        .await
        .unwrap();
    assert_eq!(result, None);
    assert!(harness.transport.writes().is_empty());
}

#[tokio::test]
async fn test_revoking_last_principal_removes_rule() {
    let harness = nested();
    harness.document(
        C_ACL,
        wac_rule(
            "https://pod.example/a/b/c.ttl.acl#alice",
            acl::ACCESS_TO,
            C,
            (acl::AGENT, ALICE),
            &[acl::READ, acl::APPEND],
        ),
    );
    harness.accept_writes(C_ACL);

    let result = harness
        .client
        .set_access(&iri(C), &Principal::agent(ALICE), NormalizedAccess::NONE)
        .await
        .unwrap();
    assert_eq!(result, Some(NormalizedAccess::NONE));

    let saved = AuthorizationDocument::from_dataset(iri(C_ACL), iri(C), harness.saved(C_ACL));
    assert!(saved.rules().is_empty());
}

#[tokio::test]
async fn test_default_access_on_container() {
    let harness = nested();
    let mut body = public_default_read();
    body.push_str(&wac_rule(
        "https://pod.example/a/.acl#owner",
        acl::ACCESS_TO,
        A,
        (acl::AGENT, ALICE),
        &[acl::READ, acl::WRITE, acl::CONTROL],
    ));
    harness.document("https://pod.example/a/.acl", body);
    harness.accept_writes("https://pod.example/a/.acl");

    let inherited = harness
        .client
        .get_default_access(&iri(A), &RequestContext::anonymous())
        .await
        .unwrap();
    assert_eq!(inherited, Some(read_only()));

    let granted = harness
        .client
        .set_default_access(&iri(A), &Principal::agent(BOB), read_only())
        .await
        .unwrap();
    assert_eq!(granted, Some(read_only()));

    let saved = AuthorizationDocument::from_dataset(
        iri("https://pod.example/a/.acl"),
        iri(A),
        harness.saved("https://pod.example/a/.acl"),
    );
    let bob = podgate_wac::explicit_access(&saved, &Principal::agent(BOB), AccessScope::Default);
    assert!(bob.read && !bob.write);
    // Alice's own access to the container is untouched
    let alice = podgate_wac::explicit_access(&saved, &Principal::agent(ALICE), AccessScope::Resource);
    assert!(alice.control);
}

#[tokio::test]
async fn test_default_access_requires_container() {
    let harness = nested();
    let err = harness
        .client
        .get_default_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidIri { .. }));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_delete_resource_acl() {
    let harness = nested();
    harness.document(C_ACL, String::new());
    harness.accept_writes(C_ACL);

    assert!(harness.client.delete_resource_acl(&iri(C)).await.unwrap());
    assert_eq!(harness.transport.count(Method::Delete, C_ACL), 1);
}

#[tokio::test]
async fn test_delete_resource_acl_without_own_document() {
    let harness = nested();
    assert!(!harness.client.delete_resource_acl(&iri(C)).await.unwrap());
    assert!(harness.transport.writes().is_empty());
}

#[tokio::test]
async fn test_delete_storage_root_acl_is_refused() {
    let harness = nested();
    harness.document("https://pod.example/.acl", String::new());
    let err = harness.client.delete_resource_acl(&iri(ROOT)).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }));
    assert!(harness.transport.writes().is_empty());
}

#[tokio::test]
async fn test_missing_resource_is_an_error() {
    let harness = PodHarness::new();
    let err = harness
        .client
        .get_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let harness = nested();
    harness.transport.on(
        Method::Get,
        C_ACL,
        podgate_core::HttpResponse::status(503),
    );
    let err = harness
        .client
        .get_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_ancestor_transport_failure_is_not_no_access() {
    let harness = nested();
    harness.transport.fail(Method::Head, B, "connection reset");

    let err = harness
        .client
        .get_access(&iri(C), &RequestContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }), "{err:?}");
    assert!(err.is_retryable());
    assert_eq!(harness.transport.count(Method::Get, "https://pod.example/a/.acl"), 0);

    let err = harness
        .client
        .set_access(&iri(C), &Principal::agent(ALICE), read_only())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
    assert!(harness.transport.writes().is_empty());
}
