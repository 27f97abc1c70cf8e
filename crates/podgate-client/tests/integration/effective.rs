//! Integration tests for server-reported access.

use podgate_core::{AccessModes, Mode};

use crate::common::{PodHarness, iri};

const DOC: &str = "https://pod.example/notes/doc.ttl";

#[tokio::test]
async fn test_wac_allow_header() {
    let harness = PodHarness::new();
    harness.bare_resource(DOC, &[("WAC-Allow", "user=\"read write\",public=\"read\"")]);

    let effective = harness.client.get_effective_access(&iri(DOC)).await.unwrap();
    assert!(effective.user.has(Mode::Read));
    assert!(effective.user.has(Mode::Write));
    assert!(effective.user.has(Mode::Append));
    assert!(!effective.user.has(Mode::Control));
    assert_eq!(effective.public, AccessModes::READ);
}

#[tokio::test]
async fn test_missing_wac_allow_header_grants_nothing() {
    let harness = PodHarness::new();
    harness.bare_resource(DOC, &[]);

    let effective = harness.client.get_effective_access(&iri(DOC)).await.unwrap();
    assert!(effective.user.is_empty());
    assert!(effective.public.is_empty());
}

#[tokio::test]
async fn test_resource_without_acl_link_has_no_scheme() {
    let harness = PodHarness::new();
    harness.bare_resource(DOC, &[]);

    assert_eq!(harness.client.detect_scheme(&iri(DOC)).await.unwrap(), None);
    assert!(harness.transport.writes().is_empty());
}
