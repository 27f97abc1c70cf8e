//! Common test utilities and harness for podgate-client integration tests.

use std::sync::Arc;

use podgate_client::AccessClient;
use podgate_core::testing::ScriptedTransport;
use podgate_core::vocab::{acl, acp, pim, rdf};
use podgate_core::{
    Dataset, HttpResponse, Method, NormalizedAccess, Pod, RdfCodec, ResourceIri, TurtleCodec,
};

pub const ALICE: &str = "https://alice.example/profile#me";
pub const BOB: &str = "https://bob.example/profile#me";

/// A scripted pod and a client talking to it.
pub struct PodHarness {
    /// Scripted responses and request history
    pub transport: Arc<ScriptedTransport>,
    /// Client under test
    pub client: AccessClient,
}

impl PodHarness {
    /// An empty pod: every request answers 404 until scripted.
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let client = AccessClient::new(Pod::new(transport.clone()));
        Self { transport, client }
    }

    /// `url` exists and links its ACL at `acl_url`.
    pub fn resource(&self, url: &str, acl_url: &str) {
        self.transport.on(Method::Head, url, linked(acl_url));
    }

    /// `url` is the storage root and links its ACL at `acl_url`.
    pub fn storage_root(&self, url: &str, acl_url: &str) {
        let response = linked(acl_url).with_header(
            "Link",
            format!("<{}>; rel=\"type\"", pim::STORAGE),
        );
        self.transport.on(Method::Head, url, response);
    }

    /// `url` exists with the given headers and no ACL link.
    pub fn bare_resource(&self, url: &str, headers: &[(&str, &str)]) {
        let response = headers
            .iter()
            .fold(HttpResponse::status(200), |r, (k, v)| r.with_header(*k, *v));
        self.transport.on(Method::Head, url, response);
    }

    /// A WAC document at `url`.
    pub fn document(&self, url: &str, body: String) {
        self.transport
            .on(Method::Get, url, HttpResponse::status(200).with_body(body));
    }

    /// An ACR at `url`, announced through its `Link` type.
    pub fn acr(&self, url: &str, body: String) {
        let response = HttpResponse::status(200)
            .with_header(
                "Link",
                format!("<{}>; rel=\"type\"", acp::ACCESS_CONTROL_RESOURCE),
            )
            .with_body(body);
        self.transport.on(Method::Get, url, response);
    }

    /// Reading `url` is forbidden.
    pub fn forbidden(&self, url: &str) {
        self.transport
            .on(Method::Get, url, HttpResponse::status(403));
    }

    /// `url` accepts `PUT` and `DELETE`.
    pub fn accept_writes(&self, url: &str) {
        self.transport
            .on(Method::Put, url, HttpResponse::status(201));
        self.transport
            .on(Method::Delete, url, HttpResponse::status(204));
    }

    /// Contents of the last `PUT` to `url`.
    pub fn saved(&self, url: &str) -> Dataset {
        let request = self
            .transport
            .writes()
            .into_iter()
            .rev()
            .find(|r| r.method == Method::Put && r.url == url)
            .expect("document should have been saved");
        TurtleCodec
            .parse(request.body.as_deref().unwrap_or(""), &iri(url))
            .unwrap()
    }
}

impl Default for PodHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn linked(acl_url: &str) -> HttpResponse {
    HttpResponse::status(200).with_header("Link", format!("<{acl_url}>; rel=\"acl\""))
}

pub fn iri(s: &str) -> ResourceIri {
    ResourceIri::parse(s).unwrap()
}

/// One statement between IRIs, in the N-Triples subset of Turtle.
pub fn nt(subject: &str, predicate: &str, object: &str) -> String {
    format!("<{subject}> <{predicate}> <{object}> .\n")
}

/// A WAC rule `id` granting `modes` on `target` to one principal.
///
/// `scope` is `acl:accessTo` or `acl:default`; `principal` is a predicate
/// and object such as `(acl::AGENT, ALICE)`.
pub fn wac_rule(
    id: &str,
    scope: &str,
    target: &str,
    principal: (&str, &str),
    modes: &[&str],
) -> String {
    let mut body = nt(id, rdf::TYPE, acl::AUTHORIZATION);
    body.push_str(&nt(id, scope, target));
    body.push_str(&nt(id, principal.0, principal.1));
    for mode in modes {
        body.push_str(&nt(id, acl::MODE, mode));
    }
    body
}

/// An ACP policy `id` at `attachment` (an `acp:accessControl`-style
/// predicate) of `acr`, allowing or denying `modes` to `matcher`.
pub fn acp_policy(
    acr: &str,
    attachment: &str,
    id: &str,
    combinator: &str,
    matcher: &str,
    effect: &str,
    modes: &[&str],
) -> String {
    let ac = format!("{id}-ac");
    let mut body = nt(acr, attachment, &ac);
    body.push_str(&nt(&ac, acp::APPLY, id));
    body.push_str(&nt(id, rdf::TYPE, acp::POLICY));
    body.push_str(&nt(id, combinator, matcher));
    for mode in modes {
        body.push_str(&nt(id, effect, mode));
    }
    body
}

/// `NormalizedAccess` from its five bits.
pub fn access(
    read: bool,
    append: bool,
    write: bool,
    control_read: bool,
    control_write: bool,
) -> NormalizedAccess {
    NormalizedAccess {
        read,
        append,
        write,
        control_read,
        control_write,
    }
}

pub fn read_only() -> NormalizedAccess {
    access(true, false, false, false, false)
}
