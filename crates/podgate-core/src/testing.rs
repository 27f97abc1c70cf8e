//! In-memory transport for tests.
//!
//! Responses are scripted per `(method, url)`; anything unscripted answers
//! 404. Every request is recorded so tests can count probes and check that
//! nothing was written.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Clone, Debug)]
enum Scripted {
    Respond(HttpResponse),
    Fail(String),
}

/// A [`Transport`] that replays scripted responses.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(Method, String), Scripted>>,
    history: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// A transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method url` with `response`, replacing any earlier script.
    pub fn on(&self, method: Method, url: impl Into<String>, response: HttpResponse) {
        self.lock_routes()
            .insert((method, url.into()), Scripted::Respond(response));
    }

    /// Fail `method url` with a transport error.
    pub fn fail(&self, method: Method, url: impl Into<String>, message: impl Into<String>) {
        self.lock_routes()
            .insert((method, url.into()), Scripted::Fail(message.into()));
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock_history().clone()
    }

    /// Received `PUT` and `DELETE` requests.
    pub fn writes(&self) -> Vec<HttpRequest> {
        self.lock_history()
            .iter()
            .filter(|r| matches!(r.method, Method::Put | Method::Delete))
            .cloned()
            .collect()
    }

    /// Number of `method url` requests received.
    pub fn count(&self, method: Method, url: &str) -> usize {
        self.lock_history()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    fn lock_routes(&self) -> std::sync::MutexGuard<'_, HashMap<(Method, String), Scripted>> {
        self.routes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, Vec<HttpRequest>> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let scripted = self
            .lock_routes()
            .get(&(request.method, request.url.clone()))
            .cloned();
        let method = request.method;
        self.lock_history().push(request);
        match scripted {
            Some(Scripted::Respond(mut response)) => {
                if method == Method::Head {
                    response.body.clear();
                }
                Ok(response)
            }
            Some(Scripted::Fail(message)) => Err(Error::transport(message)),
            None => Ok(HttpResponse::status(404)),
        }
    }
}
