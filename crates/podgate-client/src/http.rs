//! `reqwest`-backed transport.

use std::time::Duration;

use async_trait::async_trait;

use podgate_core::{Error, HttpRequest, HttpResponse, Method, Result, Transport};

use crate::config::ClientConfig;

/// Sends requests over HTTPS with a shared connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    bearer_token: Option<String>,
    headers: Vec<(String, String)>,
}

impl HttpTransport {
    /// Build a transport from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::transport_with_source("Failed to build HTTP client", e))?;
        Ok(Self {
            client,
            bearer_token: config.bearer_token.clone(),
            headers: config
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(method(request.method), &request.url);
        for (name, value) in self.headers.iter().chain(&request.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport_with_source(format!("{} {} failed", request.method, request.url), e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| match value.to_str() {
                Ok(value) => Some((name.as_str().to_string(), value.to_string())),
                Err(_) => {
                    log::warn!("Dropping non-text {name} header from {}", request.url);
                    None
                }
            })
            .collect();
        let body = response.text().await.map_err(|e| {
            Error::transport_with_source(format!("Reading body of {} failed", request.url), e)
        })?;
        log::debug!("{} {} -> {status}", request.method, request.url);

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
