//! Blocking execution of template requests.
//!
//! # Design
//! `Transport` is the seam between the pure `TemplateClient` and the network.
//! `UreqTransport` performs one HTTP exchange per call with the agent's
//! default timeouts and no retries; non-2xx statuses come back as data so
//! the client decides what they mean. `TemplateApi` glues a client and a
//! transport into the six one-shot operations and logs each outcome.

use tracing::{debug, info, warn};

use crate::client::TemplateClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Template, TemplateList};

/// Executes a single `HttpRequest`.
///
/// Implementations return `ApiError::Network` only when no response was
/// obtained; any status code, including 4xx/5xx, is a successful exchange.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.path.as_str();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), &request.headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(url), &request.headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(url), &request.headers), body),
        };
        let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        // Reading to the end releases the connection on every status.
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Non-UTF-8 bytes in a value are replaced rather than dropped.
fn header_pairs(headers: &ureq::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// One-shot template operations over a `Transport`.
///
/// Every method performs exactly one request. Nothing is cached between
/// calls, so a `TemplateApi` can be shared freely when its transport can.
#[derive(Debug, Clone)]
pub struct TemplateApi<T = UreqTransport> {
    client: TemplateClient,
    transport: T,
}

impl TemplateApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::new(config.client()?, UreqTransport::new()))
    }
}

impl<T: Transport> TemplateApi<T> {
    pub fn new(client: TemplateClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TemplateClient {
        &self.client
    }

    /// Creates `template` and returns the id the server assigned.
    pub fn create_template(&self, template: &Template) -> Result<i64, ApiError> {
        let request = self.client.build_create_template(template)?;
        self.send(request)
            .and_then(|response| self.client.parse_create_template(response))
            .inspect(|id| info!(template_id = *id, name = %template.name, "Template created"))
            .inspect_err(|err| {
                warn!(error = %err, name = %template.name, "Failed to create template")
            })
    }

    pub fn get_template(&self, id: i64) -> Result<Template, ApiError> {
        let request = self.client.build_get_template(id);
        self.send(request)
            .and_then(|response| self.client.parse_get_template(response))
            .inspect(|_| info!(template_id = id, "Template fetched"))
            .inspect_err(|err| warn!(error = %err, template_id = id, "Failed to get template"))
    }

    /// Replaces the stored template keyed by `template.id`.
    pub fn update_template(&self, template: &Template) -> Result<(), ApiError> {
        let request = self.client.build_update_template(template)?;
        self.send(request)
            .and_then(|response| self.client.parse_update_template(response))
            .inspect(|_| info!(template_id = ?template.id, "Template updated"))
            .inspect_err(|err| {
                warn!(error = %err, template_id = ?template.id, "Failed to update template")
            })
    }

    /// Succeeds on any 200 response, even one whose body reports an error code.
    pub fn delete_template(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_template(id);
        self.send(request)
            .and_then(|response| self.client.parse_delete_template(response))
            .inspect(|_| info!(template_id = id, "Template deleted"))
            .inspect_err(|err| warn!(error = %err, template_id = id, "Failed to delete template"))
    }

    pub fn list_templates(&self, offset: i64, count: i64) -> Result<TemplateList, ApiError> {
        let request = self.client.build_list_templates(offset, count);
        self.send(request)
            .and_then(|response| self.client.parse_list_templates(response))
            .inspect(|list| {
                info!(
                    returned = list.templates.len(),
                    total = list.total_count,
                    "Templates listed"
                )
            })
            .inspect_err(|err| warn!(error = %err, offset, count, "Failed to list templates"))
    }

    /// Succeeds on any 200 response, even one whose body reports an error code.
    pub fn validate_template(&self, template: &Template) -> Result<(), ApiError> {
        let request = self.client.build_validate_template(template)?;
        self.send(request)
            .and_then(|response| self.client.parse_validate_template(response))
            .inspect(|_| info!(name = %template.name, "Template validated"))
            .inspect_err(|err| {
                warn!(error = %err, name = %template.name, "Failed to validate template")
            })
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.path, "Sending request");
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }
}
