//! HTTP transport
//! Defined as trait so that the client can be tested without network(using mock)
use anyhow::Result;
use log::debug;
use url::Url;

use crate::error::XError;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// A signed request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: Url,
    pub authorization: String,
    pub body: RequestBody,
}

/// Status and raw body, non-2xx responses are returned as well
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
use mockall::automock;
#[cfg_attr(test, automock)]
pub trait HttpTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by [`ureq::Agent`]
/// No timeout is set, the agent defaults apply
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent: ureq::Agent = ureq::AgentBuilder::new()
            .user_agent(concat!("xpost/", env!("CARGO_PKG_VERSION")))
            .build();
        UreqTransport { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!("{} {}", request.method, request.url);
        let call = self
            .agent
            .request_url(request.method, &request.url)
            .set("Authorization", &request.authorization);

        let result = match &request.body {
            RequestBody::Empty => call.call(),
            RequestBody::Json(value) => call
                .set("Content-Type", "application/json")
                .send_string(&serde_json::to_string(value)?),
            RequestBody::Form(pairs) => {
                let pairs: Vec<(&str, &str)> = pairs
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                call.send_form(&pairs)
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(e) => return Err(XError::Transport(e.to_string()).into()),
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| XError::Transport(e.to_string()))?;
        debug!("Got: {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}
