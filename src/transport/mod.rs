//! HTTP transport
//!
//! Every remote operation is expressed as an [`ApiRequest`] and handed to a
//! [`Transport`]. The transport only moves bytes: it reports any HTTP status
//! as a successful [`ApiResponse`] and leaves status interpretation to the
//! client. [`ReqwestTransport`] is the production implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value as JsonValue;

use crate::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::error::{ImageKitError, Result};

/// HTTP method of an API request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl FormField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        FormField::Text {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(JsonValue),
    Multipart(Vec<FormField>),
}

/// A request ready to be performed
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_json(mut self, body: JsonValue) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_form(mut self, fields: Vec<FormField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and headers of a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
}

impl ResponseMeta {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Response body (parsed JSON, or `Null` when empty) plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub body: JsonValue,
    pub meta: ResponseMeta,
}

impl ApiResponse {
    pub fn new(status: u16, body: JsonValue) -> Self {
        Self {
            body,
            meta: ResponseMeta {
                status,
                headers: BTreeMap::new(),
            },
        }
    }
}

/// Performs API requests
///
/// Implementations must be `Send + Sync`; a client shares one transport
/// across all of its operations.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns `ImageKitError::Configuration` if the HTTP client cannot be
    /// created (TLS backend initialisation failure).
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                ImageKitError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ImageKitError::Transport(format!("Request timed out: {}", e))
            } else if e.is_connect() {
                ImageKitError::Transport(format!("Failed to connect: {}", e))
            } else {
                ImageKitError::Transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let text = response
            .text()
            .await
            .map_err(|e| ImageKitError::Transport(format!("Failed to read response: {}", e)))?;

        Ok(ApiResponse {
            body: parse_body(&text),
            meta: ResponseMeta { status, headers },
        })
    }
}

fn build_form(fields: Vec<FormField>) -> Form {
    fields.into_iter().fold(Form::new(), |form, field| match field {
        FormField::Text { name, value } => form.text(name, value),
        FormField::File {
            name,
            file_name,
            bytes,
        } => form.part(name, Part::bytes(bytes).file_name(file_name)),
    })
}

fn parse_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}
