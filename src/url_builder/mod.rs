//! URL builder
//!
//! Assembles delivery URLs from an endpoint, an asset path (or an absolute
//! source URL), extra query parameters and a compiled transformation chain.
//!
//! # URL Formats
//!
//! ## Path placement (default)
//! ```text
//! https://ik.imagekit.io/demo/tr:w-300,h-200/folder/image.jpg
//! ```
//!
//! ## Query placement, and every absolute `src` URL
//! ```text
//! https://ik.imagekit.io/demo/folder/image.jpg?tr=w-300%2Ch-200
//! ```
//!
//! # Signing
//!
//! Signed URLs carry `ik-s` (and `ik-t` when they expire). The signature
//! covers the emitted, percent-encoded URL relative to the endpoint plus the
//! expiry.

use std::collections::BTreeMap;

use tracing::debug;
use url::Url;

use crate::config::{ClientOptions, TransformationPosition};
use crate::constants::{
    DEFAULT_URL_EXPIRY_TIMESTAMP, SIGNED_URL_EXPIRY_PARAMETER, SIGNED_URL_SIGNATURE_PARAMETER,
    TRANSFORMATION_PARAMETER,
};
use crate::error::{ImageKitError, Result};
use crate::signature::sign_url;
use crate::transformation::{compile, TransformationChain};

/// Query parameters the builder emits itself
const RESERVED_QUERY_PARAMETERS: [&str; 3] = [
    TRANSFORMATION_PARAMETER,
    SIGNED_URL_EXPIRY_PARAMETER,
    SIGNED_URL_SIGNATURE_PARAMETER,
];

/// Options for a single URL
#[derive(Debug, Clone, Default)]
pub struct UrlOptions {
    /// Asset path under the endpoint; exclusive with `src`
    pub path: Option<String>,
    /// Absolute asset URL; exclusive with `path`
    pub src: Option<String>,
    /// Overrides the client's endpoint for this URL
    pub url_endpoint: Option<String>,
    pub transformation: TransformationChain,
    /// Overrides the client's default placement
    pub transformation_position: Option<TransformationPosition>,
    /// Extra query parameters; `tr`, `ik-t` and `ik-s` are reserved
    pub query_parameters: BTreeMap<String, String>,
    pub signed: bool,
    /// Validity window of a signed URL; `None` never expires
    pub expire_seconds: Option<i64>,
}

impl UrlOptions {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn for_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    pub fn with_url_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.url_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_transformation(mut self, chain: impl Into<TransformationChain>) -> Self {
        self.transformation = chain.into();
        self
    }

    pub fn with_transformation_position(mut self, position: TransformationPosition) -> Self {
        self.transformation_position = Some(position);
        self
    }

    pub fn with_query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(key.into(), value.into());
        self
    }

    pub fn signed(mut self, expire_seconds: Option<i64>) -> Self {
        self.signed = true;
        self.expire_seconds = expire_seconds;
        self
    }
}

/// Build a URL using the current time for signed expiries
pub fn build_url(options: &UrlOptions, client: &ClientOptions) -> Result<String> {
    build_url_at(options, client, chrono::Utc::now().timestamp())
}

/// Build a URL with an explicit clock
///
/// Identical inputs always produce identical output.
pub fn build_url_at(options: &UrlOptions, client: &ClientOptions, now: i64) -> Result<String> {
    let endpoint = options
        .url_endpoint
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or(&client.url_endpoint);

    let path = options.path.as_deref().filter(|p| !p.is_empty());
    let src = options.src.as_deref().filter(|s| !s.is_empty());

    let compiled = compile(&options.transformation)?;
    let position = options
        .transformation_position
        .unwrap_or(client.transformation_position);

    let (mut url, transformation_in_query) = match (path, src) {
        (Some(_), Some(_)) => {
            return Err(ImageKitError::configuration(
                "path and src are mutually exclusive",
            ))
        }
        (None, None) => {
            return Err(ImageKitError::configuration(
                "either path or src is required to build a URL",
            ))
        }
        (Some(path), None) => {
            let in_query = position == TransformationPosition::Query;
            let segment = (!in_query && !compiled.is_empty())
                .then(|| format!("{}:{}", TRANSFORMATION_PARAMETER, compiled));
            (join_endpoint(endpoint, segment.as_deref(), path)?, in_query)
        }
        (None, Some(src)) => {
            let url = Url::parse(src).map_err(|e| {
                ImageKitError::configuration(format!("Invalid src URL '{}': {}", src, e))
            })?;
            (url, true)
        }
    };

    if let Some(reserved) = options
        .query_parameters
        .keys()
        .find(|k| RESERVED_QUERY_PARAMETERS.contains(&k.as_str()))
    {
        return Err(ImageKitError::configuration(format!(
            "query parameter '{}' is reserved for the URL builder",
            reserved
        )));
    }

    let mut pairs: Vec<(&str, &str)> = options
        .query_parameters
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    if transformation_in_query && !compiled.is_empty() {
        pairs.push((TRANSFORMATION_PARAMETER, compiled.as_str()));
    }
    append_query(&mut url, &pairs);

    if options.signed {
        let expiry = match options.expire_seconds {
            Some(seconds) => expiry_timestamp(now, seconds)?,
            None => DEFAULT_URL_EXPIRY_TIMESTAMP,
        };

        let signature = sign_url(url.as_str(), endpoint, expiry, &client.private_key)?;

        let expiry = expiry.to_string();
        let mut signed_pairs = Vec::with_capacity(2);
        if options.expire_seconds.is_some() {
            signed_pairs.push((SIGNED_URL_EXPIRY_PARAMETER, expiry.as_str()));
        }
        signed_pairs.push((SIGNED_URL_SIGNATURE_PARAMETER, signature.as_str()));
        append_query(&mut url, &signed_pairs);
    }

    let built = url.to_string();
    debug!(url = %built, signed = options.signed, "Built URL");
    Ok(built)
}

fn expiry_timestamp(now: i64, expire_seconds: i64) -> Result<i64> {
    if expire_seconds < 0 {
        return Err(ImageKitError::configuration(format!(
            "expireSeconds must not be negative, got {}",
            expire_seconds
        )));
    }
    now.checked_add(expire_seconds).ok_or_else(|| {
        ImageKitError::configuration(format!(
            "expireSeconds {} overflows the expiry timestamp",
            expire_seconds
        ))
    })
}

fn join_endpoint(endpoint: &str, segment: Option<&str>, path: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|e| {
        ImageKitError::configuration(format!("Invalid urlEndpoint '{}': {}", endpoint, e))
    })?;
    if url.cannot_be_a_base() {
        return Err(ImageKitError::configuration(format!(
            "Invalid urlEndpoint '{}': not a base URL",
            endpoint
        )));
    }

    let mut joined = String::from(url.path());
    for part in segment.into_iter().chain(std::iter::once(path)) {
        joined.push('/');
        joined.push_str(part);
    }

    url.set_path(&collapse_slashes(&joined));
    Ok(url)
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

// An untouched query stays `None`; `query_pairs_mut` would leave a bare `?`.
fn append_query(url: &mut Url, pairs: &[(&str, &str)]) {
    if pairs.is_empty() {
        return;
    }
    url.query_pairs_mut().extend_pairs(pairs.iter().copied());
}
