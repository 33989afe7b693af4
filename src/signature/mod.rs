//! Request signing
//!
//! Provides:
//! - Upload authentication parameters (token, expiry, HMAC-SHA1 signature)
//! - Signed URL signatures used by the URL builder
//!
//! Both signatures are lowercase hex HMAC-SHA1 keyed with the account's
//! private key, which is what the service verifies against.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use url::Url;
use uuid::Uuid;

use crate::constants::DEFAULT_AUTH_EXPIRY_SECONDS;
use crate::error::{ImageKitError, Result};

type HmacSha1 = Hmac<Sha1>;

/// Parameters a browser or mobile client needs to upload directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationParameters {
    pub token: String,
    pub expire: i64,
    pub signature: String,
}

/// Generate upload authentication parameters
///
/// A missing `token` is replaced with a random UUID v4, a missing `expire`
/// with now plus 30 minutes.
///
/// ```text
/// signature = hex(HMAC-SHA1(private_key, token + expire))
/// ```
pub fn get_authentication_parameters(
    token: Option<&str>,
    expire: Option<i64>,
    private_key: &str,
) -> Result<AuthenticationParameters> {
    let now = chrono::Utc::now().timestamp();
    get_authentication_parameters_at(token, expire, private_key, now)
}

/// [`get_authentication_parameters`] with an explicit clock
pub fn get_authentication_parameters_at(
    token: Option<&str>,
    expire: Option<i64>,
    private_key: &str,
    now: i64,
) -> Result<AuthenticationParameters> {
    if private_key.is_empty() {
        return Err(ImageKitError::configuration(
            "privateKey is required to generate authentication parameters",
        ));
    }

    let token = match token {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    let expire = expire.unwrap_or(now + DEFAULT_AUTH_EXPIRY_SECONDS);

    let signature = hmac_sha1_hex(private_key, &format!("{}{}", token, expire));

    Ok(AuthenticationParameters {
        token,
        expire,
        signature,
    })
}

/// Signature for a signed URL
///
/// `url` is the URL exactly as emitted (percent-encoded). The string to sign
/// is `url` with the `<url_endpoint>/` prefix removed, followed by the decimal
/// expiry timestamp. The endpoint is compared in its parsed form, so
/// `https://IK.imagekit.io:443/demo` strips the same prefix as
/// `https://ik.imagekit.io/demo`.
pub fn sign_url(url: &str, url_endpoint: &str, expiry: i64, private_key: &str) -> Result<String> {
    if private_key.is_empty() {
        return Err(ImageKitError::configuration(
            "privateKey is required to sign URLs",
        ));
    }

    let endpoint = Url::parse(url_endpoint).map_err(|e| {
        ImageKitError::configuration(format!("Invalid urlEndpoint '{}': {}", url_endpoint, e))
    })?;
    let prefix = format!("{}/", endpoint.as_str().trim_end_matches('/'));
    let relative = url.strip_prefix(prefix.as_str()).unwrap_or(url);

    Ok(hmac_sha1_hex(private_key, &format!("{}{}", relative, expiry)))
}

fn hmac_sha1_hex(key: &str, message: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
