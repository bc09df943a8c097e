//! OAuth 1.0a request signing with HMAC-SHA1, as required by the Twitter v1.1 API.
//!
//! See [RFC 5849](https://datatracker.ietf.org/doc/html/rfc5849#section-3.4) for the
//! construction of the signature base string.

use std::iter;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use itertools::Itertools;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LENGTH: usize = 32;

/// Everything but the unreserved characters of section 2.3 of RFC 3986.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Consumer and access token pairs used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SigningError {
    #[error("the url `{0}` has no host")]
    MissingHost(Url),
    #[error("the url query is not in urlencoded format")]
    InvalidQuery,
    /// Never produced for HMAC-SHA1, which accepts keys of any length.
    #[error("invalid signing key")]
    InvalidKey,
}

#[derive(Debug, Clone)]
pub struct OAuthSigner {
    credentials: Credentials,
}

impl OAuthSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Value of the `Authorization` header for a request, with a fresh nonce and timestamp.
    ///
    /// `extra_params` are the `application/x-www-form-urlencoded` body parameters, if any.
    /// Query parameters are taken from `url`.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &Url,
        extra_params: &[(String, String)],
    ) -> Result<String, SigningError> {
        self.authorization_header_at(method, url, extra_params, &nonce(), timestamp())
    }

    pub(crate) fn authorization_header_at(
        &self,
        method: &str,
        url: &Url,
        extra_params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String, SigningError> {
        let timestamp = timestamp.to_string();
        let oauth_params = self.oauth_params(nonce, &timestamp);

        let base_string = signature_base_string(method, url, &oauth_params, extra_params)?;
        let signature = self.sign(&base_string)?;

        let header = oauth_params
            .iter()
            .copied()
            .chain(iter::once(("oauth_signature", signature.as_str())))
            .sorted_by_key(|(key, _)| *key)
            .map(|(key, value)| format!("{key}=\"{}\"", encode(value)))
            .join(", ");

        Ok(format!("OAuth {header}"))
    }

    fn oauth_params<'a>(&'a self, nonce: &'a str, timestamp: &'a str) -> [(&'a str, &'a str); 6] {
        [
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.credentials.token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ]
    }

    fn sign(&self, base_string: &str) -> Result<String, SigningError> {
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );

        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SigningError::InvalidKey)?;
        mac.update(base_string.as_bytes());

        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// Builds `METHOD&base_url&parameters`, every part percent-encoded.
pub(crate) fn signature_base_string(
    method: &str,
    url: &Url,
    oauth_params: &[(&str, &str)],
    extra_params: &[(String, String)],
) -> Result<String, SigningError> {
    let query: Vec<(String, String)> = serde_urlencoded::from_str(url.query().unwrap_or_default())
        .map_err(|_| SigningError::InvalidQuery)?;

    let parameters = oauth_params
        .iter()
        .map(|(key, value)| (encode(key), encode(value)))
        .chain(
            query
                .iter()
                .chain(extra_params)
                .map(|(key, value)| (encode(key), encode(value))),
        )
        .sorted()
        .map(|(key, value)| format!("{key}={value}"))
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_url(url)?),
        encode(&parameters)
    ))
}

/// Scheme, authority and path. The url crate already drops default ports and lowercases the host.
fn base_url(url: &Url) -> Result<String, SigningError> {
    let host = url
        .host_str()
        .ok_or_else(|| SigningError::MissingHost(url.clone()))?;

    Ok(match url.port() {
        Some(port) => format!("{}://{host}:{port}{}", url.scheme(), url.path()),
        None => format!("{}://{host}{}", url.scheme(), url.path()),
    })
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect()
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
