//! OAuth 1.0a request signing (HMAC-SHA1)
//! The token pair is pre-provisioned, so only the per-request signature is computed here
//! ref: <https://developer.twitter.com/en/docs/authentication/oauth-1-0a/creating-a-signature>
use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use url::Url;
use uuid::Uuid;

use crate::credential::Credentials;

const OAUTH_SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Percent-encode for OAuth
/// Only `A-Z a-z 0-9 - . _ ~` stay as they are, everything else(including space) becomes `%XX`
pub fn percent_encode(src: &str) -> Cow<'_, str> {
    urlencoding::encode(src)
}

/// Per-request values which must never be reused between two calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthStamp {
    pub nonce: String,
    pub timestamp: u64,
}

impl OAuthStamp {
    pub fn fresh() -> OAuthStamp {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        OAuthStamp {
            nonce: Uuid::new_v4().simple().to_string(),
            timestamp,
        }
    }
}

/// Signs requests with the consumer key/secret and access token/secret
pub struct OAuthSigner<'a> {
    credentials: &'a Credentials,
}

impl<'a> OAuthSigner<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        OAuthSigner { credentials }
    }

    /// Build the `Authorization` header value for the request
    /// * method: HTTP method e.g. `POST`
    /// * url: target url, query pairs in it are signed as well
    /// * params: form parameters of the body, JSON bodies are never signed
    pub fn sign(&self, method: &str, url: &Url, params: &[(&str, &str)]) -> String {
        self.sign_with(method, url, params, &OAuthStamp::fresh())
    }

    /// Same as [`OAuthSigner::sign()`] with a given nonce and timestamp
    pub fn sign_with(
        &self,
        method: &str,
        url: &Url,
        params: &[(&str, &str)],
        stamp: &OAuthStamp,
    ) -> String {
        let timestamp = stamp.timestamp.to_string();
        let oauth_params = self.oauth_params(&stamp.nonce, &timestamp);

        let base_string = signature_base_string(method, url, &oauth_params, params);
        debug!(
            "Signing {} {} ({} bytes of signature data)",
            method,
            url,
            base_string.len()
        );
        let signature = self.signature(&base_string);

        let header_fields: Vec<String> = oauth_params
            .iter()
            .copied()
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(key, value)| (key, percent_encode(value)))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into_iter()
            .map(|(key, value)| format!("{}=\"{}\"", key, value))
            .collect();
        format!("OAuth {}", header_fields.join(", "))
    }

    fn oauth_params<'s>(&'s self, nonce: &'s str, timestamp: &'s str) -> [(&'s str, &'s str); 6] {
        [
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", OAUTH_SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ]
    }

    /// `enc(consumer_secret)&enc(access_token_secret)`
    fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.access_token_secret)
        )
    }

    fn signature(&self, base_string: &str) -> String {
        let hmac_digest =
            hmacsha1::hmac_sha1(self.signing_key().as_bytes(), base_string.as_bytes());
        base64::encode(hmac_digest)
    }
}

/// Sorted and joined parameter string, sorted by encoded key and then encoded value
fn parameter_string(params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(Cow<'_, str>, Cow<'_, str>)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// `METHOD&enc(url without query)&enc(sorted parameters)`
fn signature_base_string(
    method: &str,
    url: &Url,
    oauth_params: &[(&str, &str)],
    params: &[(&str, &str)],
) -> String {
    let query_pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let all_params: Vec<(&str, &str)> = oauth_params
        .iter()
        .chain(params.iter())
        .copied()
        .chain(
            query_pairs
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
        .collect();

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(base_url.as_str()),
        percent_encode(&parameter_string(&all_params))
    )
}
