// src/post/oauth.rs
//
// OAuth 1.0a (HMAC-SHA1) request signing, user context.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distr::Alphanumeric, Rng};
use sha1::Sha1;

use super::PostError;
use crate::config::consts::{ENV_ACCESS_SECRET, ENV_ACCESS_TOKEN, ENV_CONSUMER_KEY, ENV_CONSUMER_SECRET};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}

#[derive(Clone)]
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
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, PostError> {
        let var = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(PostError::MissingCredential(name))
        };
        Ok(Self {
            consumer_key: var(ENV_CONSUMER_KEY)?,
            consumer_secret: var(ENV_CONSUMER_SECRET)?,
            token: var(ENV_ACCESS_TOKEN)?,
            token_secret: var(ENV_ACCESS_SECRET)?,
        })
    }
}

pub fn nonce() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// METHOD&url&params, with params percent-encoded and sorted.
pub fn signature_base(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    let param_str = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}&{}&{}", method.to_ascii_uppercase(), encode(url), encode(&param_str))
}

pub fn sign(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String, PostError> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| PostError::Signing(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// `Authorization: OAuth ...` value. `extra` holds query (or form) parameters
/// that take part in the signature; JSON bodies don't.
pub fn authorization(
    creds: &Credentials,
    method: &str,
    url: &str,
    extra: &[(&str, &str)],
    nonce: &str,
    timestamp: i64,
) -> Result<String, PostError> {
    let timestamp = timestamp.to_string();
    let mut oauth: Vec<(String, String)> = vec![
        (s!("oauth_consumer_key"), creds.consumer_key.clone()),
        (s!("oauth_nonce"), s!(nonce)),
        (s!("oauth_signature_method"), s!("HMAC-SHA1")),
        (s!("oauth_timestamp"), timestamp),
        (s!("oauth_token"), creds.token.clone()),
        (s!("oauth_version"), s!("1.0")),
    ];

    let mut all = oauth.clone();
    all.extend(extra.iter().map(|(k, v)| (s!(*k), s!(*v))));
    let base = signature_base(method, url, &all);
    oauth.push((s!("oauth_signature"), sign(&base, &creds.consumer_secret, &creds.token_secret)?));

    let fields = oauth
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}
