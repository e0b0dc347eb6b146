// src/post/mod.rs
//
// Posting the status: a small blocking client over the v2 API.
// Failures are reported as `PostError` and never retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::consts::{API_ROOT, REQUEST_TIMEOUT_SECS, STATUS_MAX_CHARS, TIMELINE_PAGE, USER_AGENT};
use crate::status;

pub mod oauth;

pub use oauth::Credentials;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("environment variable {0} is not set")]
    MissingCredential(&'static str),
    #[error("could not sign request: {0}")]
    Signing(String),
    #[error("credentials rejected ({status}): {body}")]
    Unauthorized { status: u16, body: String },
    #[error("rate limited; try again later")]
    RateLimited,
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("status is {chars} characters, over the {max} limit")]
    TooLong { chars: usize, max: usize },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Serialize)]
struct NewPost<'a> {
    text: &'a str,
}

/// The three calls a run makes against the account.
pub trait Publisher {
    /// Fails fast on bad credentials before anything else is attempted.
    fn verify_credentials(&self) -> Result<Account, PostError>;

    /// Creation time of the account's newest post, if any.
    fn latest_post_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, PostError>;

    fn publish(&self, text: &str) -> Result<Post, PostError>;
}

pub struct Poster {
    client: Client,
    creds: Credentials,
    api_root: String,
}

impl Poster {
    pub fn from_env() -> Result<Self, PostError> {
        Self::new(Credentials::from_env()?, API_ROOT)
    }

    pub fn new(creds: Credentials, api_root: &str) -> Result<Self, PostError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, creds, api_root: s!(api_root.trim_end_matches('/')) })
    }

    fn signed(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<RequestBuilder, PostError> {
        let url = format!("{}{path}", self.api_root);
        let auth = oauth::authorization(
            &self.creds,
            method.as_str(),
            &url,
            query,
            &oauth::nonce(),
            Utc::now().timestamp(),
        )?;

        let full = if query.is_empty() {
            url
        } else {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{}={}", oauth::encode(k), oauth::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{url}?{qs}")
        };
        Ok(self.client.request(method, full).header(AUTHORIZATION, auth))
    }
}

impl Publisher for Poster {
    fn verify_credentials(&self) -> Result<Account, PostError> {
        let resp = self.signed(Method::GET, "/users/me", &[])?.send()?;
        let env: Envelope<Account> = checked(resp)?.json()?;
        env.data.ok_or_else(|| PostError::Api { status: 200, body: s!("no account in response") })
    }

    fn latest_post_time(&self, user_id: &str) -> Result<Option<DateTime<Utc>>, PostError> {
        let page = TIMELINE_PAGE.to_string();
        let resp = self
            .signed(
                Method::GET,
                &format!("/users/{user_id}/tweets"),
                &[("max_results", page.as_str()), ("tweet.fields", "created_at")],
            )?
            .send()?;
        let env: Envelope<Vec<Post>> = checked(resp)?.json()?;
        Ok(env
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.created_at)
            .max())
    }

    /// Refuses text over the length ceiling without touching the network.
    fn publish(&self, text: &str) -> Result<Post, PostError> {
        if !status::fits(text) {
            return Err(PostError::TooLong { chars: status::char_len(text), max: STATUS_MAX_CHARS });
        }
        let resp = self
            .signed(Method::POST, "/tweets", &[])?
            .json(&NewPost { text })
            .send()?;
        let env: Envelope<Post> = checked(resp)?.json()?;
        env.data.ok_or_else(|| PostError::Api { status: 201, body: s!("no post in response") })
    }
}

fn checked(resp: Response) -> Result<Response, PostError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(status_error(status, resp.text().unwrap_or_default()))
}

/// Error for a non-success API status.
pub fn status_error(status: StatusCode, body: String) -> PostError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => PostError::RateLimited,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PostError::Unauthorized { status: status.as_u16(), body }
        }
        _ => PostError::Api { status: status.as_u16(), body },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_envelope_tolerates_empty_accounts() {
        let env: Envelope<Vec<Post>> = serde_json::from_str(r#"{"meta":{"result_count":0}}"#).unwrap();
        assert!(env.data.is_none());

        let env: Envelope<Vec<Post>> = serde_json::from_str(
            r#"{"data":[{"id":"1","text":"a","created_at":"2022-11-02T03:15:00.000Z"},
                        {"id":"2","text":"b","created_at":"2022-11-03T02:00:00.000Z"}]}"#,
        )
        .unwrap();
        let newest = env.data.unwrap().into_iter().filter_map(|p| p.created_at).max().unwrap();
        assert_eq!(newest.to_rfc3339(), "2022-11-03T02:00:00+00:00");
    }

    #[test]
    fn missing_credentials_name_the_variable() {
        let err = PostError::MissingCredential("TWITTER_CONSUMER_KEY");
        assert_eq!(err.to_string(), "environment variable TWITTER_CONSUMER_KEY is not set");
    }

    #[test]
    fn statuses_map_to_errors() {
        assert!(matches!(status_error(StatusCode::TOO_MANY_REQUESTS, s!("slow down")), PostError::RateLimited));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, s!("bad token")),
            PostError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, s!("duplicate")),
            PostError::Unauthorized { status: 403, .. }
        ));
        match status_error(StatusCode::SERVICE_UNAVAILABLE, s!("over capacity")) {
            PostError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "over capacity");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn oversized_text_is_refused_before_sending() {
        let creds = Credentials {
            consumer_key: s!("k"),
            consumer_secret: s!("cs"),
            token: s!("t"),
            token_secret: s!("ts"),
        };
        // nothing listens here; a request would fail with a different error
        let poster = Poster::new(creds, "http://127.0.0.1:9/2/").unwrap();
        assert_eq!(poster.api_root, "http://127.0.0.1:9/2");

        let err = poster.publish(&"x".repeat(281)).unwrap_err();
        assert!(matches!(err, PostError::TooLong { chars: 281, max: 280 }));
    }
}
