// src/core/net.rs
//
// Page loading. `Browser` is the one handle the run opens: built explicitly,
// passed by &mut to whatever needs pages, released by `close()` or on drop.

use std::{
    collections::HashMap,
    thread,
    time::{Duration, Instant},
};

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::consts::{REQUEST_PAUSE_MS, REQUEST_TIMEOUT_SECS, USER_AGENT};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not start HTTP client: {0}")]
    Launch(#[source] reqwest::Error),
    #[error("browser already closed")]
    Closed,
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no page for {0}")]
    NotFound(String),
}

/// Anything that can hand back a page's markup.
pub trait PageSource {
    fn page_source(&mut self, url: &str) -> Result<String, FetchError>;
}

pub struct Browser {
    client: Option<Client>,
    pause: Duration,
    last_request: Option<Instant>,
    pages: usize,
}

impl Browser {
    pub fn launch() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(FetchError::Launch)?;
        log::debug!("browser launched");
        Ok(Self {
            client: Some(client),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            last_request: None,
            pages: 0,
        })
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.client.take().is_some() {
            log::debug!("browser closed after {} page(s)", self.pages);
        }
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.release();
    }
}

impl PageSource for Browser {
    fn page_source(&mut self, url: &str) -> Result<String, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::Closed)?;

        if let Some(last) = self.last_request {
            let since = last.elapsed();
            if since < self.pause {
                thread::sleep(self.pause - since);
            }
        }
        self.last_request = Some(Instant::now());

        let t = Instant::now();
        let resp = client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request { url: s!(url), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), url: s!(url) });
        }
        let body = resp
            .text()
            .map_err(|source| FetchError::Request { url: s!(url), source })?;

        self.pages += 1;
        log::debug!("GET {url}: {} bytes in {:?}", body.len(), t.elapsed());
        Ok(body)
    }
}

/// Canned pages keyed by URL. Used by tests and offline replays.
#[derive(Default)]
pub struct MemoryPages {
    pages: HashMap<String, String>,
    pub requested: Vec<String>,
}

impl MemoryPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    pub fn without_page(mut self, url: &str) -> Self {
        self.pages.remove(url);
        self
    }
}

impl PageSource for MemoryPages {
    fn page_source(&mut self, url: &str) -> Result<String, FetchError> {
        self.requested.push(s!(url));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(s!(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_browser_refuses_pages() {
        let mut b = Browser::launch().unwrap().with_pause(Duration::ZERO);
        b.release();
        assert!(matches!(b.page_source("http://localhost/"), Err(FetchError::Closed)));
    }

    #[test]
    fn memory_pages_records_requests() {
        let mut pages = MemoryPages::new().with_page("a", "<p>a</p>");
        assert_eq!(pages.page_source("a").unwrap(), "<p>a</p>");
        assert!(matches!(pages.page_source("b"), Err(FetchError::NotFound(_))));
        assert_eq!(pages.requested, vec!["a", "b"]);
    }
}
