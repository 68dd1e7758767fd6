use crate::error::{Result, ZoteroError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use url::Url;

/// HTTP boundary: performs one GET and returns the response body as text.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> Result<String>;
}

/// Blocking `reqwest` transport. Non-2xx responses become errors.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("zotero-feed/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/atom+xml, application/xml;q=0.9, */*;q=0.5"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ZoteroError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ZoteroError::HttpStatus {
                status: status.as_u16(),
                url: redact_key(url),
            });
        }

        response
            .text()
            .map_err(|e| ZoteroError::Transport(e.without_url()))
    }
}

/// Render a URL with the `key` query value masked, for errors and logs.
pub fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
