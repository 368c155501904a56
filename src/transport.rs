//! Single-shot HTTP access to the countriesnow API.
//!
//! The aggregation layer only sees the [`Transport`] trait, so it can be driven
//! by [`HttpTransport`] in production and by an in-memory fake in tests.

use crate::error::{Error, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues one request and returns the parsed body.
///
/// `path` is relative to the API base and already carries an encoded query.
/// `body` is only sent for [`Method::Post`]. Implementations must not retry.
pub trait Transport: Sync {
    fn fetch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        (**self).fetch(method, path, body)
    }
}

/// Blocking `reqwest` transport bound to one base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .redirect(Policy::limited(5))
            .user_agent(concat!("countriesnow_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport {
                method: "INIT",
                url: base_url.to_string(),
                reason: format!("cannot build http client: {e}"),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url_for(path);
        let fail = |reason: String| Error::Transport {
            method: method.as_str(),
            url: url.clone(),
            reason,
        };
        log::debug!("{method} {url}");

        let request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => {
                let payload = body.cloned().unwrap_or(Value::Object(Default::default()));
                let bytes = serde_json::to_vec(&payload)
                    .map_err(|e| fail(format!("encode request body: {e}")))?;
                self.http
                    .post(&url)
                    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                    .body(bytes)
            }
        };

        let response = request.send().map_err(|e| fail(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("request failed with HTTP {status}")));
        }
        response
            .json::<Value>()
            .map_err(|e| fail(format!("decode json: {e}")))
    }
}
