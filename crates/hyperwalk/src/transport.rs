//! Byte transport used by the client: read a URI, or write a form body to it.
//!
//! [`HttpTransport`] wraps a blocking reqwest client and reads `file://` URIs
//! straight from disk. [`MemoryTransport`] serves pages from an in-memory map
//! and records every request, which is what the tests run against.
//!
//! Neither implementation retries; a failed request surfaces as
//! [`HypermediaError::Fetch`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::{HypermediaError, HypermediaResult};

/// Source of document bytes for a [`Client`](crate::Client).
pub trait Transport {
    /// Read the document at `uri`.
    fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>>;

    /// Send a url-encoded `body` to `uri` and return the response document.
    fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>> {
        (**self).read(uri)
    }

    fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>> {
        (**self).write(uri, body)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>> {
        (**self).read(uri)
    }

    fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>> {
        (**self).write(uri, body)
    }
}

// ── HTTP ────────────────────────────────────────────────────────────────────

/// Blocking HTTP transport with `file://` support.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Create a transport from the given configuration.
    pub fn new(config: &TransportConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_default();

        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl Transport for HttpTransport {
    fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>> {
        if let Some(path) = local_path(uri)? {
            return std::fs::read(&path).map_err(|e| HypermediaError::fetch(uri, e));
        }

        let resp = self
            .client
            .get(uri)
            .header(reqwest::header::ACCEPT, "text/html")
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| HypermediaError::fetch(uri, e))?;

        let body = resp.bytes().map_err(|e| HypermediaError::fetch(uri, e))?;
        Ok(body.to_vec())
    }

    fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>> {
        if local_path(uri)?.is_some() {
            return Err(HypermediaError::fetch(uri, "cannot submit to a file URI"));
        }

        let resp = self
            .client
            .post(uri)
            .header(reqwest::header::ACCEPT, "text/html")
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body.to_string())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| HypermediaError::fetch(uri, e))?;

        let body = resp.bytes().map_err(|e| HypermediaError::fetch(uri, e))?;
        Ok(body.to_vec())
    }
}

/// Map a `file://` URI to a filesystem path; `None` for any other scheme.
fn local_path(uri: &str) -> HypermediaResult<Option<PathBuf>> {
    if !uri.starts_with("file:") {
        return Ok(None);
    }
    let parsed = url::Url::parse(uri).map_err(|source| HypermediaError::InvalidUri {
        uri: uri.to_string(),
        source,
    })?;
    parsed
        .to_file_path()
        .map(Some)
        .map_err(|_| HypermediaError::fetch(uri, "not a local file path"))
}

// ── In-memory ───────────────────────────────────────────────────────────────

/// Transport serving documents from memory and logging every request.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pages: RefCell<HashMap<String, Vec<u8>>>,
    responses: RefCell<HashMap<String, Vec<u8>>>,
    reads: RefCell<Vec<String>>,
    writes: RefCell<Vec<(String, String)>>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `markup` for reads of `uri`, replacing any previous page.
    pub fn insert(&self, uri: &str, markup: &str) {
        self.pages
            .borrow_mut()
            .insert(uri.to_string(), markup.as_bytes().to_vec());
    }

    /// Answer writes to `uri` with `markup`.
    pub fn respond_to_write(&self, uri: &str, markup: &str) {
        self.responses
            .borrow_mut()
            .insert(uri.to_string(), markup.as_bytes().to_vec());
    }

    /// Every URI read so far, in request order.
    pub fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    /// Number of reads issued for `uri`.
    pub fn read_count(&self, uri: &str) -> usize {
        self.reads.borrow().iter().filter(|u| *u == uri).count()
    }

    /// Every `(uri, body)` write so far, in request order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.borrow().clone()
    }
}

impl Transport for MemoryTransport {
    fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>> {
        self.reads.borrow_mut().push(uri.to_string());
        self.pages
            .borrow()
            .get(uri)
            .cloned()
            .ok_or_else(|| HypermediaError::fetch(uri, "404 Not Found"))
    }

    fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>> {
        self.writes
            .borrow_mut()
            .push((uri.to_string(), body.to_string()));
        self.responses
            .borrow()
            .get(uri)
            .cloned()
            .ok_or_else(|| HypermediaError::fetch(uri, "405 Method Not Allowed"))
    }
}
