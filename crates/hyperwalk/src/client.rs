//! The client: transport, URI→resource cache, and traversal root.
//!
//! Every resource a client hands out is registered in its cache under its
//! URI before anything else can see it, so two paths reaching the same URI
//! always meet the same [`Resource`]. Resources only keep a weak handle back
//! to the client; dropping the client drops the whole graph.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::TransportConfig;
use crate::error::{HypermediaError, HypermediaResult};
use crate::resource::{Resource, ResourceList};
use crate::transport::{HttpTransport, Transport};

pub(crate) struct ClientInner {
    transport: Box<dyn Transport>,
    cache: RefCell<HashMap<String, Resource>>,
    root: OnceCell<Resource>,
}

/// Entry point for navigating a hypermedia API.
///
/// Cloning a `Client` is cheap and yields a handle to the same cache.
#[derive(Clone)]
pub struct Client {
    inner: Rc<ClientInner>,
}

/// Non-owning handle held by resources and forms.
#[derive(Clone)]
pub(crate) struct WeakClient(Weak<ClientInner>);

impl WeakClient {
    pub(crate) fn upgrade(&self) -> HypermediaResult<Client> {
        self.0
            .upgrade()
            .map(|inner| Client { inner })
            .ok_or(HypermediaError::ClientDropped)
    }
}

impl fmt::Debug for WeakClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.strong_count() > 0 {
            "WeakClient(live)"
        } else {
            "WeakClient(dropped)"
        })
    }
}

impl Client {
    /// Create a client without a root.
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            inner: Rc::new(ClientInner {
                transport: Box::new(transport),
                cache: RefCell::new(HashMap::new()),
                root: OnceCell::new(),
            }),
        }
    }

    /// Fetch `uri` over HTTP (or from disk for `file://`) and make it the root.
    pub fn from_url(uri: &str) -> HypermediaResult<Self> {
        let transport = HttpTransport::new(&TransportConfig::resolve(None));
        Self::from_url_with(transport, uri)
    }

    /// Like [`Client::from_url`], reading through `transport`.
    pub fn from_url_with(transport: impl Transport + 'static, uri: &str) -> HypermediaResult<Self> {
        let client = Self::new(transport);
        let root = Resource::from_uri(&client, uri)?;
        client.set_root(root)?;
        Ok(client)
    }

    /// Parse inline `markup` as the root, with `base_uri` as its identity
    /// unless the markup declares its own.
    pub fn from_html(markup: &str, base_uri: &str) -> HypermediaResult<Self> {
        let transport = HttpTransport::new(&TransportConfig::resolve(None));
        Self::from_html_with(transport, markup, base_uri)
    }

    /// Like [`Client::from_html`], with later reads going through `transport`.
    pub fn from_html_with(
        transport: impl Transport + 'static,
        markup: &str,
        base_uri: &str,
    ) -> HypermediaResult<Self> {
        let client = Self::new(transport);
        let root = Resource::from_html(&client, markup, base_uri)?;
        client.set_root(root)?;
        Ok(client)
    }

    /// Fix the root resource. Fails if one is already set.
    pub fn set_root(&self, resource: Resource) -> HypermediaResult<()> {
        let resource = self.register(resource);
        self.inner
            .root
            .set(resource)
            .map_err(|_| HypermediaError::RootAlreadySet)
    }

    pub fn root(&self) -> Option<Resource> {
        self.inner.root.get().cloned()
    }

    /// Walk `rel_path` starting at the root.
    pub fn traverse<S: AsRef<str>>(&self, rel_path: &[S]) -> HypermediaResult<ResourceList> {
        self.root().ok_or(HypermediaError::NoRoot)?.traverse(rel_path)
    }

    /// The resource at `uri`, from cache or freshly fetched.
    pub fn resource(&self, uri: &str) -> HypermediaResult<Resource> {
        Resource::from_uri(self, uri)
    }

    /// Cache lookup; every construction path goes through here first.
    pub fn lookup(&self, uri: &str) -> Option<Resource> {
        self.inner.cache.borrow().get(uri).cloned()
    }

    /// Strict cache lookup.
    pub fn get(&self, uri: &str) -> HypermediaResult<Resource> {
        self.lookup(uri)
            .ok_or_else(|| HypermediaError::MissingResource(uri.to_string()))
    }

    /// Insert `resource` under its URI. If the URI is already taken the
    /// existing resource wins and is returned.
    pub fn register(&self, resource: Resource) -> Resource {
        self.inner
            .cache
            .borrow_mut()
            .entry(resource.uri().to_string())
            .or_insert(resource)
            .clone()
    }

    /// Make `resource` reachable under a second URI, e.g. the one it was
    /// fetched from when the document declared another identity.
    pub(crate) fn alias(&self, uri: &str, resource: &Resource) {
        self.inner
            .cache
            .borrow_mut()
            .entry(uri.to_string())
            .or_insert_with(|| resource.clone());
    }

    /// Cached URIs, sorted.
    pub fn cached_uris(&self) -> Vec<String> {
        let mut uris: Vec<_> = self.inner.cache.borrow().keys().cloned().collect();
        uris.sort();
        uris
    }

    pub fn len(&self) -> usize {
        self.inner.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.cache.borrow().is_empty()
    }

    pub(crate) fn read(&self, uri: &str) -> HypermediaResult<Vec<u8>> {
        tracing::debug!(uri = %uri, "reading resource");
        self.inner.transport.read(uri)
    }

    pub(crate) fn write(&self, uri: &str, body: &str) -> HypermediaResult<Vec<u8>> {
        tracing::debug!(uri = %uri, bytes = body.len(), "writing form body");
        self.inner.transport.write(uri, body)
    }

    pub(crate) fn downgrade(&self) -> WeakClient {
        WeakClient(Rc::downgrade(&self.inner))
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("root", &self.root().map(|r| r.uri().to_string()))
            .field("cached", &self.len())
            .finish()
    }
}
