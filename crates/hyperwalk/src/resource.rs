//! Resources: the nodes of the hypermedia graph.
//!
//! A resource starts either resolved (built from a fetched document, inline
//! markup, or an embed) or as an unresolved stub known only by URI, relation
//! and title. [`Resource::fetch`] resolves a stub once; [`Resource::update`]
//! re-reads the document and replaces properties, links and forms in place.
//!
//! Edges are stored as target URIs and turned back into resources through
//! the client's cache on access.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use scraper::{ElementRef, Html};

use crate::client::{Client, WeakClient};
use crate::document;
use crate::embed::{embed_document, strip_embeds};
use crate::error::{HypermediaError, HypermediaResult};
use crate::form::{extract_own_forms, Form};
use crate::links::extract_links_with;
use crate::properties::decode_own_properties;
use crate::value::{DecodedValue, Properties};

/// A node in the resource graph. Clones share the same node.
#[derive(Clone)]
pub struct Resource {
    inner: Rc<ResourceInner>,
}

struct ResourceInner {
    uri: String,
    client: WeakClient,
    state: RefCell<ResourceState>,
}

#[derive(Default)]
struct ResourceState {
    resolved: bool,
    rel: Option<String>,
    title: Option<String>,
    properties: Properties,
    links: BTreeMap<String, Vec<String>>,
    forms: BTreeMap<String, Form>,
    document: Option<Html>,
}

impl Resource {
    fn new(client: &Client, uri: &str, rel: Option<&str>, title: Option<&str>) -> Self {
        Self {
            inner: Rc::new(ResourceInner {
                uri: uri.to_string(),
                client: client.downgrade(),
                state: RefCell::new(ResourceState {
                    rel: rel.map(String::from),
                    title: title.map(String::from),
                    ..ResourceState::default()
                }),
            }),
        }
    }

    /// An unresolved resource that is not registered with the client.
    pub(crate) fn detached(client: &Client, uri: &str) -> Self {
        Self::new(client, uri, None, None)
    }

    /// The resource at `uri`: cached (and resolved if it was a stub), or
    /// read, parsed and registered.
    ///
    /// A document declaring its own identity is registered under that URI,
    /// and `uri` becomes an alias for it.
    pub fn from_uri(client: &Client, uri: &str) -> HypermediaResult<Self> {
        if let Some(cached) = client.lookup(uri) {
            cached.fetch()?;
            return Ok(cached);
        }

        let bytes = client.read(uri)?;
        let document = document::parse(&bytes);
        let identity = document::canonical_uri(&document, uri).unwrap_or_else(|| uri.to_string());

        // Alias before extraction: the page may link to its fetch URI.
        let resource = Self::claim(client, &identity, None, None);
        if identity != uri {
            client.alias(uri, &resource);
        }
        if !resource.is_resolved() {
            resource.populate(client, document)?;
        }
        Ok(resource)
    }

    /// Build a resource from in-memory markup.
    pub fn from_html(client: &Client, markup: &str, base_uri: &str) -> HypermediaResult<Self> {
        let document = document::parse_markup(markup);
        let identity =
            document::canonical_uri(&document, base_uri).unwrap_or_else(|| base_uri.to_string());
        Self::adopt(client, document, &identity, None, None)
    }

    /// Build a resource from an embedded subtree identified by `uri`.
    pub fn from_embed(
        client: &Client,
        subtree: &ElementRef<'_>,
        uri: &str,
        rel: Option<&str>,
        title: Option<&str>,
    ) -> HypermediaResult<Self> {
        if let Some(cached) = client.lookup(uri) {
            if cached.is_resolved() {
                return Ok(cached);
            }
        }
        Self::adopt(client, embed_document(subtree), uri, rel, title)
    }

    /// An unresolved stub for `uri`, or the cached resource with its title
    /// refreshed.
    pub fn link(client: &Client, uri: &str, rel: Option<&str>, title: Option<&str>) -> Self {
        match client.lookup(uri) {
            Some(cached) => {
                if let Some(title) = title {
                    cached.inner.state.borrow_mut().title = Some(title.to_string());
                }
                cached
            }
            None => client.register(Self::new(client, uri, rel, title)),
        }
    }

    /// Parse a write response. The result is not registered: it is not what
    /// a read of `uri` would return.
    pub(crate) fn from_response(client: &Client, bytes: &[u8], uri: &str) -> HypermediaResult<Self> {
        let document = document::parse(bytes);
        let identity = document::canonical_uri(&document, uri).unwrap_or_else(|| uri.to_string());
        let resource = Self::detached(client, &identity);
        resource.populate(client, document)?;
        Ok(resource)
    }

    /// Resolve the cached resource for `uri` from `document`, creating and
    /// registering it first when needed. Already resolved resources are
    /// returned untouched.
    fn adopt(
        client: &Client,
        document: Html,
        uri: &str,
        rel: Option<&str>,
        title: Option<&str>,
    ) -> HypermediaResult<Self> {
        let resource = Self::claim(client, uri, rel, title);
        if !resource.is_resolved() {
            resource.populate(client, document)?;
        }
        Ok(resource)
    }

    /// The cached resource for `uri` with a missing rel or title filled in,
    /// or a freshly registered stub.
    fn claim(client: &Client, uri: &str, rel: Option<&str>, title: Option<&str>) -> Self {
        let Some(cached) = client.lookup(uri) else {
            return client.register(Self::new(client, uri, rel, title));
        };
        if !cached.is_resolved() {
            let mut state = cached.inner.state.borrow_mut();
            if state.rel.is_none() {
                state.rel = rel.map(String::from);
            }
            if state.title.is_none() {
                state.title = title.map(String::from);
            }
        }
        cached
    }

    fn populate(&self, client: &Client, document: Html) -> HypermediaResult<()> {
        let uri = self.uri();
        let own = strip_embeds(&document, uri);
        // Extraction may re-enter this resource through the cache (a page
        // linking to itself), so no state borrow is held until the end.
        let links = extract_links_with(client, uri, &document, &own)?;
        let properties = decode_own_properties(&own, uri);
        let forms = extract_own_forms(client, &own, uri);

        tracing::debug!(
            uri = %uri,
            relations = links.len(),
            properties = properties.len(),
            forms = forms.len(),
            "resource resolved"
        );

        let mut state = self.inner.state.borrow_mut();
        state.links = links
            .into_iter()
            .map(|(rel, list)| (rel, list.uris()))
            .collect();
        state.properties = properties;
        state.forms = forms;
        state.document = Some(document);
        state.resolved = true;
        Ok(())
    }

    fn client(&self) -> HypermediaResult<Client> {
        self.inner.client.upgrade()
    }

    /// Resolve a stub. No-op once resolved.
    pub fn fetch(&self) -> HypermediaResult<()> {
        if self.is_resolved() {
            return Ok(());
        }
        self.reload()
    }

    /// Re-read the document and replace properties, links and forms.
    pub fn update(&self) -> HypermediaResult<()> {
        self.reload()
    }

    fn reload(&self) -> HypermediaResult<()> {
        let client = self.client()?;
        let bytes = client.read(self.uri())?;
        self.populate(&client, document::parse(&bytes))
    }

    /// Identity URI.
    pub fn uri(&self) -> &str {
        &self.inner.uri
    }

    pub fn rel(&self) -> Option<String> {
        self.inner.state.borrow().rel.clone()
    }

    pub fn title(&self) -> Option<String> {
        self.inner.state.borrow().title.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.state.borrow().resolved
    }

    /// Whether both handles point at the same node.
    pub fn same(&self, other: &Resource) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Properties decoded so far. Does not fetch.
    pub fn properties(&self) -> Properties {
        self.inner.state.borrow().properties.clone()
    }

    /// Values of property `name`, fetching a stub once if the name is not
    /// known yet.
    pub fn property(&self, name: &str) -> HypermediaResult<Vec<DecodedValue>> {
        if let Some(values) = self.known_property(name) {
            return Ok(values);
        }
        if !self.is_resolved() {
            self.fetch()?;
            if let Some(values) = self.known_property(name) {
                return Ok(values);
            }
        }
        Err(HypermediaError::MissingProperty {
            uri: self.uri().to_string(),
            name: name.to_string(),
        })
    }

    fn known_property(&self, name: &str) -> Option<Vec<DecodedValue>> {
        self.inner.state.borrow().properties.get(name).map(<[_]>::to_vec)
    }

    /// Relations known so far, sorted. Does not fetch.
    pub fn relations(&self) -> Vec<String> {
        self.inner.state.borrow().links.keys().cloned().collect()
    }

    /// Members of relation `rel`; empty when absent. Does not fetch.
    pub fn relation(&self, rel: &str) -> HypermediaResult<ResourceList> {
        let uris = self.inner.state.borrow().links.get(rel).cloned();
        match uris {
            Some(uris) => {
                let client = self.client()?;
                uris.iter().map(|uri| client.get(uri)).collect()
            }
            None => Ok(ResourceList::new()),
        }
    }

    /// All relation edges. Does not fetch.
    pub fn links(&self) -> HypermediaResult<BTreeMap<String, ResourceList>> {
        self.relations()
            .into_iter()
            .map(|rel| {
                let members = self.relation(&rel)?;
                Ok((rel, members))
            })
            .collect()
    }

    /// Forms found so far. Does not fetch.
    pub fn forms(&self) -> BTreeMap<String, Form> {
        self.inner.state.borrow().forms.clone()
    }

    /// Form `name`, fetching a stub once if it is not known yet.
    pub fn form(&self, name: &str) -> HypermediaResult<Form> {
        if let Some(form) = self.known_form(name) {
            return Ok(form);
        }
        if !self.is_resolved() {
            self.fetch()?;
            if let Some(form) = self.known_form(name) {
                return Ok(form);
            }
        }
        Err(HypermediaError::MissingForm {
            uri: self.uri().to_string(),
            name: name.to_string(),
        })
    }

    fn known_form(&self, name: &str) -> Option<Form> {
        self.inner.state.borrow().forms.get(name).cloned()
    }

    /// Serialized markup of the document this resource was built from.
    pub fn markup(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .document
            .as_ref()
            .map(|doc| doc.root_element().html())
    }

    /// Follow `rel_path` one relation at a time.
    ///
    /// Each hop resolves the resource it starts from. A missing relation
    /// yields an empty list; members of the last hop are returned as they
    /// are, possibly unresolved. An empty path yields this resource alone.
    pub fn traverse<S: AsRef<str>>(&self, rel_path: &[S]) -> HypermediaResult<ResourceList> {
        let Some((first, rest)) = rel_path.split_first() else {
            return Ok(ResourceList::from(vec![self.clone()]));
        };

        self.fetch()?;
        let members = self.relation(first.as_ref())?;
        if rest.is_empty() || members.is_empty() {
            return Ok(members);
        }
        members.traverse(rest)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Resource")
            .field("uri", &self.inner.uri)
            .field("resolved", &state.resolved)
            .field("rel", &state.rel)
            .field("title", &state.title)
            .finish()
    }
}

/// An ordered list of resources. Duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct ResourceList {
    items: Vec<Resource>,
}

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: Resource) {
        self.items.push(resource);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Resource> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&Resource> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.items.iter()
    }

    /// Member URIs in order.
    pub fn uris(&self) -> Vec<String> {
        self.items.iter().map(|r| r.uri().to_string()).collect()
    }

    /// Traverse `rel_path` from every member, concatenating the results in
    /// member order.
    pub fn traverse<S: AsRef<str>>(&self, rel_path: &[S]) -> HypermediaResult<ResourceList> {
        let mut found = ResourceList::new();
        for member in &self.items {
            found.items.extend(member.traverse(rel_path)?.items);
        }
        Ok(found)
    }
}

impl From<Vec<Resource>> for ResourceList {
    fn from(items: Vec<Resource>) -> Self {
        Self { items }
    }
}

impl FromIterator<Resource> for ResourceList {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResourceList {
    type Item = Resource;
    type IntoIter = std::vec::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Index<usize> for ResourceList {
    type Output = Resource;

    fn index(&self, index: usize) -> &Resource {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    const ROOT: &str = "http://api.example/";
    const B: &str = "http://api.example/b";
    const C: &str = "http://api.example/c";

    fn graph() -> Rc<MemoryTransport> {
        let t = Rc::new(MemoryTransport::new());
        t.insert(ROOT, r#"<a rel="A" href="/b">to b</a>"#);
        t.insert(
            B,
            r#"<dl><dt>name</dt><dd>b</dd></dl>
               <a rel="B" href="/c">to c</a>
               <a rel="B" href="/d">to d</a>"#,
        );
        t.insert(C, r#"<dl><dt>name</dt><dd>c</dd></dl>"#);
        t
    }

    #[test]
    fn test_multi_hop_traversal_is_lazy() {
        let transport = graph();
        let client = Client::from_url_with(transport.clone(), ROOT).unwrap();

        let found = client.traverse(&["A", "B"]).unwrap();

        assert_eq!(found.uris(), vec![C, "http://api.example/d"]);
        assert!(found.iter().all(|r| !r.is_resolved()));
        assert!(client.get(B).unwrap().is_resolved());
        assert_eq!(transport.reads(), vec![ROOT, B]);
    }

    #[test]
    fn test_missing_relation_is_empty() {
        let client = Client::from_url_with(graph(), ROOT).unwrap();
        assert!(client.traverse(&["nope"]).unwrap().is_empty());
        assert!(client.traverse(&["A", "nope", "B"]).unwrap().is_empty());
    }

    #[test]
    fn test_empty_path_returns_self() {
        let client = Client::from_url_with(graph(), ROOT).unwrap();
        let root = client.root().unwrap();
        let path: [&str; 0] = [];
        let found = root.traverse(&path).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].same(&root));
    }

    #[test]
    fn test_stub_is_lazy() {
        let transport = graph();
        let client = Client::new(transport.clone());
        let stub = Resource::link(&client, C, Some("B"), Some("to c"));

        assert!(!stub.is_resolved());
        assert!(stub.properties().is_empty());
        assert!(stub.relations().is_empty());
        assert!(stub.forms().is_empty());
        assert!(transport.reads().is_empty());

        assert_eq!(
            stub.property("name").unwrap(),
            vec![DecodedValue::String("c".into())]
        );
        assert!(stub.is_resolved());
        assert!(matches!(
            stub.property("age"),
            Err(HypermediaError::MissingProperty { .. })
        ));
        assert_eq!(transport.read_count(C), 1);
    }

    #[test]
    fn test_cache_identity_across_paths() {
        let transport = graph();
        let client = Client::from_url_with(transport.clone(), ROOT).unwrap();

        let via_traversal = client.traverse(&["A"]).unwrap()[0].clone();
        let via_link = Resource::link(&client, B, None, Some("renamed"));
        let via_uri = Resource::from_uri(&client, B).unwrap();

        assert!(via_traversal.same(&via_link));
        assert!(via_traversal.same(&via_uri));
        assert_eq!(via_uri.title().as_deref(), Some("renamed"));
        assert_eq!(via_uri.rel().as_deref(), Some("A"));
        assert_eq!(transport.read_count(B), 1);
    }

    #[test]
    fn test_link_keeps_resolution_state() {
        let client = Client::from_url_with(graph(), ROOT).unwrap();
        let root = client.root().unwrap();

        let again = Resource::link(&client, ROOT, Some("other"), Some("Home"));
        assert!(again.same(&root));
        assert!(again.is_resolved());
        assert_eq!(again.rel(), None);
        assert_eq!(again.title().as_deref(), Some("Home"));
    }

    #[test]
    fn test_update_replaces_in_place() {
        let transport = graph();
        let client = Client::from_url_with(transport.clone(), ROOT).unwrap();
        let c = Resource::from_uri(&client, C).unwrap();
        assert_eq!(c.property("name").unwrap()[0].as_str(), Some("c"));

        transport.insert(C, r#"<dl><dt>label</dt><dd>new</dd></dl><a rel="up" href="/">up</a>"#);
        c.fetch().unwrap();
        assert!(c.properties().contains("name"));

        c.update().unwrap();
        assert!(!c.properties().contains("name"));
        assert_eq!(c.property("label").unwrap()[0].as_str(), Some("new"));
        assert!(c.relation("up").unwrap()[0].same(&client.root().unwrap()));
        assert!(client.get(C).unwrap().same(&c));
        assert_eq!(transport.read_count(C), 2);
    }

    #[test]
    fn test_canonical_identity_and_alias() {
        let transport = Rc::new(MemoryTransport::new());
        transport.insert(
            "http://api.example/people/latest",
            r#"<html><head><link rel="self" href="/people/7"></head>
               <body><dl><dt>name</dt><dd>Jane</dd></dl></body></html>"#,
        );
        let client = Client::new(transport.clone());

        let latest = Resource::from_uri(&client, "http://api.example/people/latest").unwrap();
        assert_eq!(latest.uri(), "http://api.example/people/7");

        let again = Resource::from_uri(&client, "http://api.example/people/latest").unwrap();
        let by_identity = client.get("http://api.example/people/7").unwrap();
        assert!(again.same(&latest));
        assert!(by_identity.same(&latest));
        assert_eq!(transport.read_count("http://api.example/people/latest"), 1);
    }

    #[test]
    fn test_fetch_uri_linked_from_its_own_page() {
        let transport = Rc::new(MemoryTransport::new());
        transport.insert(
            "http://api.example/list?page=1",
            r#"<html><head><link rel="self" href="/list"></head><body>
                <a rel="first" href="/list?page=1">first</a>
                <a rel="next" href="/list?page=2">next</a>
            </body></html>"#,
        );
        let client = Client::new(transport.clone());

        let a = Resource::from_uri(&client, "http://api.example/list?page=1").unwrap();
        let b = Resource::from_uri(&client, "http://api.example/list?page=1").unwrap();

        assert!(a.same(&b));
        assert_eq!(a.uri(), "http://api.example/list");
        assert!(a.relation("first").unwrap()[0].same(&a));
        assert_eq!(transport.read_count("http://api.example/list?page=1"), 1);
    }

    #[test]
    fn test_embed_declaring_self_keeps_container_identity() {
        let transport = Rc::new(MemoryTransport::new());
        transport.insert(
            "http://api.example/articles",
            r#"<html><body>
                <dl><dt>total</dt><dd>1</dd></dl>
                <details>
                    <summary><a rel="item" href="/articles/1">First</a></summary>
                    <link rel="self" href="/articles/1">
                    <dl><dt>headline</dt><dd>Hello</dd></dl>
                </details>
            </body></html>"#,
        );
        let client = Client::new(transport);

        let articles = Resource::from_uri(&client, "http://api.example/articles").unwrap();

        assert_eq!(articles.uri(), "http://api.example/articles");
        assert_eq!(articles.properties().names().collect::<Vec<_>>(), vec!["total"]);
        let items = articles.relation("item").unwrap();
        assert_eq!(items.uris(), vec!["http://api.example/articles/1"]);
        assert_eq!(items[0].property("headline").unwrap()[0].as_str(), Some("Hello"));
    }

    #[test]
    fn test_from_html_honours_declared_identity() {
        let client = Client::from_html_with(
            MemoryTransport::new(),
            r#"<html><head><link rel="self" href="/people/7"></head>
               <body><dl><dt>name</dt><dd>Jane</dd></dl></body></html>"#,
            "http://api.example/inline",
        )
        .unwrap();
        let root = client.root().unwrap();

        assert_eq!(root.uri(), "http://api.example/people/7");
        assert!(client.get("http://api.example/people/7").unwrap().same(&root));
        assert!(client.lookup("http://api.example/inline").is_none());
    }

    #[test]
    fn test_embed_content_stays_with_embed() {
        let client = Client::new(MemoryTransport::new());
        let post = Resource::from_html(
            &client,
            r#"<dl><dt>title</dt><dd>Post</dd></dl>
               <form name="comment" action="/comments"><input name="body"></form>
               <details>
                   <summary><a rel="author" href="/people/1">Jane</a></summary>
                   <dl><dt>name</dt><dd>Jane</dd></dl>
                   <form name="follow" action="/people/1/follow"><input name="who"></form>
                   <a rel="home" href="/people/1/home">home</a>
               </details>"#,
            "http://api.example/post",
        )
        .unwrap();

        assert!(!post.properties().contains("name"));
        assert_eq!(post.forms().into_keys().collect::<Vec<_>>(), vec!["comment"]);
        assert_eq!(post.relations(), vec!["author"]);

        let author = post.relation("author").unwrap()[0].clone();
        assert!(author.properties().contains("name"));
        assert!(author.forms().contains_key("follow"));
        assert_eq!(author.relations(), vec!["home"]);
    }

    #[test]
    fn test_embed_shared_between_containers() {
        let embed = r#"<details>
                <summary><a rel="author" href="/people/1">Jane</a></summary>
                <dl><dt>name</dt><dd>Jane</dd></dl>
            </details>"#;
        let transport = Rc::new(MemoryTransport::new());
        transport.insert("http://api.example/a1", &format!("<dl><dt>title</dt><dd>One</dd></dl>{embed}"));
        transport.insert("http://api.example/a2", &format!("<dl><dt>title</dt><dd>Two</dd></dl>{embed}"));
        let client = Client::new(transport.clone());

        let a1 = Resource::from_uri(&client, "http://api.example/a1").unwrap();
        let a2 = Resource::from_uri(&client, "http://api.example/a2").unwrap();

        let author1 = a1.relation("author").unwrap()[0].clone();
        let author2 = a2.relation("author").unwrap()[0].clone();
        assert!(author1.same(&author2));
        assert!(author1.is_resolved());
        assert_eq!(author1.property("name").unwrap()[0].as_str(), Some("Jane"));
        assert!(!a1.properties().contains("name"));
        assert_eq!(transport.read_count("http://api.example/people/1"), 0);
    }

    #[test]
    fn test_embed_resolves_existing_stub() {
        let client = Client::new(MemoryTransport::new());
        let stub = Resource::link(&client, "http://api.example/people/1", Some("friend"), None);

        Resource::from_html(
            &client,
            r#"<details>
                <summary><a rel="author" href="/people/1">Jane</a></summary>
                <dl><dt>name</dt><dd>Jane</dd></dl>
            </details>"#,
            "http://api.example/post",
        )
        .unwrap();

        assert!(stub.is_resolved());
        assert_eq!(stub.rel().as_deref(), Some("friend"));
        assert_eq!(stub.title().as_deref(), Some("Jane"));
        assert!(stub.properties().contains("name"));
    }

    #[test]
    fn test_self_link_does_not_deadlock() {
        let client = Client::from_html_with(
            MemoryTransport::new(),
            r#"<a rel="first" href="/list?page=1">first</a><dl><dt>page</dt><dd>1</dd></dl>"#,
            "http://api.example/list?page=1",
        )
        .unwrap();
        let root = client.root().unwrap();

        let first = root.relation("first").unwrap();
        assert!(first[0].same(&root));
        assert_eq!(root.title().as_deref(), Some("first"));
    }

    #[test]
    fn test_form_accessor_fetches() {
        let transport = Rc::new(MemoryTransport::new());
        transport.insert(
            "http://api.example/search",
            r#"<form name="search" action="/results"><input name="q"></form>"#,
        );
        let client = Client::new(transport.clone());
        let stub = Resource::link(&client, "http://api.example/search", None, None);

        let form = stub.form("search").unwrap();
        assert_eq!(form.action(), "http://api.example/results");
        assert!(matches!(
            stub.form("other"),
            Err(HypermediaError::MissingForm { .. })
        ));
    }

    #[test]
    fn test_fetch_error_surfaces() {
        let client = Client::new(MemoryTransport::new());
        let stub = Resource::link(&client, "http://api.example/gone", None, None);

        assert!(matches!(stub.fetch(), Err(HypermediaError::Fetch { .. })));
        assert!(!stub.is_resolved());
        assert!(matches!(
            stub.property("x"),
            Err(HypermediaError::Fetch { .. })
        ));
    }

    #[test]
    fn test_resource_outlived_client() {
        let client = Client::new(MemoryTransport::new());
        let stub = Resource::link(&client, "http://api.example/x", None, None);
        let keep = stub.clone();
        drop(client);

        assert!(matches!(keep.fetch(), Err(HypermediaError::ClientDropped)));
    }

    #[test]
    fn test_markup_kept() {
        let client = Client::from_url_with(graph(), ROOT).unwrap();
        let markup = client.root().unwrap().markup().unwrap();
        assert!(markup.contains("to b"));
    }
}
