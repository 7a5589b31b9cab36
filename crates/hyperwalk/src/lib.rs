// Copyright 2026 Hyperwalk Contributors
// SPDX-License-Identifier: MIT

//! Hyperwalk — a client for hypermedia APIs served as plain HTML.
//!
//! Pages are annotated with a small microformat:
//!
//! - `<a rel="...">` anchors are relation edges between resources;
//! - `<dt>`/`<dd>` pairs are typed properties (`data-type` on the `dt`);
//! - a `<details>` whose `<summary>` holds an anchor embeds another
//!   resource inline;
//! - named `<form>`s are request templates.
//!
//! A [`Client`] caches every [`Resource`] by URI. Relations are followed
//! lazily: [`Resource::traverse`] fetches each hop only when the walk
//! reaches it, and a URI is read at most once per client.
//!
//! ```no_run
//! use hyperwalk::Client;
//!
//! # fn main() -> hyperwalk::HypermediaResult<()> {
//! let client = Client::from_url("https://api.example.org/")?;
//! for article in client.traverse(&["http://rels.example.org/articles", "item"])? {
//!     println!("{} {:?}", article.uri(), article.property("headline")?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod document;
pub mod embed;
pub mod error;
pub mod form;
pub mod links;
pub mod properties;
pub mod resource;
pub mod transport;
pub mod uri;
pub mod value;

pub use client::Client;
pub use config::TransportConfig;
pub use error::{HypermediaError, HypermediaResult};
pub use form::{Form, FormMethod};
pub use resource::{Resource, ResourceList};
pub use transport::{HttpTransport, MemoryTransport, Transport};
pub use value::{DecodedValue, Link, Properties};
