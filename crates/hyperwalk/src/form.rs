//! Forms as request templates.
//!
//! Every named `<form>` outside an embed becomes a [`Form`]. Its parameters
//! are the named, non-hidden `input`, `textarea` and `select` fields, all
//! initially unset. Submitting a GET form is an ordinary cached read of the
//! action URI with the set parameters appended to its query; submitting a
//! POST form writes the url-encoded parameters and parses the response into
//! a resource that is not cached.

use std::collections::BTreeMap;

use scraper::Html;
use serde::Serialize;

use crate::client::{Client, WeakClient};
use crate::document::selector;
use crate::embed::strip_embeds;
use crate::error::{HypermediaError, HypermediaResult};
use crate::resource::Resource;
use crate::uri;

/// HTTP method of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Parse a `method` attribute. Anything but "post" is GET.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(m) if m.trim().eq_ignore_ascii_case("post") => Self::Post,
            _ => Self::Get,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

/// A request template discovered in a document.
#[derive(Debug, Clone)]
pub struct Form {
    name: String,
    method: FormMethod,
    action: String,
    parameters: Vec<(String, Option<String>)>,
    client: WeakClient,
}

impl Form {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> FormMethod {
        self.method
    }

    /// Absolute action URI.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Parameter names in document order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|(n, _)| n.as_str())
    }

    /// Parameters and their current values.
    pub fn parameters(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.parameters
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Current value of `name`; `None` when unknown or unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|(n, _)| n == name)
    }

    /// Set a parameter value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> HypermediaResult<()> {
        *self.slot(name)? = Some(value.into());
        Ok(())
    }

    /// Unset a parameter so it is left out of the submission.
    pub fn clear(&mut self, name: &str) -> HypermediaResult<()> {
        *self.slot(name)? = None;
        Ok(())
    }

    fn slot(&mut self, name: &str) -> HypermediaResult<&mut Option<String>> {
        let form = &self.name;
        self.parameters
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
            .ok_or_else(|| HypermediaError::UnknownParameter {
                form: form.clone(),
                name: name.to_string(),
            })
    }

    /// The `(name, value)` pairs that will be sent: set parameters only.
    pub fn encoded_pairs(&self) -> Vec<(String, String)> {
        self.parameters
            .iter()
            .filter_map(|(n, v)| v.as_ref().map(|v| (n.clone(), v.clone())))
            .collect()
    }

    /// Submit the form and return the resulting resource.
    pub fn submit(&self) -> HypermediaResult<Resource> {
        let client = self.client.upgrade()?;
        let pairs = self.encoded_pairs();

        match self.method {
            FormMethod::Get => {
                let target = uri::append_query(&self.action, &pairs)?;
                tracing::info!(form = %self.name, uri = %target, "submitting form");
                Resource::from_uri(&client, &target)
            }
            FormMethod::Post => {
                let body = uri::encode_form(&pairs);
                tracing::info!(form = %self.name, uri = %self.action, "posting form");
                let response = client.write(&self.action, &body)?;
                Resource::from_response(&client, &response, &self.action)
            }
        }
    }
}

/// Collect the named forms of `document` that are not inside an embed.
pub fn extract_forms(client: &Client, document: &Html, self_uri: &str) -> BTreeMap<String, Form> {
    extract_own_forms(client, &strip_embeds(document, self_uri), self_uri)
}

/// Collect the named forms of `own`, a document whose embeds are already
/// stripped.
pub(crate) fn extract_own_forms(
    client: &Client,
    own: &Html,
    self_uri: &str,
) -> BTreeMap<String, Form> {
    let form_sel = selector("form[name]");
    let field_sel = selector("input, textarea, select");
    let mut forms = BTreeMap::new();

    for form in own.select(&form_sel) {
        let name = form.value().attr("name").unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }

        let action = match form.value().attr("action").map(str::trim) {
            Some(raw) if !raw.is_empty() => uri::resolve(raw, self_uri),
            _ => self_uri.to_string(),
        };

        let mut parameters: Vec<(String, Option<String>)> = Vec::new();
        for field in form.select(&field_sel) {
            let Some(field_name) = field
                .value()
                .attr("name")
                .map(str::trim)
                .filter(|n| !n.is_empty())
            else {
                continue;
            };
            let hidden = field
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"));
            if hidden || parameters.iter().any(|(n, _)| n == field_name) {
                continue;
            }
            parameters.push((field_name.to_string(), None));
        }

        forms.insert(
            name.to_string(),
            Form {
                name: name.to_string(),
                method: FormMethod::parse(form.value().attr("method")),
                action,
                parameters,
                client: client.downgrade(),
            },
        );
    }

    forms
}
