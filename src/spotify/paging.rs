//! Extraction rules for Spotify's two pagination conventions.
//!
//! Offset-style pages look like `{"items": [...], "next": "<url>" | null}` and
//! are followed by fetching the absolute `next` URL. Cursor-style pages nest
//! their items in a named container,
//! `{"artists": {"items": [...], "cursors": {"after": "<id>" | null}}}`, and are
//! followed by re-requesting the same endpoint with the cursor merged into the
//! query. The loops live on [`SpotifyClient`](super::SpotifyClient); this module
//! only knows how to read a page.

use serde_json::Value;

use crate::{Error, Res, types::Params};

/// How to read a cursor-paginated page.
pub trait CursorStyle {
    /// Items carried by `page`, in page order.
    fn items(&self, page: &Value) -> Res<Vec<Value>>;

    /// Whether another page follows `page`.
    fn has_more(&self, page: &Value) -> bool;

    /// Query parameters that address the page after `page`.
    fn next_params(&self, page: &Value) -> Params;
}

/// Cursor pagination through a named container, e.g. `artists` for
/// `me/following?type=artist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container<'a> {
    name: &'a str,
}

impl<'a> Container<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    fn cursors<'p>(&self, page: &'p Value) -> Option<&'p serde_json::Map<String, Value>> {
        page.get(self.name)?.get("cursors")?.as_object()
    }
}

impl CursorStyle for Container<'_> {
    fn items(&self, page: &Value) -> Res<Vec<Value>> {
        page.get(self.name)
            .and_then(|container| container.get("items"))
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!("page without `{}.items` array", self.name))
            })
    }

    fn has_more(&self, page: &Value) -> bool {
        match self.cursors(page).and_then(|c| c.get("after")) {
            None | Some(Value::Null) => false,
            Some(Value::String(after)) => !after.is_empty(),
            Some(_) => true,
        }
    }

    fn next_params(&self, page: &Value) -> Params {
        self.cursors(page)
            .map(|cursors| {
                cursors
                    .iter()
                    .filter_map(|(key, value)| Some((key.clone(), param_value(value)?)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Removes and returns the `items` array of an offset-style page.
pub fn take_items(page: &mut Value, url: &str) -> Res<Vec<Value>> {
    match page.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(Error::UnexpectedResponse(format!(
            "{url}: page without `items` array"
        ))),
    }
}

/// The absolute URL of the next offset-style page, if any.
pub fn next_url(page: &Value) -> Option<String> {
    page.get("next")
        .and_then(Value::as_str)
        .filter(|next| !next.is_empty())
        .map(str::to_string)
}

/// Merges the cursor parameters of the next page with the caller's
/// parameters. Keys keep the position they had among the cursor parameters;
/// on a clash the caller's value wins.
pub fn merge_params(cursor: Params, params: &[(&str, &str)]) -> Params {
    let mut merged: Params = cursor
        .into_iter()
        .map(|(key, value)| {
            match params.iter().find(|(k, _)| *k == key.as_str()) {
                Some((_, v)) => (key, v.to_string()),
                None => (key, value),
            }
        })
        .collect();

    for (key, value) in params {
        if !merged.iter().any(|(k, _)| k.as_str() == *key) {
            merged.push((key.to_string(), value.to_string()));
        }
    }
    merged
}
