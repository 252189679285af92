//! Attribute resolution across a chain of layers.
//!
//! Scalars resolve deepest-wins: the value set on the layer closest to the
//! root cause is returned. Maps merge across every layer with shallower
//! layers overriding deeper ones on key conflicts. Tags are the union of all
//! layers in first-seen order, outermost first.
//!
//! # Examples
//!
//! ```
//! use error_strata::ErrorBuilder;
//!
//! let inner = ErrorBuilder::new().code("db_timeout").with("table", "users").build("query");
//! let outer = ErrorBuilder::new()
//!     .code("request_failed")
//!     .with("table", "accounts")
//!     .with("route", "/login")
//!     .wrap(inner);
//!
//! assert_eq!(outer.code(), Some("db_timeout"));
//! assert_eq!(outer.context()["table"], "accounts");
//! assert_eq!(outer.context()["route"], "/login");
//! ```
use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::ErrorRecord;
use crate::stack::{Frame, SourceCache};
use crate::types::{AttrMap, Cause, JsonMap, RequestInfo, ResponseInfo, Value};

/// Iterator over the structured layers of a chain, outermost first.
#[derive(Debug, Clone)]
pub struct Layers<'a> {
    next: Option<&'a ErrorRecord>,
}

impl<'a> Iterator for Layers<'a> {
    type Item = &'a ErrorRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause.as_ref().and_then(Cause::as_record);
        Some(current)
    }
}

impl FusedIterator for Layers<'_> {}

impl ErrorRecord {
    /// Structured layers from this one down to the deepest.
    #[inline]
    pub fn layers(&self) -> Layers<'_> {
        Layers { next: Some(self) }
    }

    fn deepest<'a, T>(&'a self, get: impl Fn(&'a ErrorRecord) -> Option<&'a T>) -> Option<&'a T>
    where
        T: ?Sized + 'a,
    {
        self.layers().filter_map(get).last()
    }

    fn merged(&self, get: impl Fn(&ErrorRecord) -> &AttrMap) -> JsonMap {
        let layers: Vec<&ErrorRecord> = self.layers().collect();
        let mut winners: BTreeMap<&str, &Value> = BTreeMap::new();
        for layer in layers.into_iter().rev() {
            for (key, value) in get(layer) {
                winners.insert(key.as_str(), value);
            }
        }
        winners.into_iter().map(|(key, value)| (key.to_owned(), value.resolve())).collect()
    }

    pub fn code(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.code.as_deref())
    }

    /// Creation time of the deepest layer that recorded one.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.deepest(|layer| layer.attrs.time.as_ref()).copied()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.deepest(|layer| layer.attrs.duration.as_ref()).copied()
    }

    pub fn domain(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.domain.as_deref())
    }

    /// Transaction id; never generated.
    pub fn trace(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.trace.as_deref())
    }

    pub fn hint(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.hint.as_deref())
    }

    /// Message safe to show to end users.
    pub fn public(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.public.as_deref())
    }

    pub fn owner(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.owner.as_deref())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.user_id.as_deref())
    }

    pub fn user_data(&self) -> JsonMap {
        self.merged(|layer| &layer.attrs.user_data)
    }

    /// User id and merged user attributes.
    pub fn user(&self) -> (Option<&str>, JsonMap) {
        (self.user_id(), self.user_data())
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.deepest(|layer| layer.attrs.tenant_id.as_deref())
    }

    pub fn tenant_data(&self) -> JsonMap {
        self.merged(|layer| &layer.attrs.tenant_data)
    }

    /// Tenant id and merged tenant attributes.
    pub fn tenant(&self) -> (Option<&str>, JsonMap) {
        (self.tenant_id(), self.tenant_data())
    }

    /// Merged context with deferred values evaluated.
    pub fn context(&self) -> JsonMap {
        self.merged(|layer| &layer.attrs.context)
    }

    pub fn request(&self) -> Option<&RequestInfo> {
        self.request_attachment().map(|(request, _)| request)
    }

    pub fn response(&self) -> Option<&ResponseInfo> {
        self.response_attachment().map(|(response, _)| response)
    }

    /// Request and whether its body should be dumped.
    pub(crate) fn request_attachment(&self) -> Option<(&RequestInfo, bool)> {
        self.layers()
            .filter_map(|layer| layer.attrs.request.as_ref())
            .last()
            .map(|(request, with_body)| (request.as_ref(), *with_body))
    }

    pub(crate) fn response_attachment(&self) -> Option<(&ResponseInfo, bool)> {
        self.layers()
            .filter_map(|layer| layer.attrs.response.as_ref())
            .last()
            .map(|(response, with_body)| (response.as_ref(), *with_body))
    }

    /// Union of every layer's tags without duplicates.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.layers().flat_map(|layer| layer.attrs.tags.iter()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.layers().any(|layer| layer.attrs.tags.iter().any(|t| t == tag))
    }

    /// Header of this layer's block in rendered traces.
    pub(crate) fn block_header(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match &self.cause {
            Some(Cause::Opaque(error)) => error.to_string(),
            _ => "Error".to_owned(),
        }
    }

    fn traced_layers(&self) -> Vec<&ErrorRecord> {
        let mut layers: Vec<&ErrorRecord> =
            self.layers().filter(|layer| !layer.stack.is_empty()).collect();
        layers.reverse();
        layers
    }

    /// Human-readable trace, deepest layer first.
    ///
    /// Each layer contributes a block headed by its message. An outer block
    /// stops at the first frame equal to the last frame captured for the
    /// layer below (see [`StackTrace::render`](crate::StackTrace::render)).
    /// Frames above that point may appear in both blocks.
    pub fn stacktrace(&self) -> String {
        let layers = self.traced_layers();
        if layers.is_empty() {
            return String::new();
        }

        let mut blocks = Vec::with_capacity(layers.len());
        let mut below: Option<&Frame> = None;
        for layer in layers {
            let frames = layer.stack.render(below);
            let header = layer.block_header();
            blocks.push(if frames.is_empty() { header } else { format!("{}\n{}", header, frames) });
            below = layer.stack.frames().last();
        }

        format!("Oops: {}", blocks.join("\nThrown: "))
    }

    /// Source fragments around each layer's nearest frame, from the global cache.
    pub fn sources(&self) -> String {
        self.sources_with(SourceCache::global())
    }

    /// Source fragments read through `cache`.
    pub fn sources_with(&self, cache: &SourceCache) -> String {
        let blocks: Vec<String> = self
            .traced_layers()
            .into_iter()
            .filter_map(|layer| {
                let (location, window) = layer.stack.source(cache)?;
                if window.is_empty() {
                    return None;
                }
                Some(format!("{}\n  --- at {}\n{}", layer.block_header(), location, window.join("\n")))
            })
            .collect();

        if blocks.is_empty() {
            return String::new();
        }
        format!("Oops: {}", blocks.join("\n\nThrown: "))
    }
}
