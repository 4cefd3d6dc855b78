//! The live rendering backend the engine synchronizes with.
//!
//! The engine assumes nothing beyond these five operations. The in-memory
//! [`MarkupDocument`](crate::document::MarkupDocument) is the reference
//! implementation; a browser host would implement the same trait over its DOM.

use crate::error::BackendError;
use std::fmt;

/// Root marker accepted by [`Location::parse`].
pub const BODY: &str = "body";

/// Where inserted markup lands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// The document body.
    Body,
    /// An existing element, by id.
    Id(String),
}

impl Location {
    /// `"body"` is the root marker; anything else names an element id.
    pub fn parse(target: &str) -> Self {
        if target == BODY {
            Location::Body
        } else {
            Location::Id(target.to_string())
        }
    }
}

impl From<&str> for Location {
    fn from(target: &str) -> Self {
        Self::parse(target)
    }
}

impl From<String> for Location {
    fn from(target: String) -> Self {
        if target == BODY {
            Location::Body
        } else {
            Location::Id(target)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Body => f.write_str(BODY),
            Location::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// Backend insertion primitive.
pub trait Backend {
    /// Append `markup` as the last child of `location`.
    fn insert(&mut self, location: &Location, markup: &str) -> Result<(), BackendError>;

    /// Whether an element with `id` is present.
    fn query_exists(&self, id: &str) -> bool;

    /// Remove the element with `id` and everything inside it. Missing ids are ignored.
    fn remove(&mut self, id: &str);

    /// Toggle visibility of the element with `id`. Missing ids are ignored.
    fn set_visible(&mut self, id: &str, visible: bool);

    /// Remove everything inside the element with `id`, keeping the element.
    /// Missing ids are ignored.
    fn clear(&mut self, id: &str);
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn insert(&mut self, location: &Location, markup: &str) -> Result<(), BackendError> {
        (**self).insert(location, markup)
    }

    fn query_exists(&self, id: &str) -> bool {
        (**self).query_exists(id)
    }

    fn remove(&mut self, id: &str) {
        (**self).remove(id)
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        (**self).set_visible(id, visible)
    }

    fn clear(&mut self, id: &str) {
        (**self).clear(id)
    }
}
