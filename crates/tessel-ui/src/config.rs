/// Behaviour switches for an [`ElementTree`](crate::tree::ElementTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Escape attribute values during serialization.
    pub escape_attributes: bool,
    /// Log a warning when a node enters the tree with an id another live node
    /// already uses. Uniqueness is never enforced.
    pub warn_duplicate_ids: bool,
}

impl TreeConfig {
    pub fn with_escape_attributes(mut self, escape: bool) -> Self {
        self.escape_attributes = escape;
        self
    }

    pub fn with_warn_duplicate_ids(mut self, warn: bool) -> Self {
        self.warn_duplicate_ids = warn;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            escape_attributes: true,
            warn_duplicate_ids: true,
        }
    }
}
