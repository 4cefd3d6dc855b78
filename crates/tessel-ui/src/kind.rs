//! Element kinds: static type descriptors with single inheritance.
//!
//! Each concrete element type owns one `static` [`ElementKind`]. A kind may
//! extend another kind, which gives it a back-reference to its parent
//! (`super_kind`) while keeping its own name and tag. Behaviour itself is not
//! inherited through kinds. That is the job of the [`Element`] trait's
//! default methods and the embedded [`ElementBase`].
//!
//! [`Element`]: crate::element::Element
//! [`ElementBase`]: crate::element::ElementBase

use crate::error::{ElementError, ElementResult};
use std::fmt;

/// Static descriptor of a concrete element type.
#[derive(Debug)]
pub struct ElementKind {
    name: &'static str,
    tag: &'static str,
    void: bool,
    attributes: &'static [&'static str],
    parent: Option<&'static ElementKind>,
}

impl ElementKind {
    /// A root kind with no parent.
    pub const fn new(name: &'static str, tag: &'static str) -> Self {
        Self {
            name,
            tag,
            void: false,
            attributes: &[],
            parent: None,
        }
    }

    /// Derive `sub` from `parent`.
    ///
    /// The subkind keeps its own name and tag. It inherits the parent's
    /// exposed attributes and void flag unless it declares attributes itself.
    pub const fn extend(sub: ElementKind, parent: &'static ElementKind) -> Self {
        let inherit = sub.attributes.is_empty();
        Self {
            name: sub.name,
            tag: sub.tag,
            void: sub.void || (inherit && parent.void),
            attributes: if inherit { parent.attributes } else { sub.attributes },
            parent: Some(parent),
        }
    }

    /// Typed attributes this kind reads from the attribute store, in
    /// serialization order.
    pub const fn with_attributes(mut self, attributes: &'static [&'static str]) -> Self {
        self.attributes = attributes;
        self
    }

    /// Mark the kind as a void element (`<tag/>`, no children).
    pub const fn void(mut self) -> Self {
        self.void = true;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    pub const fn is_void(&self) -> bool {
        self.void
    }

    pub const fn attributes(&self) -> &'static [&'static str] {
        self.attributes
    }

    pub const fn super_kind(&self) -> Option<&'static ElementKind> {
        self.parent
    }

    /// This kind followed by its ancestors, nearest first.
    pub fn lineage(&'static self) -> impl Iterator<Item = &'static ElementKind> {
        std::iter::successors(Some(self), |kind| kind.parent)
    }

    /// Whether `other` appears anywhere in this kind's lineage.
    pub fn inherits(&'static self, other: &ElementKind) -> bool {
        self.lineage().any(|kind| kind == other)
    }

    /// Reject chains that loop back onto this kind.
    pub fn validate(&'static self) -> ElementResult<()> {
        let mut cursor = self.parent;
        let mut depth = 0usize;
        while let Some(kind) = cursor {
            if kind == self || depth > 64 {
                return Err(ElementError::InvariantViolation(format!(
                    "kind `{}` extends itself",
                    self.name
                )));
            }
            cursor = kind.parent;
            depth += 1;
        }
        Ok(())
    }
}

/// Kinds are identified by name. Two descriptors with the same name describe
/// the same concrete type.
impl PartialEq for ElementKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ElementKind {}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BOX: ElementKind = ElementKind::new("Box", "div").with_attributes(&["align"]);
    static PANEL: ElementKind = ElementKind::extend(ElementKind::new("Panel", "section"), &BOX);
    static CARD: ElementKind = ElementKind::extend(
        ElementKind::new("Card", "article").with_attributes(&["role"]),
        &PANEL,
    );
    static FIELD: ElementKind = ElementKind::new("Field", "input").void();
    static SPINNER: ElementKind = ElementKind::extend(ElementKind::new("Spinner", "input"), &FIELD);

    #[test]
    fn test_extend_keeps_identity() {
        assert_eq!(PANEL.name(), "Panel");
        assert_eq!(PANEL.tag(), "section");
        assert_eq!(PANEL.super_kind(), Some(&BOX));
    }

    #[test]
    fn test_attributes_inherited_unless_declared() {
        assert_eq!(PANEL.attributes(), &["align"]);
        assert_eq!(CARD.attributes(), &["role"]);
        assert!(SPINNER.is_void());
        assert!(!CARD.is_void());
    }

    #[test]
    fn test_lineage() {
        let names: Vec<_> = CARD.lineage().map(ElementKind::name).collect();
        assert_eq!(names, vec!["Card", "Panel", "Box"]);
        assert!(CARD.inherits(&BOX));
        assert!(!BOX.inherits(&CARD));
        assert!(CARD.validate().is_ok());
    }
}
