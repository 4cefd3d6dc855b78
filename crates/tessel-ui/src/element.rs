//! The element protocol shared by every node type.
//!
//! # Two-phase rendering
//!
//! Every element renders in two strictly separate phases:
//!
//! 1. [`Element::serialize`] turns current state into markup. It is pure: no
//!    backend access, callable any number of times.
//! 2. [`Element::activate`] runs after that markup is live in the backend, for
//!    behaviour that needs real nodes (binding a toolkit widget, for example).
//!
//! The [`ElementTree`](crate::tree::ElementTree) drives both phases and the
//! recursion through children; implementors only describe their own node.
//!
//! # Shared behaviour
//!
//! Concrete types embed an [`ElementBase`] and expose it through
//! [`Element::base`]/[`Element::base_mut`]. All default methods work off the
//! base, so a leaf type overrides only what makes it different, usually just
//! [`Element::kind`]. When an override still wants the default markup it calls
//! [`ElementBase::render`] directly.

use crate::attributes::AttributeStore;
use crate::backend::Backend;
use crate::contract::{Capable, ELEMENT_OPERATIONS};
use crate::error::ElementResult;
use crate::kind::ElementKind;
use crate::markup::Markup;
use std::any::Any;
use std::fmt;

/// Callback run once per attach cycle, after the node's own activation and
/// before its children are activated.
pub type AttachHook = Box<dyn FnMut(&mut dyn Element)>;

/// Inputs to [`Element::serialize`].
#[derive(Debug, Clone, Copy)]
pub struct SerializeContext<'a> {
    /// Already-serialized markup of the node's children, in order.
    pub children: &'a str,
    /// Whether attribute values are escaped.
    pub escape: bool,
}

/// State common to every element.
#[derive(Default)]
pub struct ElementBase {
    id: Option<String>,
    title: Option<String>,
    style_class: Option<String>,
    inline_style: Option<String>,
    attributes: AttributeStore,
    on_attach: Option<AttachHook>,
}

impl ElementBase {
    /// Base without an id. The tree assigns a generated id on
    /// [`create`](crate::tree::ElementTree::create).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The node id, or `""` before one has been assigned.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn clear_title(&mut self) -> &mut Self {
        self.title = None;
        self
    }

    /// Space-separated style classes (`class` in markup).
    pub fn style_class(&self) -> Option<&str> {
        self.style_class.as_deref()
    }

    pub fn set_style_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.style_class = Some(class.into());
        self
    }

    pub fn clear_style_class(&mut self) -> &mut Self {
        self.style_class = None;
        self
    }

    /// Inline style declarations (`style` in markup).
    pub fn inline_style(&self) -> Option<&str> {
        self.inline_style.as_deref()
    }

    pub fn set_inline_style(&mut self, style: impl Into<String>) -> &mut Self {
        self.inline_style = Some(style.into());
        self
    }

    pub fn clear_inline_style(&mut self) -> &mut Self {
        self.inline_style = None;
        self
    }

    pub fn has_on_attach(&self) -> bool {
        self.on_attach.is_some()
    }

    pub fn set_on_attach(&mut self, hook: impl FnMut(&mut dyn Element) + 'static) -> &mut Self {
        self.on_attach = Some(Box::new(hook));
        self
    }

    pub fn clear_on_attach(&mut self) -> &mut Self {
        self.on_attach = None;
        self
    }

    pub(crate) fn take_on_attach(&mut self) -> Option<AttachHook> {
        self.on_attach.take()
    }

    pub(crate) fn restore_on_attach(&mut self, hook: AttachHook) {
        // A hook installed while the old one was running wins.
        if self.on_attach.is_none() {
            self.on_attach = Some(hook);
        }
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.put(key, value);
        self
    }

    pub fn remove_attribute(&mut self, key: &str) -> &mut Self {
        self.attributes.remove(key);
        self
    }

    pub fn clear_attributes(&mut self) -> &mut Self {
        self.attributes.clear();
        self
    }

    /// Default markup for `kind`: id, title, class, style, then whatever
    /// `extra` writes, then children (or `/>` for void kinds).
    pub fn render(
        &self,
        kind: &ElementKind,
        cx: &SerializeContext<'_>,
        extra: impl FnOnce(&mut Markup),
    ) -> String {
        let mut markup = Markup::open(kind.tag(), cx.escape);
        markup
            .attr("id", self.id())
            .attr_opt("title", self.title())
            .attr_opt("class", self.style_class())
            .attr_opt("style", self.inline_style());
        extra(&mut markup);

        if kind.is_void() {
            markup.finish_void()
        } else {
            markup.finish(kind.tag(), cx.children)
        }
    }
}

impl fmt::Debug for ElementBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBase")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("style_class", &self.style_class)
            .field("inline_style", &self.inline_style)
            .field("attributes", &self.attributes)
            .field("on_attach", &self.on_attach.is_some())
            .finish()
    }
}

/// Base trait for all element nodes.
pub trait Element: Any {
    /// Static descriptor of the concrete type.
    fn kind(&self) -> &'static ElementKind;

    fn base(&self) -> &ElementBase;

    fn base_mut(&mut self) -> &mut ElementBase;

    /// Named operations this node supports, checked against the element
    /// contract when the node enters a tree.
    fn capabilities(&self) -> &[&'static str] {
        ELEMENT_OPERATIONS
    }

    /// Whether `add` may give this node children.
    fn accepts_children(&self) -> bool {
        !self.kind().is_void()
    }

    /// Write the kind's typed attributes that are present in the store.
    fn write_attributes(&self, markup: &mut Markup) {
        let attributes = self.base().attributes();
        for name in self.kind().attributes() {
            markup.attr_opt(name, attributes.get(name));
        }
    }

    /// Markup for this node given its children's markup.
    fn serialize(&self, cx: &SerializeContext<'_>) -> String {
        self.base()
            .render(self.kind(), cx, |markup| self.write_attributes(markup))
    }

    /// Node-local post-insertion binding. Must tolerate repeated calls.
    fn activate(&mut self, _backend: &mut dyn Backend) -> ElementResult<()> {
        Ok(())
    }

    fn show(&mut self, backend: &mut dyn Backend) {
        backend.set_visible(self.base().id(), true);
    }

    fn hide(&mut self, backend: &mut dyn Backend) {
        backend.set_visible(self.base().id(), false);
    }

    /// Remove this node's own backend presence. Children are already gone.
    fn release(&mut self, backend: &mut dyn Backend) {
        backend.remove(self.base().id());
    }

    fn id(&self) -> &str {
        self.base().id()
    }
}

impl Capable for dyn Element {
    fn provides(&self, operation: &str) -> bool {
        self.capabilities().iter().any(|op| *op == operation)
    }
}

impl fmt::Debug for dyn Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.kind().name())
            .field("id", &self.base().id())
            .finish_non_exhaustive()
    }
}

/// Consuming builder methods available on every concrete element.
pub trait ElementBuilder: Element + Sized {
    fn with_id(mut self, id: impl Into<String>) -> Self {
        self.base_mut().set_id(id);
        self
    }

    fn with_title(mut self, title: impl Into<String>) -> Self {
        self.base_mut().set_title(title);
        self
    }

    fn with_class(mut self, class: impl Into<String>) -> Self {
        self.base_mut().set_style_class(class);
        self
    }

    fn with_style(mut self, style: impl Into<String>) -> Self {
        self.base_mut().set_inline_style(style);
        self
    }

    fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_mut().set_attribute(key, value);
        self
    }

    fn on_attach(mut self, hook: impl FnMut(&mut dyn Element) + 'static) -> Self {
        self.base_mut().set_on_attach(hook);
        self
    }
}

impl<T: Element> ElementBuilder for T {}
