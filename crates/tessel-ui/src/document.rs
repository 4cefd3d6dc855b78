//! In-memory document implementing [`Backend`].
//!
//! `MarkupDocument` stands in for a browser DOM: inserted fragments are parsed
//! into a node arena under a synthetic `body`, ids are indexed for lookup and
//! each element carries a visibility bit. Fragments go through html5ever with
//! the insertion target as context element, so any markup a browser would
//! accept is accepted here too.

use crate::backend::{Backend, Location};
use crate::error::BackendError;
use crate::markup::Markup;
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName, parse_fragment};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tessel_core::alloc::HashMap;

/// Tags that never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Tags whose text is written back without escaping.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

const BODY_SLOT: usize = 0;

#[derive(Debug, Clone)]
enum Content {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct DocNode {
    content: Content,
    parent: Option<usize>,
    children: Vec<usize>,
    visible: bool,
}

impl DocNode {
    fn attribute(&self, name: &str) -> Option<&str> {
        match &self.content {
            Content::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            Content::Text(_) | Content::Comment(_) => None,
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.content {
            Content::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }
}

/// Headless backend keeping a parsed copy of everything inserted.
#[derive(Debug, Clone)]
pub struct MarkupDocument {
    slots: Vec<Option<DocNode>>,
    free: Vec<usize>,
    ids: HashMap<String, usize>,
}

impl Default for MarkupDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupDocument {
    /// Empty document containing only `body`.
    pub fn new() -> Self {
        let body = DocNode {
            content: Content::Element {
                tag: "body".to_string(),
                attributes: Vec::new(),
            },
            parent: None,
            children: Vec::new(),
            visible: true,
        };
        Self {
            slots: vec![Some(body)],
            free: Vec::new(),
            ids: HashMap::default(),
        }
    }

    /// Number of live elements, `body` excluded.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .skip(1)
            .flatten()
            .filter(|node| matches!(node.content, Content::Element { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the element children of `location`, in document order.
    /// Children without an id are skipped.
    pub fn child_ids(&self, location: impl Into<Location>) -> Vec<String> {
        let Some(slot) = self.resolve(&location.into()) else {
            return Vec::new();
        };
        self.node(slot)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&child| self.node(child)?.attribute("id"))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Visibility of the element with `id`, if present.
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.ids
            .get(id)
            .and_then(|&slot| self.node(slot))
            .map(|node| node.visible)
    }

    /// Unescaped value of `name` on the element with `id`.
    pub fn attribute(&self, id: &str, name: &str) -> Option<&str> {
        self.ids.get(id).and_then(|&slot| self.node(slot)?.attribute(name))
    }

    /// Markup of everything inside `body`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        if let Some(body) = self.node(BODY_SLOT) {
            for &child in &body.children {
                self.write_node(child, &mut out);
            }
        }
        out
    }

    /// Markup of the element with `id`, including the element itself.
    pub fn element_markup(&self, id: &str) -> Option<String> {
        let slot = *self.ids.get(id)?;
        let mut out = String::new();
        self.write_node(slot, &mut out);
        Some(out)
    }

    fn node(&self, slot: usize) -> Option<&DocNode> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn resolve(&self, location: &Location) -> Option<usize> {
        match location {
            Location::Body => Some(BODY_SLOT),
            Location::Id(id) => self.ids.get(id).copied(),
        }
    }

    fn write_node(&self, slot: usize, out: &mut String) {
        let Some(node) = self.node(slot) else {
            return;
        };
        match &node.content {
            Content::Text(text) => {
                let raw = node
                    .parent
                    .and_then(|parent| self.node(parent)?.tag())
                    .is_some_and(|tag| RAW_TEXT_TAGS.contains(&tag));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            Content::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Content::Element { tag, attributes } => {
                let mut markup = Markup::open(tag, true);
                for (key, value) in attributes {
                    markup.attr(key, value);
                }
                if is_void_tag(tag) {
                    out.push_str(&markup.finish_void());
                } else {
                    let mut inner = String::new();
                    for &child in &node.children {
                        self.write_node(child, &mut inner);
                    }
                    out.push_str(&markup.finish(tag, &inner));
                }
            }
        }
    }

    fn materialize(&mut self, parsed: Parsed, parent: usize) -> usize {
        let (content, children) = match parsed {
            Parsed::Text(text) => (Content::Text(text), Vec::new()),
            Parsed::Comment(text) => (Content::Comment(text), Vec::new()),
            Parsed::Element {
                tag,
                attributes,
                children,
            } => (Content::Element { tag, attributes }, children),
        };
        let node = DocNode {
            content,
            parent: Some(parent),
            children: Vec::new(),
            visible: true,
        };
        let id = node.attribute("id").map(str::to_string);

        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        if let Some(id) = id {
            self.ids.insert(id, slot);
        }

        for child in children {
            let child_slot = self.materialize(child, slot);
            if let Some(node) = self.slots[slot].as_mut() {
                node.children.push(child_slot);
            }
        }
        slot
    }

    fn release_slot(&mut self, slot: usize) {
        let Some(node) = self.slots.get_mut(slot).and_then(Option::take) else {
            return;
        };
        if let Some(id) = node.attribute("id")
            && self.ids.get(id) == Some(&slot)
        {
            self.ids.remove(id);
        }
        for child in node.children {
            self.release_slot(child);
        }
        self.free.push(slot);
    }
}

impl Backend for MarkupDocument {
    fn insert(&mut self, location: &Location, markup: &str) -> Result<(), BackendError> {
        let parent = self
            .resolve(location)
            .ok_or_else(|| BackendError::UnknownLocation(location_name(location)))?;
        let context = self.node(parent).and_then(DocNode::tag).unwrap_or(crate::backend::BODY);
        // Parse fully before touching the arena so a bad fragment changes nothing.
        let fragment = parse_fragment_in(context, markup)?;
        for parsed in fragment {
            let slot = self.materialize(parsed, parent);
            if let Some(node) = self.slots[parent].as_mut() {
                node.children.push(slot);
            }
        }
        Ok(())
    }

    fn query_exists(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    fn remove(&mut self, id: &str) {
        let Some(&slot) = self.ids.get(id) else {
            return;
        };
        if let Some(parent) = self.node(slot).and_then(|node| node.parent)
            && let Some(parent) = self.slots[parent].as_mut()
        {
            parent.children.retain(|&child| child != slot);
        }
        self.release_slot(slot);
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        if let Some(&slot) = self.ids.get(id)
            && let Some(node) = self.slots[slot].as_mut()
        {
            node.visible = visible;
        }
    }

    fn clear(&mut self, id: &str) {
        let Some(&slot) = self.ids.get(id) else {
            return;
        };
        let children = self.slots[slot]
            .as_mut()
            .map(|node| std::mem::take(&mut node.children))
            .unwrap_or_default();
        for child in children {
            self.release_slot(child);
        }
    }
}

#[derive(Debug)]
enum Parsed {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Parsed>,
    },
    Text(String),
    Comment(String),
}

/// Parse `markup` as the content of a `context` element.
///
/// html5ever recovers from malformed input the way a browser does, so only a
/// failure to read the input surfaces as an error.
fn parse_fragment_in(context: &str, markup: &str) -> Result<Vec<Parsed>, BackendError> {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(context));
    let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), false)
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .map_err(|err| BackendError::Malformed(err.to_string()))?;

    // Fragment parsing roots its output under a synthetic `html` element.
    let root = dom.document.children.borrow().first().cloned();
    Ok(root.map(|root| convert_children(&root)).unwrap_or_default())
}

fn convert_children(handle: &Handle) -> Vec<Parsed> {
    handle.children.borrow().iter().filter_map(convert_node).collect()
}

fn convert_node(handle: &Handle) -> Option<Parsed> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => Some(Parsed::Element {
            tag: name.local.to_string(),
            attributes: attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            children: convert_children(handle),
        }),
        NodeData::Text { contents } => Some(Parsed::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Parsed::Comment(contents.to_string())),
        NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => None,
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn location_name(location: &Location) -> String {
    match location {
        Location::Body => crate::backend::BODY.to_string(),
        Location::Id(id) => id.clone(),
    }
}

fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|void| *void == tag)
}
