//! Element tree: the engine driving composition and the render protocol.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Identity is the `NodeId`, not
//! the element's string id, which is only used to talk to the backend.
//!
//! The tree owns the backend. Every operation that touches live markup goes
//! through it, and every operation that only reads state (`serialize`,
//! `find`) leaves it alone.

use crate::backend::{Backend, Location};
use crate::config::TreeConfig;
use crate::contract::{element_contract, verify};
use crate::document::MarkupDocument;
use crate::element::{Element, SerializeContext};
use crate::error::{ElementError, ElementResult};
use crate::id::IdCounters;
use crate::kind::ElementKind;
use bitflags::bitflags;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use tessel_core::alloc::HashSet;

/// Node identifier in the element tree. Never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

bitflags! {
    /// Render-cycle state of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Activated during the current attach cycle.
        const ACTIVATED = 0b01;
        /// Hidden through [`ElementTree::hide`].
        const HIDDEN    = 0b10;
    }
}

/// An entry in a node's child sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A node owned by the same tree.
    Node(NodeId),
    /// Inert markup emitted verbatim. Never searched, never activated.
    Markup(String),
}

impl Child {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Child::Node(id) => Some(*id),
            Child::Markup(_) => None,
        }
    }
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

impl From<&str> for Child {
    fn from(markup: &str) -> Self {
        Child::Markup(markup.to_string())
    }
}

impl From<String> for Child {
    fn from(markup: String) -> Self {
        Child::Markup(markup)
    }
}

/// Search criterion for [`ElementTree::find`].
#[derive(Debug, Clone, Copy)]
pub enum Find<'a> {
    /// Nodes whose concrete kind is exactly this one.
    Kind(&'static ElementKind),
    /// One specific node.
    Node(NodeId),
    /// Nodes whose element id equals this string.
    Id(&'a str),
}

/// Destination for [`ElementTree::append_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendTarget {
    /// Become the last child of another node.
    Node(NodeId),
    /// Attach directly to a live backend location.
    Location(Location),
}

impl From<NodeId> for AppendTarget {
    fn from(id: NodeId) -> Self {
        AppendTarget::Node(id)
    }
}

impl From<Location> for AppendTarget {
    fn from(location: Location) -> Self {
        AppendTarget::Location(location)
    }
}

impl From<&str> for AppendTarget {
    fn from(target: &str) -> Self {
        AppendTarget::Location(Location::parse(target))
    }
}

/// A node in the element tree.
pub struct TreeNode {
    element: Box<dyn Element>,
    parent: Option<NodeId>,
    children: Vec<Child>,
    flags: NodeFlags,
}

impl TreeNode {
    pub fn element(&self) -> &dyn Element {
        self.element.as_ref()
    }

    pub fn element_mut(&mut self) -> &mut dyn Element {
        self.element.as_mut()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Node children, skipping raw markup.
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().filter_map(Child::node)
    }

    pub fn flags(&self) -> NodeFlags {
        self.flags
    }
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("element", &self.element)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("flags", &self.flags)
            .finish()
    }
}

/// Element tree managing composition, rendering and backend sync.
pub struct ElementTree<B: Backend = MarkupDocument> {
    nodes: IndexMap<NodeId, TreeNode>,
    next_id: usize,
    counters: IdCounters,
    config: TreeConfig,
    backend: B,
}

impl ElementTree<MarkupDocument> {
    /// Tree over a fresh in-memory document.
    pub fn headless() -> Self {
        Self::new(MarkupDocument::new())
    }
}

impl Default for ElementTree<MarkupDocument> {
    fn default() -> Self {
        Self::headless()
    }
}

impl<B: Backend> ElementTree<B> {
    pub fn new(backend: B) -> Self {
        Self::with_counters(backend, IdCounters::new())
    }

    /// Tree drawing generated ids from `counters`.
    pub fn with_counters(backend: B, counters: IdCounters) -> Self {
        Self {
            nodes: IndexMap::new(),
            next_id: 0,
            counters,
            config: TreeConfig::default(),
            backend,
        }
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn counters(&self) -> &IdCounters {
        &self.counters
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Live node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Typed access to a node's element.
    pub fn element<T: Element>(&self, id: NodeId) -> Option<&T> {
        let element: &dyn Any = self.nodes.get(&id)?.element.as_ref();
        element.downcast_ref::<T>()
    }

    pub fn element_mut<T: Element>(&mut self, id: NodeId) -> Option<&mut T> {
        let element: &mut dyn Any = self.nodes.get_mut(&id)?.element.as_mut();
        element.downcast_mut::<T>()
    }

    /// Look up the node with element id `id`.
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.element.id() == id)
            .map(|(node_id, _)| *node_id)
    }

    /// Add an element to the tree as a detached root.
    ///
    /// The element is checked against the element contract and receives a
    /// generated id when it has none.
    pub fn create(&mut self, element: impl Element) -> ElementResult<NodeId> {
        self.create_boxed(Box::new(element))
    }

    pub fn create_boxed(&mut self, mut element: Box<dyn Element>) -> ElementResult<NodeId> {
        verify(element.as_ref(), &[element_contract()])?;
        element.kind().validate()?;

        if !element.base().has_id() {
            let id = self.counters.next(element.kind().name());
            element.base_mut().set_id(id);
        } else if self.config.warn_duplicate_ids && self.lookup(element.id()).is_some() {
            tracing::warn!(id = element.id(), "element id already used by a live node");
        }

        let node_id = NodeId(self.next_id);
        self.next_id += 1;
        tracing::trace!(node = %node_id, kind = %element.kind(), id = element.id(), "created element");

        self.nodes.insert(
            node_id,
            TreeNode {
                element,
                parent: None,
                children: Vec::new(),
                flags: NodeFlags::empty(),
            },
        );
        Ok(node_id)
    }

    /// Append children to `parent`.
    ///
    /// Every child is checked before anything changes; a rejected batch
    /// leaves the tree as it was. A child root that is live elsewhere is pulled
    /// out of the backend first. When `parent` is attached each new child is
    /// serialized, inserted under it and activated, one at a time. Siblings
    /// already live are not re-rendered.
    pub fn add<I>(&mut self, parent: NodeId, children: I) -> ElementResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        let children: Vec<Child> = children.into_iter().map(Into::into).collect();
        let parent_node = self.live(parent)?;
        if children.is_empty() {
            return Ok(());
        }
        if !parent_node.element.accepts_children() {
            return Err(ElementError::InvariantViolation(format!(
                "{} `{}` cannot have children",
                parent_node.element.kind(),
                parent_node.element.id()
            )));
        }
        let location = Location::Id(parent_node.element.id().to_string());

        let mut batch = HashSet::default();
        for child in children.iter().filter_map(Child::node) {
            let node = self.live(child)?;
            verify(node.element.as_ref(), &[element_contract()])?;
            if node.parent.is_some() {
                return Err(ElementError::InvariantViolation(format!("{child} already has a parent")));
            }
            if child == parent || self.is_ancestor(child, parent) {
                return Err(ElementError::InvariantViolation(format!(
                    "adding {child} under {parent} would create a cycle"
                )));
            }
            if !batch.insert(child) {
                return Err(ElementError::InvariantViolation(format!("{child} added twice")));
            }
        }

        for child in children {
            if let Child::Node(id) = &child
                && self.is_attached(*id)
            {
                self.detach(*id);
            }

            let attached = self.is_attached(parent);
            if attached {
                let markup = match &child {
                    Child::Node(id) => self.serialize(*id)?,
                    Child::Markup(markup) => markup.clone(),
                };
                self.backend.insert(&location, &markup)?;
            }

            let node_child = child.node();
            if let Some(id) = node_child
                && let Some(node) = self.nodes.get_mut(&id)
            {
                node.parent = Some(parent);
            }
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.push(child);
            }

            if attached && let Some(id) = node_child {
                tracing::debug!(node = %id, parent = %parent, "attached child to live parent");
                self.activate(id)?;
            }
        }
        Ok(())
    }

    /// Append raw markup as the last child of `parent`.
    pub fn add_markup(&mut self, parent: NodeId, markup: impl Into<String>) -> ElementResult<()> {
        self.add(parent, [Child::Markup(markup.into())])
    }

    /// Destroy every child of `parent` and drop its raw markup.
    ///
    /// When `parent` is attached its backend content is cleared too, leaving
    /// the element itself in place.
    pub fn clear_children(&mut self, parent: NodeId) -> ElementResult<()> {
        let children = self.live(parent)?.children.clone();
        for id in children.iter().filter_map(Child::node) {
            self.destroy(id);
        }
        let Some(node) = self.nodes.get_mut(&parent) else {
            return Ok(());
        };
        node.children.clear();
        let element_id = node.element.id().to_string();
        if self.backend.query_exists(&element_id) {
            self.backend.clear(&element_id);
        }
        tracing::debug!(node = %parent, cleared = children.len(), "cleared children");
        Ok(())
    }

    /// Detach and destroy `target` if it lies anywhere below `root`.
    ///
    /// A target outside the subtree is ignored.
    pub fn remove(&mut self, root: NodeId, target: NodeId) -> ElementResult<()> {
        self.live(root)?;
        if self.is_ancestor(root, target) {
            self.destroy(target);
        }
        Ok(())
    }

    /// All descendants of `root` matching `criterion`, depth-first, parents
    /// before their children. `root` itself is never a candidate.
    ///
    /// Fails with [`ElementError::Destroyed`] when `root` is gone.
    pub fn find(&self, root: NodeId, criterion: Find<'_>) -> ElementResult<Vec<NodeId>> {
        let node = self.live(root)?;
        let mut found = Vec::new();
        self.collect(node, &criterion, &mut found);
        Ok(found)
    }

    fn collect(&self, node: &TreeNode, criterion: &Find<'_>, found: &mut Vec<NodeId>) {
        for id in node.child_nodes() {
            let Some(child) = self.nodes.get(&id) else {
                continue;
            };
            let hit = match criterion {
                Find::Kind(kind) => child.element.kind() == *kind,
                Find::Node(target) => id == *target,
                Find::Id(target) => child.element.id() == *target,
            };
            if hit {
                found.push(id);
            }
            self.collect(child, criterion, found);
        }
    }

    /// Markup for `id` and its subtree. Does not touch the backend.
    pub fn serialize(&self, id: NodeId) -> ElementResult<String> {
        let node = self.live(id)?;
        let mut children = String::new();
        for child in &node.children {
            match child {
                Child::Node(child) => children.push_str(&self.serialize(*child)?),
                Child::Markup(markup) => children.push_str(markup),
            }
        }
        let cx = SerializeContext {
            children: &children,
            escape: self.config.escape_attributes,
        };
        Ok(node.element.serialize(&cx))
    }

    /// Run the post-insertion phase for `id` and its subtree.
    ///
    /// Does nothing when the node is not attached. Within one attach cycle a
    /// node is activated once and its `on_attach` hook fires once; later calls
    /// are no-ops.
    pub fn activate(&mut self, id: NodeId) -> ElementResult<()> {
        let node = self.live(id)?;
        if node.flags.contains(NodeFlags::ACTIVATED) {
            return Ok(());
        }
        if !self.backend.query_exists(node.element.id()) {
            tracing::trace!(node = %id, "skipping activation of detached node");
            return Ok(());
        }

        let Some(node) = self.nodes.get_mut(&id) else {
            return Ok(());
        };
        node.element.activate(&mut self.backend)?;
        if let Some(mut hook) = node.element.base_mut().take_on_attach() {
            hook(node.element.as_mut());
            node.element.base_mut().restore_on_attach(hook);
        }
        node.flags.insert(NodeFlags::ACTIVATED);
        tracing::trace!(node = %id, id = node.element.id(), "activated");

        let children: Vec<NodeId> = node.child_nodes().collect();
        for child in children {
            self.activate(child)?;
        }
        Ok(())
    }

    /// Attach `id` to a target.
    ///
    /// A node target makes `id` its last child, leaving any previous parent.
    /// A location target serializes the whole subtree, inserts it there and
    /// activates it; a node already live elsewhere is moved.
    pub fn append_to(&mut self, id: NodeId, target: impl Into<AppendTarget>) -> ElementResult<()> {
        match target.into() {
            AppendTarget::Node(parent) => {
                self.live(id)?;
                let parent_node = self.live(parent)?;
                if !parent_node.element.accepts_children() {
                    return Err(ElementError::InvariantViolation(format!(
                        "{} `{}` cannot have children",
                        parent_node.element.kind(),
                        parent_node.element.id()
                    )));
                }
                if id == parent || self.is_ancestor(id, parent) {
                    return Err(ElementError::InvariantViolation(format!(
                        "appending {id} to {parent} would create a cycle"
                    )));
                }
                self.detach(id);
                self.add(parent, [Child::Node(id)])
            }
            AppendTarget::Location(location) => self.attach_at(id, location),
        }
    }

    fn attach_at(&mut self, id: NodeId, location: Location) -> ElementResult<()> {
        let node = self.live(id)?;
        if let Location::Id(target) = &location {
            if node.element.id() == target.as_str() || !self.find(id, Find::Id(target))?.is_empty() {
                return Err(ElementError::InvariantViolation(format!(
                    "cannot append {id} inside itself"
                )));
            }
            if !self.backend.query_exists(target) {
                return Err(crate::error::BackendError::UnknownLocation(target.clone()).into());
            }
        }

        let markup = self.serialize(id)?;
        self.detach(id);
        self.backend.insert(&location, &markup)?;
        tracing::debug!(node = %id, location = %location, "attached");
        self.activate(id)
    }

    /// Unlink `id` from its parent and pull its markup out of the backend.
    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let parent = node.parent.take();
        let element_id = node.element.id().to_string();
        if let Some(parent) = parent
            && let Some(parent) = self.nodes.get_mut(&parent)
        {
            parent.children.retain(|child| *child != Child::Node(id));
        }
        if self.backend.query_exists(&element_id) {
            self.backend.remove(&element_id);
            tracing::debug!(node = %id, "detached from backend");
        }
        self.reset_activation(id);
    }

    fn reset_activation(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&current) {
                node.flags.remove(NodeFlags::ACTIVATED);
                stack.extend(node.child_nodes());
            }
        }
    }

    /// Make `id` visible, attaching it to `body` first if it is not live.
    ///
    /// A detached node that still has a parent cannot be shown on its own;
    /// show or attach its root instead.
    pub fn show(&mut self, id: NodeId) -> ElementResult<()> {
        let node = self.live(id)?;
        if !self.is_attached(id) {
            if let Some(parent) = node.parent {
                return Err(ElementError::InvariantViolation(format!(
                    "{id} is a child of detached {parent}; show its root instead"
                )));
            }
            self.attach_at(id, Location::Body)?;
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.element.show(&mut self.backend);
            node.flags.remove(NodeFlags::HIDDEN);
        }
        Ok(())
    }

    /// Hide `id`. Detached nodes are left alone.
    pub fn hide(&mut self, id: NodeId) -> ElementResult<()> {
        self.live(id)?;
        if !self.is_attached(id) {
            return Ok(());
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.element.hide(&mut self.backend);
            node.flags.insert(NodeFlags::HIDDEN);
        }
        Ok(())
    }

    /// Tear down `id` and its subtree, children first.
    ///
    /// Each node drops its backend presence, leaves its parent and is removed
    /// from the arena. Destroying a node that is already gone does nothing.
    pub fn destroy(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let children: Vec<NodeId> = node.child_nodes().collect();
        for child in children {
            self.destroy(child);
        }

        let Some(mut node) = self.nodes.shift_remove(&id) else {
            return;
        };
        node.element.release(&mut self.backend);
        if let Some(parent) = node.parent
            && let Some(parent) = self.nodes.get_mut(&parent)
        {
            parent.children.retain(|child| *child != Child::Node(id));
        }
        tracing::debug!(node = %id, id = node.element.id(), "destroyed");
    }

    /// Whether the node's markup is currently live in the backend.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| node.element.base().has_id() && self.backend.query_exists(node.element.id()))
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    fn live(&self, id: NodeId) -> ElementResult<&TreeNode> {
        match self.nodes.get(&id) {
            Some(node) => Ok(node),
            None if id.0 < self.next_id => Err(ElementError::Destroyed(id)),
            None => Err(ElementError::InvariantViolation(format!("{id} does not belong to this tree"))),
        }
    }
}

impl<B: Backend + fmt::Debug> fmt::Debug for ElementTree<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementTree")
            .field("nodes", &self.nodes)
            .field("config", &self.config)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}
