//! Tessel UI - element composition and two-phase rendering
//!
//! This crate models a presentational UI as a tree of element nodes that is
//! serialized to markup and kept in sync with a live backend:
//! - Composable element tree with ownership tracked in an arena
//! - Strict serialize / activate render protocol
//! - Runtime capability contracts with precise diagnostics
//! - Widget adapters for controls rendered by external toolkits
//! - Headless in-memory backend for tests and server-side use
//!
//! ## Quick Start
//!
//! ```rust
//! use tessel_ui::prelude::*;
//!
//! let mut tree = ElementTree::headless();
//! let panel = tree.create(Div::new().with_id("panel1")).unwrap();
//! let label = tree.create(Label::new().with_id("lbl1").for_id("inp1")).unwrap();
//! let input = tree.create(Input::new().with_id("inp1").input_type("text")).unwrap();
//!
//! tree.add(panel, [label, input]).unwrap();
//! tree.append_to(panel, "body").unwrap();
//!
//! assert!(tree.backend().query_exists("inp1"));
//! assert_eq!(
//!     tree.serialize(panel).unwrap(),
//!     "<div id='panel1'><label id='lbl1' for='inp1'></label><input id='inp1' type='text'/></div>"
//! );
//! ```

pub mod adapter;
pub mod attributes;
pub mod backend;
pub mod config;
pub mod contract;
pub mod document;
pub mod element;
pub mod error;
pub mod id;
pub mod kind;
pub mod markup;
pub mod tree;
pub mod widgets;

pub use adapter::{AdapterPlugin, AdapterRegistry, NativeInputAdapter, NativeInputs, WidgetAdapter, WidgetConfig, WidgetInput};
pub use attributes::AttributeStore;
pub use backend::{Backend, Location};
pub use config::TreeConfig;
pub use contract::{Capable, Contract, element_contract, verify};
pub use document::MarkupDocument;
pub use element::{Element, ElementBase, ElementBuilder, SerializeContext};
pub use error::{BackendError, ElementError, ElementResult};
pub use id::IdCounters;
pub use kind::ElementKind;
pub use tree::{AppendTarget, Child, ElementTree, Find, NodeFlags, NodeId, TreeNode};

/// Everything needed to build and render a tree.
pub mod prelude {
    pub use crate::adapter::{AdapterRegistry, WidgetAdapter, WidgetConfig, WidgetInput};
    pub use crate::backend::{Backend, Location};
    pub use crate::config::TreeConfig;
    pub use crate::element::{Element, ElementBuilder, SerializeContext};
    pub use crate::error::{ElementError, ElementResult};
    pub use crate::tree::{Child, ElementTree, Find, NodeId};
    pub use crate::widgets::*;
}
