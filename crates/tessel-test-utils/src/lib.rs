//! Test utilities for Tessel.
//!
//! Recording doubles for the two seams of the element engine:
//!
//! - [`RecordingBackend`] - a [`Backend`](tessel_ui::Backend) that keeps a real
//!   in-memory document and logs every call made against it
//! - [`RecordingAdapter`] - a [`WidgetAdapter`](tessel_ui::WidgetAdapter) that
//!   logs every phase the engine forwards to it
//!
//! # Example
//!
//! ```rust
//! use tessel_test_utils::{BackendCall, RecordingBackend};
//! use tessel_ui::prelude::*;
//!
//! let mut tree = ElementTree::new(RecordingBackend::new());
//! let panel = tree.create(Div::new().with_id("panel1")).unwrap();
//! tree.append_to(panel, "body").unwrap();
//!
//! assert_eq!(tree.backend().count_inserts(), 1);
//! assert!(tree.backend().calls().contains(&BackendCall::QueryExists("panel1".into())));
//! ```
//!
//! Both doubles record through `parking_lot::Mutex`, so `&self` methods
//! (`query_exists`, every adapter phase) can log too.

pub mod recording_adapter;
pub mod recording_backend;

pub use recording_adapter::{AdapterCall, RecordingAdapter};
pub use recording_backend::{BackendCall, RecordingBackend};
