//! Tessel - element composition and rendering
//!
//! Tessel builds presentational UIs as trees of element nodes, renders them to
//! markup and keeps them in sync with a live backend.
//!
//! - **Element tree**: arena-owned nodes with add / remove / find / destroy
//! - **Two-phase rendering**: pure `serialize`, then `activate` once live
//! - **Widget adapters**: plug third-party controls in by type tag
//! - **Headless backend**: an in-memory document for tests and servers
//!
//! # Quick Start
//!
//! ```rust
//! use tessel::prelude::*;
//!
//! tessel::init(&Config::default());
//!
//! let mut tree = ElementTree::headless();
//! let form = tree.create(Form::new().with_id("login").method("post")).unwrap();
//! let user = tree.create(Input::new().with_id("user").input_type("text")).unwrap();
//! tree.add(form, [user]).unwrap();
//! tree.show(form).unwrap();
//!
//! assert!(tree.is_attached(user));
//! ```

pub use tessel_core as core;
#[cfg(feature = "ui")]
pub use tessel_ui as ui;

pub use tessel_core::{Config, LogFormat};

/// Install the global `tracing` subscriber described by `config`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init(config: &Config) {
    tessel_core::logging::init_with_config(config);
    tracing::debug!(filter = %config.log_filter, "tessel initialized");
}

pub mod prelude {
    pub use tessel_core::{Config, LogFormat};
    #[cfg(feature = "ui")]
    pub use tessel_ui::prelude::*;
}
