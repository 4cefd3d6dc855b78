//! Widget adapter double recording every forwarded phase.

use parking_lot::Mutex;
use std::sync::Arc;
use tessel_ui::{Backend, ElementResult, WidgetAdapter, WidgetConfig};

/// One phase forwarded to the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    /// Serialization, with the configuration entries seen.
    Serialize { id: String, config: Vec<(String, String)> },
    Activate(String),
    Show(String),
    Hide(String),
    Destroy(String),
}

/// Adapter rendering `<span id='..' data-widget='..'></span>` and logging
/// every call.
///
/// Clones share one call log, so a test can keep a handle while the registry
/// owns another.
#[derive(Debug, Clone)]
pub struct RecordingAdapter {
    widget: String,
    calls: Arc<Mutex<Vec<AdapterCall>>>,
}

impl RecordingAdapter {
    pub fn new(widget: impl Into<String>) -> Self {
        Self {
            widget: widget.into(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// How many times `activate` ran for `id`.
    pub fn activations(&self, id: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, AdapterCall::Activate(seen) if seen == id))
            .count()
    }

    fn record(&self, call: AdapterCall) {
        self.calls.lock().push(call);
    }
}

impl WidgetAdapter for RecordingAdapter {
    fn serialize(&self, id: &str, config: &WidgetConfig) -> String {
        self.record(AdapterCall::Serialize {
            id: id.to_string(),
            config: config
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        });
        format!("<span id='{id}' data-widget='{}'></span>", self.widget)
    }

    fn activate(&self, id: &str, _config: &WidgetConfig, _backend: &mut dyn Backend) -> ElementResult<()> {
        self.record(AdapterCall::Activate(id.to_string()));
        Ok(())
    }

    fn show(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        self.record(AdapterCall::Show(id.to_string()));
        backend.set_visible(id, true);
    }

    fn hide(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        self.record(AdapterCall::Hide(id.to_string()));
        backend.set_visible(id, false);
    }

    fn destroy(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        self.record(AdapterCall::Destroy(id.to_string()));
        backend.remove(id);
    }
}
