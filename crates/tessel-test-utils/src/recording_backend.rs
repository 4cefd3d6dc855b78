//! Backend double recording every call.

use parking_lot::Mutex;
use tessel_ui::{Backend, BackendError, Location, MarkupDocument};

/// A backend operation, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Insert { location: Location, markup: String },
    QueryExists(String),
    Remove(String),
    SetVisible { id: String, visible: bool },
    Clear(String),
}

/// Backend over a real [`MarkupDocument`] that logs each call.
///
/// Inserts can be made to fail on demand to exercise error propagation;
/// a failed insert is still recorded but leaves the document untouched.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    document: MarkupDocument,
    calls: Mutex<Vec<BackendCall>>,
    /// Inserts still allowed to succeed. `None` never fails.
    inserts_left: Mutex<Option<usize>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The document behind the recorder.
    pub fn document(&self) -> &MarkupDocument {
        &self.document
    }

    /// Copy of all recorded calls, oldest first.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make subsequent inserts fail with [`BackendError::Malformed`].
    pub fn set_fail_inserts(&self, fail: bool) {
        *self.inserts_left.lock() = fail.then_some(0);
    }

    /// Let the next `count` inserts through, then fail every one after.
    pub fn fail_inserts_after(&self, count: usize) {
        *self.inserts_left.lock() = Some(count);
    }

    pub fn count_inserts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, BackendCall::Insert { .. }))
            .count()
    }

    /// Markup of every insert, in call order.
    pub fn inserted_markup(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Insert { markup, .. } => Some(markup.clone()),
                _ => None,
            })
            .collect()
    }

    /// Ids passed to `remove`, in call order.
    pub fn removed_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                BackendCall::Remove(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().push(call);
    }
}

impl Backend for RecordingBackend {
    fn insert(&mut self, location: &Location, markup: &str) -> Result<(), BackendError> {
        self.record(BackendCall::Insert {
            location: location.clone(),
            markup: markup.to_string(),
        });
        if let Some(left) = self.inserts_left.lock().as_mut() {
            if *left == 0 {
                return Err(BackendError::Malformed("insert rejected by test backend".to_string()));
            }
            *left -= 1;
        }
        self.document.insert(location, markup)
    }

    fn query_exists(&self, id: &str) -> bool {
        self.record(BackendCall::QueryExists(id.to_string()));
        self.document.query_exists(id)
    }

    fn remove(&mut self, id: &str) {
        self.record(BackendCall::Remove(id.to_string()));
        self.document.remove(id);
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        self.record(BackendCall::SetVisible {
            id: id.to_string(),
            visible,
        });
        self.document.set_visible(id, visible);
    }

    fn clear(&mut self, id: &str) {
        self.record(BackendCall::Clear(id.to_string()));
        self.document.clear(id);
    }
}
