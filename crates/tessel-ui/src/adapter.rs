//! Widget adapters: the seam to third-party widget toolkits.
//!
//! Some controls are not plain markup. A spinner or a styled file picker is
//! rendered and wired up by an external toolkit. Such controls are modelled
//! by [`WidgetInput`], which owns no rendering logic at all: it resolves a
//! [`WidgetAdapter`] by type tag from an [`AdapterRegistry`] and forwards
//! every phase to it together with its id and configuration.
//!
//! The engine never looks inside an adapter. Adapters are usually contributed
//! in bulk by an [`AdapterPlugin`].

use crate::attributes::AttributeStore;
use crate::backend::Backend;
use crate::element::{Element, ElementBase, SerializeContext};
use crate::error::{ElementError, ElementResult};
use crate::kind::ElementKind;
use crate::markup::Markup;
use crate::widgets::INPUT;
use std::fmt;
use std::sync::Arc;
use tessel_core::alloc::HashMap;

/// Free-form configuration handed to an adapter.
pub type WidgetConfig = AttributeStore;

/// Backend-specific implementation of a widget type.
pub trait WidgetAdapter: Send + Sync {
    /// Markup for the widget with `id`.
    fn serialize(&self, id: &str, config: &WidgetConfig) -> String;

    /// Bind toolkit behaviour once the markup is live.
    fn activate(&self, _id: &str, _config: &WidgetConfig, _backend: &mut dyn Backend) -> ElementResult<()> {
        Ok(())
    }

    fn show(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        backend.set_visible(id, true);
    }

    fn hide(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        backend.set_visible(id, false);
    }

    fn destroy(&self, id: &str, _config: &WidgetConfig, backend: &mut dyn Backend) {
        backend.remove(id);
    }
}

/// Contributes a family of adapters to a registry.
pub trait AdapterPlugin {
    /// Plugin name for debugging and logging.
    fn name(&self) -> &str;

    /// Register every adapter this plugin provides.
    fn register_adapters(&self, registry: &mut AdapterRegistry);
}

/// Maps widget type tags to adapters.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn WidgetAdapter>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with [`NativeInputs`].
    pub fn with_native_inputs() -> Self {
        let mut registry = Self::new();
        registry.add_plugin(&NativeInputs);
        registry
    }

    /// Register `adapter` under `tag`, replacing any previous entry.
    pub fn register(&mut self, tag: impl Into<String>, adapter: impl WidgetAdapter + 'static) -> &mut Self {
        self.register_shared(tag, Arc::new(adapter))
    }

    pub fn register_shared(&mut self, tag: impl Into<String>, adapter: Arc<dyn WidgetAdapter>) -> &mut Self {
        let tag = tag.into();
        if self.adapters.insert(tag.clone(), adapter).is_some() {
            tracing::debug!(tag = %tag, "replaced widget adapter");
        }
        self
    }

    pub fn add_plugin(&mut self, plugin: &dyn AdapterPlugin) -> &mut Self {
        let before = self.adapters.len();
        plugin.register_adapters(self);
        tracing::debug!(
            plugin = plugin.name(),
            added = self.adapters.len().saturating_sub(before),
            "registered adapter plugin"
        );
        self
    }

    pub fn lookup(&self, tag: &str) -> Option<Arc<dyn WidgetAdapter>> {
        self.adapters.get(tag).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.adapters.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Kind descriptor for [`WidgetInput`].
pub static WIDGET_INPUT: ElementKind = ElementKind::extend(ElementKind::new("WidgetInput", "input"), &INPUT);

/// Input control rendered entirely by a [`WidgetAdapter`].
///
/// The adapter receives the node id and a configuration built from the
/// node's attribute store plus its `title`, `class` and `style` metadata.
pub struct WidgetInput {
    base: ElementBase,
    widget_type: String,
    adapter: Arc<dyn WidgetAdapter>,
}

impl WidgetInput {
    /// Resolve the adapter for `widget_type`.
    ///
    /// Fails with [`ElementError::UnsupportedWidgetType`] when nothing is
    /// registered under that tag.
    pub fn new(registry: &AdapterRegistry, widget_type: &str) -> ElementResult<Self> {
        let adapter = registry
            .lookup(widget_type)
            .ok_or_else(|| ElementError::UnsupportedWidgetType(widget_type.to_string()))?;
        Ok(Self {
            base: ElementBase::new(),
            widget_type: widget_type.to_string(),
            adapter,
        })
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    /// Set one configuration entry.
    pub fn configure(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.base.set_attribute(key, value.to_string());
        self
    }

    /// Configuration as the adapter sees it.
    pub fn config(&self) -> WidgetConfig {
        let mut config = self.base.attributes().clone();
        let metadata = [
            ("title", self.base.title()),
            ("class", self.base.style_class()),
            ("style", self.base.inline_style()),
        ];
        for (key, value) in metadata {
            if let Some(value) = value
                && !config.has(key)
            {
                config.put(key, value);
            }
        }
        config
    }
}

impl fmt::Debug for WidgetInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetInput")
            .field("base", &self.base)
            .field("widget_type", &self.widget_type)
            .finish_non_exhaustive()
    }
}

impl Element for WidgetInput {
    fn kind(&self) -> &'static ElementKind {
        &WIDGET_INPUT
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn accepts_children(&self) -> bool {
        false
    }

    fn serialize(&self, _cx: &SerializeContext<'_>) -> String {
        self.adapter.serialize(self.base.id(), &self.config())
    }

    fn activate(&mut self, backend: &mut dyn Backend) -> ElementResult<()> {
        self.adapter.activate(self.base.id(), &self.config(), backend)
    }

    fn show(&mut self, backend: &mut dyn Backend) {
        self.adapter.show(self.base.id(), &self.config(), backend);
    }

    fn hide(&mut self, backend: &mut dyn Backend) {
        self.adapter.hide(self.base.id(), &self.config(), backend);
    }

    fn release(&mut self, backend: &mut dyn Backend) {
        self.adapter.destroy(self.base.id(), &self.config(), backend);
    }
}

/// Adapter producing a plain `<input>` of a fixed type.
#[derive(Debug, Clone, Copy)]
pub struct NativeInputAdapter {
    input_type: &'static str,
}

impl NativeInputAdapter {
    /// Configuration keys copied onto the element, in output order.
    const PASSTHROUGH: &'static [&'static str] = &["name", "value", "placeholder"];

    pub const fn new(input_type: &'static str) -> Self {
        Self { input_type }
    }
}

impl WidgetAdapter for NativeInputAdapter {
    fn serialize(&self, id: &str, config: &WidgetConfig) -> String {
        let mut markup = Markup::open("input", true);
        markup
            .attr("id", id)
            .attr_opt("title", config.get("title"))
            .attr_opt("class", config.get("class"))
            .attr_opt("style", config.get("style"))
            .attr("type", self.input_type);
        for key in Self::PASSTHROUGH {
            markup.attr_opt(key, config.get(key));
        }
        markup.finish_void()
    }
}

/// Plugin registering [`NativeInputAdapter`]s for the standard input types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeInputs;

impl NativeInputs {
    pub const TYPES: &'static [&'static str] =
        &["text", "password", "hidden", "checkbox", "radio", "file", "number"];
}

impl AdapterPlugin for NativeInputs {
    fn name(&self) -> &str {
        "native-inputs"
    }

    fn register_adapters(&self, registry: &mut AdapterRegistry) {
        for input_type in Self::TYPES {
            registry.register(*input_type, NativeInputAdapter::new(input_type));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementBuilder;

    struct Spinner;

    impl WidgetAdapter for Spinner {
        fn serialize(&self, id: &str, config: &WidgetConfig) -> String {
            format!("<span id='{id}' data-min='{}'></span>", config.get("min").unwrap_or("0"))
        }
    }

    fn cx() -> SerializeContext<'static> {
        SerializeContext {
            children: "",
            escape: true,
        }
    }

    #[test]
    fn test_unknown_tag_fails_at_construction() {
        let registry = AdapterRegistry::new();
        match WidgetInput::new(&registry, "numberspinner") {
            Err(ElementError::UnsupportedWidgetType(tag)) => assert_eq!(tag, "numberspinner"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_forwards_serialize_with_config() {
        let mut registry = AdapterRegistry::new();
        registry.register("numberspinner", Spinner);

        let input = WidgetInput::new(&registry, "numberspinner")
            .unwrap()
            .with_id("qty")
            .configure("min", 5);
        assert_eq!(input.serialize(&cx()), "<span id='qty' data-min='5'></span>");
        assert!(!input.accepts_children());
        assert_eq!(input.kind().super_kind(), Some(&INPUT));
    }

    #[test]
    fn test_native_inputs_plugin() {
        let registry = AdapterRegistry::with_native_inputs();
        assert_eq!(registry.len(), NativeInputs::TYPES.len());
        assert!(registry.contains("password"));

        let input = WidgetInput::new(&registry, "password")
            .unwrap()
            .with_id("pw")
            .with_class("secret")
            .configure("name", "pw");
        assert_eq!(
            input.serialize(&cx()),
            "<input id='pw' class='secret' type='password' name='pw'/>"
        );
    }

    #[test]
    fn test_config_prefers_explicit_entries() {
        let registry = AdapterRegistry::with_native_inputs();
        let input = WidgetInput::new(&registry, "text")
            .unwrap()
            .with_title("from metadata")
            .configure("title", "explicit");
        assert_eq!(input.config().get("title"), Some("explicit"));
    }
}
