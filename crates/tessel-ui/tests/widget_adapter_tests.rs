//! Widget inputs forwarding every phase to their adapter.

use tessel_test_utils::{AdapterCall, RecordingAdapter, RecordingBackend};
use tessel_ui::prelude::*;

fn registry_with(adapter: &RecordingAdapter) -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register("numberspinner", adapter.clone());
    registry
}

#[test]
fn test_unsupported_widget_type() {
    let registry = AdapterRegistry::with_native_inputs();
    assert_eq!(
        WidgetInput::new(&registry, "colorwheel").unwrap_err(),
        ElementError::UnsupportedWidgetType("colorwheel".to_string())
    );
}

#[test]
fn test_phases_are_forwarded() {
    let adapter = RecordingAdapter::new("spinner");
    let registry = registry_with(&adapter);

    let mut tree = ElementTree::new(RecordingBackend::new());
    let form = tree.create(Form::new().with_id("f")).unwrap();
    let qty = tree
        .create(
            WidgetInput::new(&registry, "numberspinner")
                .unwrap()
                .with_id("qty")
                .with_class("narrow")
                .configure("min", 1),
        )
        .unwrap();
    tree.add(form, [qty]).unwrap();

    tree.append_to(form, "body").unwrap();
    tree.activate(form).unwrap();
    tree.hide(qty).unwrap();
    tree.show(qty).unwrap();
    tree.destroy(form);

    assert_eq!(
        adapter.calls(),
        vec![
            AdapterCall::Serialize {
                id: "qty".into(),
                config: vec![("min".into(), "1".into()), ("class".into(), "narrow".into())],
            },
            AdapterCall::Activate("qty".into()),
            AdapterCall::Hide("qty".into()),
            AdapterCall::Show("qty".into()),
            AdapterCall::Destroy("qty".into()),
        ]
    );
    assert_eq!(adapter.activations("qty"), 1);
    assert!(tree.backend().document().is_empty());
}

#[test]
fn test_widget_markup_lands_in_document() {
    let adapter = RecordingAdapter::new("spinner");
    let registry = registry_with(&adapter);

    let mut tree = ElementTree::headless();
    let qty = tree
        .create(WidgetInput::new(&registry, "numberspinner").unwrap())
        .unwrap();
    tree.show(qty).unwrap();

    assert_eq!(
        tree.backend().to_markup(),
        "<span id='WidgetInput1' data-widget='spinner'></span>"
    );
    assert_eq!(tree.backend().is_visible("WidgetInput1"), Some(true));
}

#[test]
fn test_widget_input_refuses_children() {
    let registry = AdapterRegistry::with_native_inputs();
    let mut tree = ElementTree::headless();
    let input = tree.create(WidgetInput::new(&registry, "text").unwrap()).unwrap();
    let label = tree.create(Label::new()).unwrap();

    assert!(matches!(
        tree.add(input, [label]),
        Err(ElementError::InvariantViolation(_))
    ));
    assert!(matches!(
        tree.add_markup(input, "<b></b>"),
        Err(ElementError::InvariantViolation(_))
    ));
    assert!(tree.find(input, Find::Kind(&LABEL)).unwrap().is_empty());
}

#[test]
fn test_native_password_input() {
    let registry = AdapterRegistry::with_native_inputs();
    let mut tree = ElementTree::headless();
    let pw = tree
        .create(
            WidgetInput::new(&registry, "password")
                .unwrap()
                .with_id("pw")
                .configure("name", "secret"),
        )
        .unwrap();
    tree.append_to(pw, "body").unwrap();

    assert_eq!(tree.backend().attribute("pw", "type"), Some("password"));
    assert_eq!(tree.backend().attribute("pw", "name"), Some("secret"));
}
