//! End-to-end tests for composition, rendering and teardown.

use std::cell::Cell;
use std::rc::Rc;
use tessel_test_utils::{BackendCall, RecordingBackend};
use tessel_ui::prelude::*;
use tessel_ui::contract::{ELEMENT_CONTRACT, ELEMENT_OPERATIONS};
use tessel_ui::{BackendError, ElementBase, ElementKind, IdCounters, MarkupDocument, NativeInputs};

fn panel_tree() -> (ElementTree, NodeId) {
    let registry = AdapterRegistry::with_native_inputs();
    let mut tree = ElementTree::headless();

    let panel = tree.create(Div::new().with_id("panel1")).unwrap();
    let label = tree.create(Label::new().with_id("lbl1")).unwrap();
    let input = tree
        .create(WidgetInput::new(&registry, "text").unwrap().with_id("inp1"))
        .unwrap();
    tree.add(panel, [label, input]).unwrap();
    tree.append_to(panel, "body").unwrap();
    (tree, panel)
}

#[test]
fn test_panel_scenario() {
    let (tree, panel) = panel_tree();

    let markup = tree.serialize(panel).unwrap();
    assert_eq!(
        markup,
        "<div id='panel1'><label id='lbl1'></label><input id='inp1' type='text'/></div>"
    );

    let open = markup.find("<div id='panel1'").unwrap();
    let label = markup.find("id='lbl1'").unwrap();
    let input = markup.find("id='inp1'").unwrap();
    let close = markup.rfind("</div>").unwrap();
    assert!(open < label && label < input && input < close);
    assert!(markup.contains("type='text'"));

    for id in ["panel1", "lbl1", "inp1"] {
        assert!(tree.backend().query_exists(id), "{id} should be live");
    }
    assert_eq!(tree.backend().child_ids("panel1"), vec!["lbl1", "inp1"]);
}

#[test]
fn test_panel_destroy_is_terminal() {
    let (mut tree, panel) = panel_tree();
    tree.destroy(panel);

    for id in ["panel1", "lbl1", "inp1"] {
        assert!(!tree.backend().query_exists(id), "{id} should be gone");
    }
    assert!(tree.is_empty());
    assert_eq!(
        tree.find(panel, Find::Id("lbl1")),
        Err(ElementError::Destroyed(panel))
    );

    // Destroying again is harmless.
    tree.destroy(panel);
    assert!(tree.backend().is_empty());
}

#[test]
fn test_find_kind_at_three_depths() {
    let mut tree = ElementTree::headless();
    let root = tree.create(Table::new()).unwrap();
    let outer = tree.create(Td::new().with_id("outer")).unwrap();
    let spacer = tree.create(Div::new()).unwrap();
    let middle = tree.create(Td::new().with_id("middle")).unwrap();
    let inner = tree.create(Td::new().with_id("inner")).unwrap();
    let sibling = tree.create(Td::new().with_id("sibling")).unwrap();

    tree.add(middle, [inner]).unwrap();
    tree.add(spacer, [middle]).unwrap();
    tree.add(outer, [spacer]).unwrap();
    tree.add(root, [outer, sibling]).unwrap();

    assert_eq!(
        tree.find(root, Find::Kind(&TD)).unwrap(),
        vec![outer, middle, inner, sibling]
    );
    assert_eq!(tree.find(spacer, Find::Kind(&TD)).unwrap(), vec![middle, inner]);
    assert!(tree.find(root, Find::Kind(&TABLE)).unwrap().is_empty());
}

#[test]
fn test_add_then_remove_restores_parent() {
    let mut tree = ElementTree::new(RecordingBackend::new());
    let parent = tree.create(Div::new().with_id("parent")).unwrap();
    let first = tree.create(Label::new().with_id("first")).unwrap();
    tree.add(parent, [first]).unwrap();
    tree.append_to(parent, "body").unwrap();
    let before = tree.node(parent).unwrap().children().to_vec();

    let child = tree.create(Fieldset::new().with_id("child")).unwrap();
    let grandchild = tree.create(Legend::new().with_id("grandchild")).unwrap();
    tree.add(child, [grandchild]).unwrap();
    tree.add(parent, [child]).unwrap();
    assert!(tree.backend().document().query_exists("grandchild"));

    tree.backend().clear_calls();
    tree.remove(parent, child).unwrap();

    assert_eq!(tree.node(parent).unwrap().children(), before.as_slice());
    assert!(!tree.contains(child));
    assert!(!tree.contains(grandchild));
    assert_eq!(tree.backend().removed_ids(), vec!["grandchild", "child"]);
    assert!(!tree.backend().document().query_exists("child"));
    assert!(tree.backend().document().query_exists("first"));
}

#[test]
fn test_remove_ignores_foreign_target() {
    let mut tree = ElementTree::headless();
    let a = tree.create(Div::new()).unwrap();
    let b = tree.create(Div::new()).unwrap();
    let leaf = tree.create(Label::new()).unwrap();
    tree.add(b, [leaf]).unwrap();

    tree.remove(a, leaf).unwrap();
    assert!(tree.contains(leaf));
    assert_eq!(tree.node(leaf).unwrap().parent(), Some(b));
}

#[test]
fn test_live_parent_inserts_only_new_child() {
    let mut tree = ElementTree::new(RecordingBackend::new());
    let parent = tree.create(Div::new().with_id("p")).unwrap();
    let existing = tree.create(Label::new().with_id("old")).unwrap();
    tree.add(parent, [existing]).unwrap();
    tree.append_to(parent, "body").unwrap();
    tree.backend().clear_calls();

    let fresh = tree.create(Label::new().with_id("new")).unwrap();
    tree.add(parent, [Child::Node(fresh), Child::Markup("<hr/>".into())]).unwrap();

    let inserts: Vec<BackendCall> = tree
        .backend()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, BackendCall::Insert { .. }))
        .collect();
    assert_eq!(
        inserts,
        vec![
            BackendCall::Insert {
                location: Location::Id("p".into()),
                markup: "<label id='new'></label>".into(),
            },
            BackendCall::Insert {
                location: Location::Id("p".into()),
                markup: "<hr/>".into(),
            },
        ]
    );
    assert_eq!(tree.backend().document().child_ids("p"), vec!["old", "new"]);
}

#[test]
fn test_activate_and_destroy_are_idempotent() {
    let attached = Rc::new(Cell::new(0));
    let seen = attached.clone();

    let mut tree = ElementTree::headless();
    let root = tree
        .create(Div::new().on_attach(move |element| {
            assert_eq!(element.id(), "Div1");
            seen.set(seen.get() + 1);
        }))
        .unwrap();
    tree.append_to(root, "body").unwrap();
    tree.activate(root).unwrap();
    tree.activate(root).unwrap();
    assert_eq!(attached.get(), 1);

    tree.destroy(root);
    tree.destroy(root);
    assert!(tree.backend().is_empty());
}

#[test]
fn test_generated_ids_are_unique() {
    let mut tree = ElementTree::headless();
    let mut ids = std::collections::HashSet::new();
    for _ in 0..100 {
        let node = tree.create(Div::new()).unwrap();
        assert!(ids.insert(tree.node(node).unwrap().element().id().to_string()));
    }
    assert!(ids.contains("Div1") && ids.contains("Div100"));
}

#[test]
fn test_counters_shared_between_trees() {
    let counters = IdCounters::new();
    let mut left = ElementTree::with_counters(MarkupDocument::new(), counters.clone());
    let mut right = ElementTree::with_counters(MarkupDocument::new(), counters.clone());

    let a = left.create(Tr::new()).unwrap();
    let b = right.create(Tr::new()).unwrap();
    assert_eq!(left.node(a).unwrap().element().id(), "Tr1");
    assert_eq!(right.node(b).unwrap().element().id(), "Tr2");
    assert_eq!(counters.issued("Tr"), 2);
}

#[test]
fn test_serialize_is_pure() {
    let mut tree = ElementTree::new(RecordingBackend::new());
    let root = tree.create(Form::new().method("post")).unwrap();
    let field = tree.create(Textarea::new().name("bio")).unwrap();
    tree.add(root, [field]).unwrap();
    tree.backend().clear_calls();

    let first = tree.serialize(root).unwrap();
    assert_eq!(tree.serialize(root).unwrap(), first);
    assert!(tree.backend().calls().is_empty());
}

static HALF: ElementKind = ElementKind::new("Half", "div");

const HALF_OPERATIONS: &[&str] = &[
    "id",
    "title",
    "style_class",
    "inline_style",
    "on_attach",
    "get_attribute",
    "set_attribute",
    "remove_attribute",
    "clear_attributes",
    "activate",
    "add",
    "remove",
    "find",
    "append_to",
];

/// Element that admits to lacking `serialize`.
#[derive(Default)]
struct Half {
    base: ElementBase,
}

impl Element for Half {
    fn kind(&self) -> &'static ElementKind {
        &HALF
    }

    fn base(&self) -> &ElementBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ElementBase {
        &mut self.base
    }

    fn capabilities(&self) -> &[&'static str] {
        HALF_OPERATIONS
    }
}

#[test]
fn test_contract_violation_names_operation() {
    assert_eq!(HALF_OPERATIONS.len() + 1, ELEMENT_OPERATIONS.len());

    let mut tree = ElementTree::headless();
    let err = tree.create(Half::default()).unwrap_err();
    assert_eq!(
        err,
        ElementError::ContractViolation {
            contract: ELEMENT_CONTRACT.to_string(),
            operation: "serialize".to_string(),
        }
    );
    assert!(tree.is_empty());
}

#[test]
fn test_escaping_can_be_disabled() {
    let mut tree = ElementTree::headless().with_config(TreeConfig::default().with_escape_attributes(false));
    let link = tree
        .create(Anchor::new().with_id("a").href("/search?q=a&b=c"))
        .unwrap();
    assert_eq!(
        tree.serialize(link).unwrap(),
        "<a id='a' href='/search?q=a&b=c'></a>"
    );
}

#[test]
fn test_native_inputs_plugin_registers_types() {
    let mut registry = AdapterRegistry::new();
    registry.add_plugin(&NativeInputs);
    assert!(registry.contains("checkbox"));
    assert!(!registry.contains("numberspinner"));
}

#[test]
fn test_adding_live_root_to_live_parent_moves_it() {
    let attached = Rc::new(Cell::new(0));
    let seen = attached.clone();

    let mut tree = ElementTree::headless();
    let a = tree.create(Div::new().with_id("a")).unwrap();
    let b = tree
        .create(Div::new().with_id("b").on_attach(move |_| seen.set(seen.get() + 1)))
        .unwrap();
    tree.append_to(a, "body").unwrap();
    tree.append_to(b, "body").unwrap();
    assert_eq!(attached.get(), 1);

    tree.add(a, [b]).unwrap();
    assert_eq!(tree.backend().to_markup(), "<div id='a'><div id='b'></div></div>");
    assert_eq!(tree.backend().child_ids("body"), vec!["a"]);
    assert_eq!(attached.get(), 2);

    tree.destroy(a);
    assert!(tree.is_empty());
    assert!(tree.backend().is_empty());
}

#[test]
fn test_adding_live_root_to_detached_parent_detaches_it() {
    let mut tree = ElementTree::headless();
    let p = tree.create(Div::new().with_id("p")).unwrap();
    let b = tree.create(Div::new().with_id("b")).unwrap();
    tree.append_to(b, "body").unwrap();

    tree.add(p, [b]).unwrap();
    assert!(!tree.is_attached(b));
    assert!(tree.backend().is_empty());

    tree.append_to(p, "body").unwrap();
    assert_eq!(tree.backend().to_markup(), "<div id='p'><div id='b'></div></div>");
}

#[test]
fn test_backend_failure_mid_batch_keeps_earlier_children() {
    let mut tree = ElementTree::new(RecordingBackend::new());
    let parent = tree.create(Div::new().with_id("p")).unwrap();
    tree.append_to(parent, "body").unwrap();

    let ok = tree.create(Label::new().with_id("ok")).unwrap();
    let failing = tree.create(Label::new().with_id("failing")).unwrap();
    tree.backend().fail_inserts_after(1);

    assert!(matches!(
        tree.add(parent, [ok, failing]),
        Err(ElementError::Backend(BackendError::Malformed(_)))
    ));
    assert_eq!(tree.node(parent).unwrap().children(), &[Child::Node(ok)]);
    assert_eq!(tree.node(ok).unwrap().parent(), Some(parent));
    assert!(tree.is_attached(ok));
    assert_eq!(tree.node(failing).unwrap().parent(), None);
    assert!(!tree.is_attached(failing));
    assert_eq!(tree.backend().document().child_ids("p"), vec!["ok"]);
}
