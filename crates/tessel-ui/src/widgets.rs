//! Concrete element types.
//!
//! Every type here is the shared element protocol plus a tag and the typed
//! attributes it exposes. Typed setters write into the node's attribute
//! store; the kind decides which stored keys reach the markup, in which order.
//!
//! ```
//! use tessel_ui::prelude::*;
//!
//! let cell = Td::new().with_id("c1").colspan(2);
//! let cx = SerializeContext { children: "42", escape: true };
//! assert_eq!(cell.serialize(&cx), "<td id='c1' colspan='2'>42</td>");
//! ```

use crate::element::{Element, ElementBase};
use crate::kind::ElementKind;

macro_rules! element_types {
    ($(
        $(#[$meta:meta])*
        $ty:ident => $kind:ident = $kind_init:expr, [$($setter:ident => $attr:literal),* $(,)?];
    )*) => {
        $(
            #[doc = concat!("Kind descriptor for [`", stringify!($ty), "`].")]
            pub static $kind: ElementKind = $kind_init;

            $(#[$meta])*
            #[derive(Debug, Default)]
            pub struct $ty {
                base: ElementBase,
            }

            impl $ty {
                pub fn new() -> Self {
                    Self::default()
                }

                $(
                    #[doc = concat!("Set the `", $attr, "` attribute.")]
                    pub fn $setter(mut self, value: impl std::fmt::Display) -> Self {
                        self.base.set_attribute($attr, value.to_string());
                        self
                    }
                )*
            }

            impl Element for $ty {
                fn kind(&self) -> &'static ElementKind {
                    &$kind
                }

                fn base(&self) -> &ElementBase {
                    &self.base
                }

                fn base_mut(&mut self) -> &mut ElementBase {
                    &mut self.base
                }
            }
        )*
    };
}

element_types! {
    /// Hyperlink (`<a>`).
    Anchor => ANCHOR = ElementKind::new("Anchor", "a").with_attributes(&["href", "target"]),
        [href => "href", target => "target"];

    Button => BUTTON = ElementKind::new("Button", "button").with_attributes(&["type"]),
        [button_type => "type"];

    /// Generic block container.
    Div => DIV = ElementKind::new("Div", "div"), [];

    Fieldset => FIELDSET = ElementKind::new("Fieldset", "fieldset"), [];

    /// Form container. `method` and `enctype` mirror the HTML attributes.
    Form => FORM = ElementKind::new("Form", "form").with_attributes(&["action", "method", "enctype"]),
        [action => "action", method => "method", enctype => "enctype"];

    Frameset => FRAMESET = ElementKind::new("Frameset", "frameset").with_attributes(&["cols", "rows"]),
        [cols => "cols", rows => "rows"];

    /// Plain input control. Void: it never holds children.
    Input => INPUT = ElementKind::new("Input", "input")
        .void()
        .with_attributes(&["type", "name", "value"]),
        [input_type => "type", name => "name", value => "value"];

    /// Caption for a form control.
    Label => LABEL = ElementKind::new("Label", "label").with_attributes(&["for"]),
        [for_id => "for"];

    Legend => LEGEND = ElementKind::new("Legend", "legend"), [];

    Table => TABLE = ElementKind::new("Table", "table").with_attributes(&["align"]),
        [align => "align"];

    /// Table cell.
    Td => TD = ElementKind::new("Td", "td").with_attributes(&["colspan", "rowspan"]),
        [colspan => "colspan", rowspan => "rowspan"];

    Textarea => TEXTAREA = ElementKind::new("Textarea", "textarea").with_attributes(&["name"]),
        [name => "name"];

    Tr => TR = ElementKind::new("Tr", "tr"), [];
}
