//! Build a small form, attach it to a headless document and print the result.
//!
//! Run with `TESSEL_LOG=trace` to watch the attach cycle.

use tessel::prelude::*;
use tessel::ui::NativeInputs;

fn main() -> Result<(), ElementError> {
    tessel::init(&Config::from_env());

    let mut registry = AdapterRegistry::new();
    registry.add_plugin(&NativeInputs);

    let mut tree = ElementTree::headless();
    let form = tree.create(Form::new().with_id("signup").method("post").action("/signup"))?;
    let fields = tree.create(Fieldset::new())?;
    let legend = tree.create(Legend::new())?;
    tree.add_markup(legend, "Create an account")?;

    let label = tree.create(Label::new().for_id("email"))?;
    tree.add_markup(label, "Email")?;
    let email = tree.create(WidgetInput::new(&registry, "text")?.with_id("email").configure("name", "email"))?;
    let password = tree.create(WidgetInput::new(&registry, "password")?.configure("name", "password"))?;
    let submit = tree.create(Button::new().button_type("submit"))?;
    tree.add_markup(submit, "Sign up")?;

    tree.add(fields, [legend, label, email, password])?;
    tree.add(form, [fields, submit])?;
    tree.append_to(form, "body")?;

    println!("{}", tree.backend().to_markup());

    tree.hide(fields)?;
    println!("fields visible: {:?}", tree.backend().is_visible("Fieldset1"));

    tree.destroy(form);
    println!("document empty after destroy: {}", tree.backend().is_empty());
    Ok(())
}
