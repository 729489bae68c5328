//! Example components and the suite the `rfsnap` binary runs
//!
//! `Foo` renders a title between a label and a button; `SimpleComponent`
//! reads its name from a context slot.

use serde_json::json;

use crate::harness::{expect, Suite};
use crate::{
    component, create_element, render, render_with, text, ComponentRef, Context, Element, Props,
    RenderOptions,
};

/// Value carried by the demo context slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simple {
    pub name: String,
}

/// `div > [div("foo"), h1(title), button("button")]`
///
/// `title` is optional; without it the `h1` renders empty. `onButtonClick`
/// is attached to the button but never emitted.
pub fn foo() -> ComponentRef {
    component("Foo", |props, _scope| {
        let button_props = match props.handler("onButtonClick") {
            Some(handler) => {
                let handler = handler.clone();
                Props::new().on("onClick", move || handler())
            }
            None => Props::new(),
        };
        create_element(
            "div",
            (),
            vec![
                create_element("div", (), vec![text("foo")]),
                create_element("h1", (), vec![Element::from(props.get_str("title"))]),
                create_element("button", button_props, vec![text("button")]),
            ],
        )
    })
}

/// The slot `SimpleComponent` reads, defaulting to `{ name: "foo" }`
pub fn simple_context() -> Context<Simple> {
    Context::new(Simple {
        name: "foo".to_string(),
    })
}

/// `div > div(name)` where `name` comes from `ctx`
pub fn simple_component(ctx: &Context<Simple>) -> ComponentRef {
    let ctx = ctx.clone();
    component("SimpleComponent", move |_props, scope| {
        let Simple { name } = scope.use_context(&ctx);
        create_element(
            "div",
            (),
            vec![create_element("div", (), vec![text(name)])],
        )
    })
}

/// The suite for the demo components
pub fn example_suite() -> Suite {
    let mut suite = Suite::new();
    suite.describe("MyComponent", |g| {
        g.it("rendered the title", || {
            let wrapper = render(&create_element(&foo(), json!({ "title": "test" }), vec![]))?;
            expect(wrapper.text()).to_contain("test")?;
            Ok(())
        });

        g.it("renders a div", || {
            let wrapper = render(&create_element(&foo(), (), vec![]))?;
            expect(wrapper.html()).to_contain("div")?;
            Ok(())
        });

        g.it("can pass in context", || {
            let ctx = simple_context();
            let wrapper = render(&create_element(&simple_component(&ctx), (), vec![]))?;
            expect(wrapper.html()).to_contain("foo")?;
            Ok(())
        });

        g.it("context override wins over the default", || {
            let ctx = simple_context();
            let options = RenderOptions::new().with_context(
                &ctx,
                Simple {
                    name: "bar".to_string(),
                },
            );
            let wrapper = render_with(&create_element(&simple_component(&ctx), (), vec![]), &options)?;
            expect(wrapper.html()).to_contain("bar")?;
            expect(wrapper.html()).not().to_contain("foo")?;
            Ok(())
        });
    });
    suite
}

/// Every suite known to the binary
pub fn suites() -> Suite {
    let mut all = Suite::new();
    all.merge(example_suite());
    all
}
