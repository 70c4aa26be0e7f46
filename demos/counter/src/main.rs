use serde_json::json;
use sprig_core::prelude::*;
use sprig_devtools::{Inspector, outline};
use sprig_dom::Document;

#[derive(Default)]
struct Counter;

impl Counter {
    fn step(this: &Instance, by: i64) -> Handler {
        let me = this.downgrade();
        Handler::new(move |_| {
            let Some(me) = me.upgrade() else { return };
            let count = me.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
            if let Err(e) = me.set_state(json!({ "count": count + by })) {
                log::error!("counter update failed: {e}");
            }
        })
    }
}

impl Component for Counter {
    fn render(&self, this: &Instance) -> anyhow::Result<Node> {
        let count = this.state_value("count").and_then(|v| v.as_i64()).unwrap_or(0);
        let title = this.prop_text("title").unwrap_or_else(|| "Count".into());

        Ok(create_element(
            "div",
            Some(Attributes::new().with("className", "counter")),
            children![
                create_element("h1", None, children![format!("{title}: {count}")]),
                create_element(
                    "button",
                    Some(Attributes::new().with("onClick", Counter::step(this, 1))),
                    children!["Increment"],
                ),
                create_element(
                    "button",
                    Some(Attributes::new().with("onClick", Counter::step(this, -1))),
                    children!["Decrement"],
                ),
                this.children(),
            ],
        ))
    }

    fn name(&self) -> &'static str {
        "Counter"
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let doc = Document::shared();
    let root = doc.borrow().root();
    let app = create_element(
        NodeType::component::<Counter>(),
        Some(Attributes::new().with("title", "Clicks")),
        children![create_element("p", None, children!["Try the buttons."])],
    );
    render(&app, &doc, root)?;
    println!("{}", doc.borrow().inner_markup(root));

    let mut inspector = Inspector::new();
    let clicks = [0, 0, 0, 1];
    for which in clicks {
        let button = doc
            .borrow()
            .find_by_tag(root, "button")
            .get(which)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("no button #{which}"))?;
        inspector.measure(&doc, || Document::dispatch(&doc, button, "click"));
        println!("{}", doc.borrow().inner_markup(root));
        println!("  {}", inspector.report());
    }

    println!("{}", outline(&doc.borrow(), root));
    println!("{}", inspector.report_json()?);
    Ok(())
}
