#[cfg(test)]
mod tests {
    use crate::*;
    use serde_json::json;

    #[derive(Default)]
    struct Title;

    impl Component for Title {
        fn render(&self, this: &Instance) -> anyhow::Result<Node> {
            let text = this.prop_text("text").unwrap_or_default();
            Ok(create_element("h1", None, children![text]))
        }
    }

    #[derive(Default)]
    struct Page;

    impl Component for Page {
        fn render(&self, this: &Instance) -> anyhow::Result<Node> {
            Ok(create_element(
                "div",
                Some(Attributes::new().with("className", "page")),
                children![
                    create_element(
                        NodeType::component::<Title>(),
                        Some(Attributes::new().with("text", "Hello")),
                        children![],
                    ),
                    this.children(),
                ],
            ))
        }
    }

    #[derive(Default)]
    struct Broken;

    impl Component for Broken {
        fn render(&self, _this: &Instance) -> anyhow::Result<Node> {
            anyhow::bail!("no data")
        }
    }

    #[test]
    fn test_build_resolves_nested_components() {
        let page = create_element(
            NodeType::component::<Page>(),
            None,
            children![create_element("p", None, children!["body"])],
        );
        let tree = build(&page).unwrap();

        assert_eq!(tree.tag(), Some("div"));
        let kids = tree.children();
        assert_eq!(kids.len(), 2);
        assert_eq!(kids[0].tag(), Some("h1"));
        assert_eq!(kids[0].children()[0].content(), Some("Hello"));
        assert_eq!(kids[1].tag(), Some("p"));
        assert_eq!(tree.node_count(), 5);
        assert!(tree.placement().is_none());
    }

    #[test]
    fn test_build_is_repeatable() {
        let page = create_element(NodeType::component::<Page>(), None, children![]);
        let a = build(&page).unwrap();
        let b = build(&page).unwrap();
        assert!(is_same_node(&a, &b));
        assert_eq!(a.node_count(), b.node_count());
    }

    #[test]
    fn test_render_failure_names_component() {
        let node = create_element(
            "div",
            None,
            children![create_element(NodeType::component::<Broken>(), None, children![])],
        );
        let err = build(&node).unwrap_err();
        match &err {
            Error::Render { component, source } => {
                assert!(component.ends_with("Broken"));
                assert_eq!(source.to_string(), "no data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_set_state_requires_mount_and_restores_state() {
        let page = Instance::new(Page);
        let err = page.set_state(json!({"open": true})).unwrap_err();
        assert!(matches!(err, Error::NotMounted { .. }));
        assert!(page.state().is_empty());
        assert!(!page.is_mounted());
    }

    #[test]
    fn test_set_state_rejects_non_objects() {
        let page = Instance::new(Page);
        let err = page.set_state(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidState("an array")));
    }

    #[test]
    fn test_weak_instance_does_not_keep_alive() {
        let page = Instance::new(Page);
        let weak = page.downgrade();
        assert!(weak.upgrade().unwrap().ptr_eq(&page));
        drop(page);
        assert!(weak.upgrade().is_none());
    }
}
