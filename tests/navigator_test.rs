//! End-to-end navigator tests
//!
//! Drives a navigator against a wiremock backend, including interleaved
//! requests on a single thread to check last-issued-wins ordering.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use ontology_navigator::backend::HttpBackend;
use ontology_navigator::config::{BackendConfig, RequestConfig};
use ontology_navigator::view::{
    DetailsPanel, LoadOutcome, ReloadOutcome, RowValue, EMPTY_DETAILS_TEXT, FAILED_DETAILS_TEXT,
    TREE_FAILED_TEXT,
};
use ontology_navigator::{Mode, Navigator, NodeRef};

const ASSERTED_TREE: &str = r#"<ul class="tree-root"><li class="tree-node"><div class="node-content" data-id="ex:Animal"><span class="expander"></span>Animal</div><ul class="children-container"><li class="tree-node"><div class="node-content" data-id="ex:Dog">Dog</div></li></ul></li></ul>"#;

const INFERRED_TREE: &str = r#"<ul class="tree-root"><li class="tree-node"><div class="node-content" data-id="ex:Mammal">Mammal</div></li></ul>"#;

fn page(tree: &str) -> String {
    format!(
        r#"<html><body><div id="sidebar">{}</div><div id="details-area"></div></body></html>"#,
        tree
    )
}

fn create_navigator(base_url: &str, mode: Mode) -> Navigator<HttpBackend> {
    let config = BackendConfig {
        base_url: base_url.to_string(),
    };
    let backend =
        HttpBackend::new(&config, RequestConfig { timeout_ms: 5000 }).expect("Failed to create client");
    Navigator::new(backend, mode)
}

async fn mount_tree(server: &MockServer, inferred: &str, tree: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path("/navigation/"))
        .and(query_param("inferred", inferred))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(tree))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

async fn mount_details(server: &MockServer, id: &str, delay_ms: u64) {
    Mock::given(method("GET"))
        .and(path("/details/"))
        .and(query_param("id", id))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "id": id,
                    "properties": [
                        {"predicate": "ex:hasParent", "object": "ex:Animal", "is_uri": true}
                    ]
                }))
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(server)
        .await;
}

fn loaded_title(navigator: &Navigator<HttpBackend>) -> String {
    match navigator.details_panel() {
        DetailsPanel::Loaded(card) => card.title,
        other => panic!("expected loaded details, got {:?}", other),
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_reload_shows_fragment_with_empty_state() {
        let server = MockServer::start().await;
        mount_tree(&server, "false", ASSERTED_TREE, 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        assert_eq!(navigator.reload(Mode::Asserted).await, ReloadOutcome::Applied);

        assert_eq!(navigator.tree_fragment().unwrap().markup(), ASSERTED_TREE);
        assert!(navigator.expanded_nodes().is_empty());
        assert!(navigator.selected().is_none());
        assert_eq!(navigator.render_tree().as_deref(), Some(ASSERTED_TREE));
    }

    #[tokio::test]
    async fn test_reload_resets_expansion_and_selection() {
        let server = MockServer::start().await;
        mount_tree(&server, "false", ASSERTED_TREE, 0).await;
        mount_details(&server, "ex:Animal", 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        navigator.reload(Mode::Asserted).await;
        navigator.click_node(NodeRef::new("ex:Animal")).await;
        assert_eq!(navigator.expanded_nodes(), vec![NodeRef::new("ex:Animal")]);

        assert_eq!(navigator.reload(Mode::Asserted).await, ReloadOutcome::Applied);
        assert!(navigator.expanded_nodes().is_empty());
        assert!(navigator.selected().is_none());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_tree() {
        let server = MockServer::start().await;
        mount_tree(&server, "false", ASSERTED_TREE, 0).await;
        Mock::given(method("GET"))
            .and(path("/navigation/"))
            .and(query_param("inferred", "true"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        navigator.reload(Mode::Asserted).await;

        assert_eq!(navigator.reload(Mode::Inferred).await, ReloadOutcome::Failed);
        assert_eq!(navigator.tree_fragment().unwrap().markup(), ASSERTED_TREE);
        assert_eq!(navigator.tree_notice().as_deref(), Some(TREE_FAILED_TEXT));

        assert_eq!(navigator.reload(Mode::Asserted).await, ReloadOutcome::Applied);
        assert!(navigator.tree_notice().is_none());
    }

    #[tokio::test]
    async fn test_toggle_race_keeps_latest_mode_tree() {
        let server = MockServer::start().await;
        mount_tree(&server, "true", INFERRED_TREE, 300).await;
        mount_tree(&server, "false", ASSERTED_TREE, 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        tokio::join!(
            navigator.set_mode(Mode::Inferred),
            navigator.set_mode(Mode::Asserted)
        );

        assert_eq!(navigator.mode(), Mode::Asserted);
        assert_eq!(navigator.tree_fragment().unwrap().markup(), ASSERTED_TREE);
    }

    #[tokio::test]
    async fn test_superseded_toggle_does_not_clear_newer_details() {
        let server = MockServer::start().await;
        mount_tree(&server, "true", INFERRED_TREE, 400).await;
        mount_tree(&server, "false", ASSERTED_TREE, 0).await;
        mount_details(&server, "ex:Dog", 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let pick_after_toggle = async {
            navigator.set_mode(Mode::Asserted).await;
            navigator.select_node(NodeRef::new("ex:Dog")).await
        };
        let (_, outcome) = tokio::join!(navigator.set_mode(Mode::Inferred), pick_after_toggle);

        assert_eq!(outcome, LoadOutcome::Rendered);
        assert_eq!(navigator.mode(), Mode::Asserted);
        assert_eq!(loaded_title(&navigator), "Dog");
    }

    #[tokio::test]
    async fn test_mode_change_clears_details_when_plain_reload_overtakes_it() {
        let server = MockServer::start().await;
        mount_tree(&server, "true", INFERRED_TREE, 300).await;
        mount_details(&server, "ex:Dog", 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        navigator
            .load(NodeRef::new("ex:Dog"), Mode::Asserted)
            .await;
        assert_eq!(loaded_title(&navigator), "Dog");

        let (_, reloaded) = tokio::join!(
            navigator.set_mode(Mode::Inferred),
            navigator.reload(Mode::Inferred)
        );

        assert_eq!(reloaded, ReloadOutcome::Applied);
        assert_eq!(navigator.mode(), Mode::Inferred);
        assert_eq!(navigator.tree_fragment().unwrap().markup(), INFERRED_TREE);
        assert_eq!(navigator.details_panel(), DetailsPanel::Empty);
    }
}

#[cfg(test)]
mod details_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_load_renders_dog() {
        let server = MockServer::start().await;
        mount_details(&server, "ex:Dog", 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let outcome = navigator.load(NodeRef::new("ex:Dog"), Mode::Asserted).await;
        assert_eq!(outcome, LoadOutcome::Rendered);

        match navigator.details_panel() {
            DetailsPanel::Loaded(card) => {
                assert_eq!(card.title, "Dog");
                assert_eq!(card.rows.len(), 1);
                assert_eq!(card.rows[0].label, "hasParent");
                assert_eq!(
                    card.rows[0].value,
                    RowValue::Reference {
                        target: NodeRef::new("ex:Animal"),
                        text: "Animal".to_string(),
                    }
                );
            }
            other => panic!("unexpected panel: {:?}", other),
        }
        let html = navigator.render_details();
        assert!(html.contains(r##"<a href="#" class="uri-link" data-ref="ex:Animal">Animal</a>"##));
    }

    #[tokio::test]
    async fn test_load_application_error_rendered_inline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/details/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "ex:Dog", "error": "not found"})),
            )
            .mount(&server)
            .await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let outcome = navigator.load(NodeRef::new("ex:Dog"), Mode::Asserted).await;

        assert_eq!(outcome, LoadOutcome::ApplicationError);
        let html = navigator.render_details();
        assert!(html.contains("Error: not found"));
        assert!(!html.contains(FAILED_DETAILS_TEXT));
    }

    #[tokio::test]
    async fn test_network_failure_shows_generic_text() {
        // Nothing listens on port 1
        let navigator = create_navigator("http://127.0.0.1:1", Mode::Asserted);

        let dog = NodeRef::new("ex:Dog");
        assert_eq!(navigator.select_node(dog.clone()).await, LoadOutcome::Failed);
        assert!(navigator.render_details().contains(FAILED_DETAILS_TEXT));
        assert_eq!(navigator.selected(), Some(dog));
    }

    #[tokio::test]
    async fn test_slow_earlier_load_never_overwrites_later() {
        let server = MockServer::start().await;
        mount_details(&server, "ex:A", 300).await;
        mount_details(&server, "ex:B", 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let (a, b) = tokio::join!(
            navigator.load(NodeRef::new("ex:A"), Mode::Asserted),
            navigator.load(NodeRef::new("ex:B"), Mode::Asserted)
        );

        assert_eq!(a, LoadOutcome::Superseded);
        assert_eq!(b, LoadOutcome::Rendered);
        assert_eq!(loaded_title(&navigator), "B");
    }

    #[tokio::test]
    async fn test_fast_earlier_load_is_still_discarded() {
        let server = MockServer::start().await;
        mount_details(&server, "ex:A", 0).await;
        mount_details(&server, "ex:B", 300).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let (a, b) = tokio::join!(
            navigator.load(NodeRef::new("ex:A"), Mode::Asserted),
            navigator.load(NodeRef::new("ex:B"), Mode::Asserted)
        );

        assert_eq!(a, LoadOutcome::Superseded);
        assert_eq!(b, LoadOutcome::Rendered);
        assert_eq!(loaded_title(&navigator), "B");
    }

    #[tokio::test]
    async fn test_cross_reference_uses_current_mode_and_keeps_tree_state() {
        let server = MockServer::start().await;
        mount_tree(&server, "true", ASSERTED_TREE, 0).await;
        Mock::given(method("GET"))
            .and(path("/details/"))
            .and(query_param("id", "ex:Animal"))
            .and(query_param("inferred", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "ex:Animal", "properties": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        navigator.set_mode(Mode::Inferred).await;
        navigator.toggle_expansion(&NodeRef::new("ex:Animal"));

        let outcome = navigator.follow_reference(NodeRef::new("ex:Animal")).await;
        assert_eq!(outcome, LoadOutcome::Rendered);
        assert!(navigator.selected().is_none());
        assert!(navigator.is_expanded(&NodeRef::new("ex:Animal")));
        match navigator.details_panel() {
            DetailsPanel::Loaded(card) => {
                assert!(card.describe_url.ends_with("&inferred=true"));
            }
            other => panic!("unexpected panel: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mode_switch_discards_in_flight_details() {
        let server = MockServer::start().await;
        mount_details(&server, "ex:Dog", 300).await;
        mount_tree(&server, "true", INFERRED_TREE, 0).await;

        let navigator = create_navigator(&server.uri(), Mode::Asserted);
        let (outcome, _) = tokio::join!(
            navigator.load(NodeRef::new("ex:Dog"), Mode::Asserted),
            navigator.set_mode(Mode::Inferred)
        );

        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(navigator.details_panel(), DetailsPanel::Empty);
        assert!(navigator.render_details().contains(EMPTY_DETAILS_TEXT));
    }
}
