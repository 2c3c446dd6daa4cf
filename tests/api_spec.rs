use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use mindmap::api::{create_router, AppState};
use mindmap::db::Database;
use mindmap::models::*;
use mindmap::session::EditorView;
use serde_json::json;

fn setup() -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(AppState::new(db));
    TestServer::new(app).expect("Failed to create test server")
}

async fn create_test_map(server: &TestServer) -> DocumentListing {
    server
        .post("/api/v1/maps")
        .json(&CreateDocumentInput {
            name: Some("Test Map".to_string()),
        })
        .await
        .json::<DocumentListing>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn lists_nothing_on_a_new_store() {
        let server = setup();
        let maps: BTreeMap<String, DocumentSummary> = server.get("/api/v1/maps").await.json();
        assert!(maps.is_empty());
    }

    #[tokio::test]
    async fn creates_a_single_node_map() {
        let server = setup();
        let response = server.post("/api/v1/maps").json(&json!({})).await;

        response.assert_status(StatusCode::CREATED);
        let listing: DocumentListing = response.json();
        assert_eq!(listing.summary.name, DEFAULT_DOCUMENT_NAME);
        assert_eq!(listing.summary.node_count, 1);

        let maps: BTreeMap<String, DocumentSummary> = server.get("/api/v1/maps").await.json();
        assert!(maps.contains_key(&listing.id));
    }

    #[tokio::test]
    async fn creates_an_untitled_map_without_a_body() {
        let server = setup();
        let response = server.post("/api/v1/maps").await;

        response.assert_status(StatusCode::CREATED);
        let listing: DocumentListing = response.json();
        assert_eq!(listing.summary.name, DEFAULT_DOCUMENT_NAME);
    }

    #[tokio::test]
    async fn returns_404_for_unknown_map() {
        let server = setup();
        server
            .get("/api/v1/maps/missing")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn renames_a_map() {
        let server = setup();
        let map = create_test_map(&server).await;

        let response = server
            .put(&format!("/api/v1/maps/{}", map.id))
            .json(&RenameDocumentInput {
                name: "Renamed".to_string(),
            })
            .await;

        response.assert_status_ok();
        let doc: Document = server.get(&format!("/api/v1/maps/{}", map.id)).await.json();
        assert_eq!(doc.name, "Renamed");
    }

    #[tokio::test]
    async fn rename_refreshes_an_open_session() {
        let server = setup();
        let map = create_test_map(&server).await;
        server.get(&format!("/api/v1/maps/{}/view", map.id)).await;

        server
            .put(&format!("/api/v1/maps/{}", map.id))
            .json(&json!({ "name": "Renamed" }))
            .await
            .assert_status_ok();

        let view: EditorView = server
            .get(&format!("/api/v1/maps/{}/view", map.id))
            .await
            .json();
        assert_eq!(view.name, "Renamed");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let server = setup();
        let map = create_test_map(&server).await;

        server
            .delete(&format!("/api/v1/maps/{}", map.id))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(&format!("/api/v1/maps/{}", map.id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn deletes_a_confirmed_map() {
        let server = setup();
        let map = create_test_map(&server).await;

        server
            .delete(&format!("/api/v1/maps/{}?confirm=true", map.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/maps/{}", map.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exports_the_full_record() {
        let server = setup();
        let map = create_test_map(&server).await;

        let response = server.get("/api/v1/export").await;
        response.assert_status_ok();
        let record: StoreRecord = serde_json::from_str(&response.text()).expect("Invalid export");
        assert_eq!(record[&map.id].name, "Test Map");
    }
}

mod editing {
    use super::*;

    async fn select(server: &TestServer, map_id: &str, node_id: Option<&str>) -> EditorView {
        server
            .post(&format!("/api/v1/maps/{}/select", map_id))
            .json(&json!({ "node_id": node_id }))
            .await
            .json()
    }

    #[tokio::test]
    async fn view_of_unknown_map_is_404() {
        let server = setup();
        server
            .get("/api/v1/maps/missing/view")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn add_child_without_selection_is_rejected() {
        let server = setup();
        let map = create_test_map(&server).await;

        let response = server
            .post(&format!("/api/v1/maps/{}/children", map.id))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "Select a node first");
    }

    #[tokio::test]
    async fn add_child_then_undo() {
        let server = setup();
        let map = create_test_map(&server).await;
        select(&server, &map.id, Some("1")).await;

        let response = server
            .post(&format!("/api/v1/maps/{}/children", map.id))
            .await;
        response.assert_status(StatusCode::CREATED);
        let view: EditorView = response.json();
        assert_eq!(view.nodes.len(), 2);
        assert_eq!(view.edges.len(), 1);
        assert!(view.nodes[0].connectivity.has_outgoing);
        assert!(view.nodes[1].connectivity.has_incoming);

        let view: EditorView = server
            .post(&format!("/api/v1/maps/{}/undo", map.id))
            .await
            .json();
        assert_eq!(view.nodes.len(), 1);
        assert!(view.edges.is_empty());
    }

    #[tokio::test]
    async fn edits_are_persisted() {
        let server = setup();
        let map = create_test_map(&server).await;
        select(&server, &map.id, Some("1")).await;
        server
            .post(&format!("/api/v1/maps/{}/children", map.id))
            .await;

        let doc: Document = server.get(&format!("/api/v1/maps/{}", map.id)).await.json();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges[0].source, "1");
    }

    #[tokio::test]
    async fn delete_subtree_empties_the_map() {
        let server = setup();
        let map = create_test_map(&server).await;
        select(&server, &map.id, Some("1")).await;
        server
            .post(&format!("/api/v1/maps/{}/children", map.id))
            .await;

        let view: EditorView = server
            .post(&format!("/api/v1/maps/{}/delete-subtree", map.id))
            .await
            .json();
        assert!(view.nodes.is_empty());
        assert!(view.edges.is_empty());
        assert!(view.selection.is_none());
    }

    #[tokio::test]
    async fn selecting_unknown_node_is_404() {
        let server = setup();
        let map = create_test_map(&server).await;

        server
            .post(&format!("/api/v1/maps/{}/select", map.id))
            .json(&json!({ "node_id": "ghost" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn renames_and_recolors_nodes() {
        let server = setup();
        let map = create_test_map(&server).await;

        server
            .put(&format!("/api/v1/maps/{}/nodes/1/label", map.id))
            .json(&json!({ "label": "Ideas" }))
            .await
            .assert_status_ok();
        let view: EditorView = server
            .put(&format!("/api/v1/maps/{}/nodes/1/color", map.id))
            .json(&json!({ "color": "#00ff00" }))
            .await
            .json();

        assert_eq!(view.nodes[0].node.label, "Ideas");
        assert_eq!(view.nodes[0].node.color, "#00ff00");
    }

    #[tokio::test]
    async fn toggle_collapse_hides_children_from_view() {
        let server = setup();
        let map = create_test_map(&server).await;
        select(&server, &map.id, Some("1")).await;
        server
            .post(&format!("/api/v1/maps/{}/children", map.id))
            .await;

        let view: EditorView = server
            .post(&format!("/api/v1/maps/{}/nodes/1/toggle-collapse", map.id))
            .await
            .json();
        assert_eq!(view.nodes.len(), 1);
        assert!(view.edges.is_empty());

        let view: EditorView = server
            .post(&format!("/api/v1/maps/{}/nodes/1/toggle-collapse", map.id))
            .await
            .json();
        assert_eq!(view.nodes.len(), 2);
    }

    #[tokio::test]
    async fn recolor_unknown_node_is_404() {
        let server = setup();
        let map = create_test_map(&server).await;

        server
            .put(&format!("/api/v1/maps/{}/nodes/ghost/color", map.id))
            .json(&json!({ "color": "#fff" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
