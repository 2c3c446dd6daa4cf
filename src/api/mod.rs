mod handlers;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::history::{Clock, SystemClock, DEFAULT_PUSH_WINDOW};
use crate::session::EditorSession;
use crate::store::{DocumentStore, MapCatalog};

/// Shared server state: the catalog plus one editor session per open document.
#[derive(Clone)]
pub struct AppState {
    catalog: MapCatalog,
    documents: DocumentStore,
    sessions: Arc<Mutex<HashMap<String, EditorSession>>>,
    clock: Arc<dyn Clock>,
    history_window: Duration,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_clock(db, Arc::new(SystemClock), DEFAULT_PUSH_WINDOW)
    }

    pub fn with_clock(db: Database, clock: Arc<dyn Clock>, history_window: Duration) -> Self {
        Self {
            catalog: MapCatalog::new(db.clone()),
            documents: DocumentStore::new(db),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
            history_window,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Catalog
        .route("/maps", get(handlers::list_maps).post(handlers::create_map))
        .route(
            "/maps/{id}",
            get(handlers::get_map)
                .put(handlers::rename_map)
                .delete(handlers::delete_map),
        )
        .route("/export", get(handlers::export_maps))
        // Editing
        .route("/maps/{id}/view", get(handlers::get_view))
        .route("/maps/{id}/select", post(handlers::select_node))
        .route("/maps/{id}/children", post(handlers::add_child))
        .route("/maps/{id}/delete-subtree", post(handlers::delete_subtree))
        .route("/maps/{id}/undo", post(handlers::undo))
        .route("/maps/{id}/nodes/{node_id}/label", put(handlers::rename_node))
        .route("/maps/{id}/nodes/{node_id}/color", put(handlers::recolor_node))
        .route(
            "/maps/{id}/nodes/{node_id}/toggle-collapse",
            post(handlers::toggle_collapse),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
