use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::EditorError;
use crate::models::*;
use crate::session::{EditorSession, EditorView};

use super::AppState;

type ApiError = (StatusCode, String);

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn editor_error(e: EditorError) -> ApiError {
    match &e {
        EditorError::NoSelection => {
            tracing::warn!("Rejected command: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        EditorError::NodeNotFound(_) | EditorError::DocumentNotFound(_) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
        EditorError::Storage(inner) => internal_error(format!("{:#}", inner)),
    }
}

/// Run `f` against the session for `id`, opening it on first use.
fn with_session<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut EditorSession) -> Result<T, EditorError>,
) -> Result<T, ApiError> {
    let mut sessions = state.sessions.lock().expect("session lock poisoned");
    if !sessions.contains_key(id) {
        if !state.catalog.contains(id).map_err(internal_error)? {
            return Err(editor_error(EditorError::DocumentNotFound(id.to_string())));
        }
        let session = EditorSession::open_with_window(
            state.documents.clone(),
            id,
            state.clock.clone(),
            state.history_window,
        )
        .map_err(editor_error)?;
        sessions.insert(id.to_string(), session);
    }
    let session = sessions
        .get_mut(id)
        .ok_or_else(|| internal_error("session vanished"))?;
    f(session).map_err(editor_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Catalog
// ============================================================

pub async fn list_maps(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, DocumentSummary>>, ApiError> {
    state.catalog.list().map(Json).map_err(internal_error)
}

pub async fn create_map(
    State(state): State<AppState>,
    input: Option<Json<CreateDocumentInput>>,
) -> Result<(StatusCode, Json<DocumentListing>), ApiError> {
    let name = input
        .and_then(|Json(input)| input.name)
        .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.to_string());
    let document = Document::fresh(name);
    let summary = document.summary();
    let id = state.catalog.create(document).map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(DocumentListing { id, summary })))
}

pub async fn get_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    state
        .catalog
        .get(&id)
        .map_err(internal_error)?
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Document not found".to_string()))
}

pub async fn rename_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RenameDocumentInput>,
) -> Result<Json<DocumentListing>, ApiError> {
    if !state
        .catalog
        .rename(&id, &input.name)
        .map_err(internal_error)?
    {
        return Err((StatusCode::NOT_FOUND, "Document not found".to_string()));
    }

    let mut sessions = state.sessions.lock().expect("session lock poisoned");
    if let Some(session) = sessions.get_mut(&id) {
        session.set_name(input.name.clone());
    }
    drop(sessions);

    let summary = state
        .catalog
        .get(&id)
        .map_err(internal_error)?
        .map(|doc| doc.summary())
        .ok_or((StatusCode::NOT_FOUND, "Document not found".to_string()))?;
    Ok(Json(DocumentListing { id, summary }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub async fn delete_map(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    if !query.confirm {
        return Err((
            StatusCode::BAD_REQUEST,
            "Deleting a map requires confirm=true".to_string(),
        ));
    }

    let mut sessions = state.sessions.lock().expect("session lock poisoned");
    sessions.remove(&id);
    if state.catalog.delete(&id).map_err(internal_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Document not found".to_string()))
    }
}

pub async fn export_maps(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state.catalog.export().map_err(internal_error)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

// ============================================================
// Editing
// ============================================================

#[derive(Debug, Deserialize)]
pub struct SelectInput {
    pub node_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LabelInput {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct ColorInput {
    pub color: String,
}

pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| Ok(session.view())).map(Json)
}

pub async fn select_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SelectInput>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.select_node(input.node_id.as_deref())?;
        Ok(session.view())
    })
    .map(Json)
}

pub async fn add_child(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<EditorView>), ApiError> {
    with_session(&state, &id, |session| {
        session.add_child()?;
        Ok(session.view())
    })
    .map(|view| (StatusCode::CREATED, Json(view)))
}

pub async fn delete_subtree(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.delete_subtree()?;
        Ok(session.view())
    })
    .map(Json)
}

pub async fn rename_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    Json(input): Json<LabelInput>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.rename_node(&node_id, &input.label)?;
        Ok(session.view())
    })
    .map(Json)
}

pub async fn recolor_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
    Json(input): Json<ColorInput>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.recolor(&node_id, &input.color)?;
        Ok(session.view())
    })
    .map(Json)
}

pub async fn toggle_collapse(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, String)>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.toggle_collapse(&node_id)?;
        Ok(session.view())
    })
    .map(Json)
}

pub async fn undo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EditorView>, ApiError> {
    with_session(&state, &id, |session| {
        session.undo();
        Ok(session.view())
    })
    .map(Json)
}
