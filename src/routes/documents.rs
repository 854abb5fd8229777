use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    documents,
    error::{validation::require_field, AppResult},
    routes::{library_param, AppJson},
    state::AppState,
    types::{
        CreateDocumentRequest, CreateDocumentResponse, Document, DocumentQuery, LibraryQuery, MessageResponse,
        UpdateDocumentRequest, UpdateParentRequest, UpdatedResponse,
    },
};

pub async fn create_document(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
    AppJson(req): AppJson<CreateDocumentRequest>,
) -> AppResult<Json<CreateDocumentResponse>> {
    let library = library_param(query.library.as_deref())?;
    let id = documents::create_document(&state.libraries, library, &req.title, &req.content, req.parent_id).await?;
    state.metrics.inc_documents_created();
    tracing::debug!("Created document {} (parent {})", id, req.parent_id);
    Ok(Json(CreateDocumentResponse { id }))
}

// Flat list; the client builds the tree from parent_id
pub async fn get_document_tree(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> AppResult<Json<Vec<Document>>> {
    let library = library_param(query.library.as_deref())?;
    let docs = documents::list_document_tree(&state.libraries, library).await?;
    Ok(Json(docs))
}

pub async fn get_document(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> AppResult<Json<Document>> {
    let library = library_param(query.library.as_deref())?;
    let id = require_field(query.id.as_deref(), "id")?;
    let doc = documents::get_document(&state.libraries, library, id).await?;
    Ok(Json(doc))
}

pub async fn update_document_parent(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
    AppJson(req): AppJson<UpdateParentRequest>,
) -> AppResult<Json<MessageResponse>> {
    let library = library_param(query.library.as_deref())?;
    documents::update_document_parent(&state.libraries, library, req.id, req.parent_id).await?;
    Ok(Json(MessageResponse { message: "Parent updated successfully".to_string() }))
}

pub async fn update_document(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
    AppJson(req): AppJson<UpdateDocumentRequest>,
) -> AppResult<Json<UpdatedResponse>> {
    let library = library_param(query.library.as_deref())?;
    let updated = documents::update_document(
        &state.libraries,
        library,
        req.id,
        req.title.as_deref(),
        req.content.as_deref(),
    )
    .await?;
    if updated {
        state.metrics.inc_documents_updated();
    }
    Ok(Json(UpdatedResponse { message: "Document updated successfully".to_string(), updated }))
}
