use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::{validation::require_field, AppResult},
    library, library_config,
    routes::{library_param, AppJson},
    state::AppState,
    types::{
        ConfigResponse, CreateLibraryRequest, CreateLibraryResponse, LibraryListResponse, LibraryQuery,
        SetConfigRequest, UpdatedResponse,
    },
};

/// Provisions a library. Body: `{"name": "mybook1", "base_path": "./storage/mybook1"}`.
pub async fn create_library(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateLibraryRequest>,
) -> AppResult<Json<CreateLibraryResponse>> {
    let name = require_field(Some(&req.name), "name")?;
    let base_path = library::provisioning_path(&state.libraries, name, &req.base_path)?;
    let info = library::create_library(&state.libraries, name, &base_path).await?;
    state.metrics.inc_libraries_created();
    Ok(Json(CreateLibraryResponse {
        message: "Library created successfully".to_string(),
        name: info.name,
        path: info.path,
    }))
}

pub async fn list_libraries(State(state): State<AppState>) -> AppResult<Json<LibraryListResponse>> {
    let libraries = library::list_libraries(&state.libraries).await?;
    Ok(Json(LibraryListResponse { libraries }))
}

pub async fn get_config(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
) -> AppResult<Json<ConfigResponse>> {
    let library = library_param(query.library.as_deref())?;
    let config = library_config::get_config(&state.libraries, library).await?;
    Ok(Json(ConfigResponse { config }))
}

pub async fn set_config(
    State(state): State<AppState>,
    Query(query): Query<LibraryQuery>,
    AppJson(req): AppJson<SetConfigRequest>,
) -> AppResult<Json<UpdatedResponse>> {
    let library = library_param(query.library.as_deref())?;
    let updated = library_config::set_config(&state.libraries, library, &req.name, &req.key, &req.value).await?;
    state.metrics.inc_config_writes();
    Ok(Json(UpdatedResponse { message: "Config updated successfully".to_string(), updated }))
}
