use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;

use crate::error::{Body, Params, Problem};
use crate::model::{
    CommentBody, CreateArtifact, CreateArtifactQuery, CreateContent, CreateVersion, DryRunQuery, EditMetadata,
    RefTypeQuery, RuleBody, SearchQuery, StateBody,
};
use crate::store::{rules, Content};
use crate::AppState;

pub const ARTIFACT_TYPE_HEADER: &str = "X-Registry-ArtifactType";

type JsonResult = Result<Json<Value>, Problem>;
type EmptyResult = Result<StatusCode, Problem>;

pub fn api() -> Router<AppState> {
    Router::new()
        .route("/search/artifacts", get(search_artifacts).post(search_artifacts_by_content))
        .route("/search/versions", get(search_versions).post(search_versions_by_content))
        .route("/ids/contentIds/{content_id}", get(content_by_id))
        .route("/ids/contentIds/{content_id}/references", get(references_by_content_id))
        .route("/ids/globalIds/{global_id}", get(content_by_global_id))
        .route("/ids/globalIds/{global_id}/references", get(references_by_global_id))
        .route("/ids/contentHashes/{hash}", get(content_by_hash))
        .route("/ids/contentHashes/{hash}/references", get(references_by_hash))
        .route(
            "/groups/{group_id}/artifacts",
            get(list_group_artifacts).post(create_artifact).delete(delete_group_artifacts),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}",
            get(artifact_metadata).put(update_artifact_metadata).delete(delete_artifact),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/rules",
            get(list_artifact_rules).post(create_artifact_rule).delete(delete_artifact_rules),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/rules/{rule}",
            get(get_artifact_rule).put(update_artifact_rule).delete(delete_artifact_rule),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions",
            get(list_versions).post(create_version),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}",
            get(version_metadata).put(update_version_metadata).delete(delete_version),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}/content",
            get(version_content).put(update_version_content),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}/references",
            get(version_references),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}/comments",
            get(list_comments).post(add_comment),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}/comments/{comment_id}",
            put(update_comment).delete(delete_comment),
        )
        .route(
            "/groups/{group_id}/artifacts/{artifact_id}/versions/{version}/state",
            get(version_state).put(update_version_state),
        )
        .route(
            "/admin/rules",
            get(list_global_rules).post(create_global_rule).delete(delete_global_rules),
        )
        .route(
            "/admin/rules/{rule}",
            get(get_global_rule).put(update_global_rule).delete(delete_global_rule),
        )
        .method_not_allowed_fallback(method_not_allowed)
}

pub async fn not_found() -> Problem {
    Problem::not_found("NotFoundException", "No such endpoint.")
}

async fn method_not_allowed() -> Problem {
    Problem::method_not_allowed("Method not allowed for this endpoint.")
}

fn content_response(content: &Content) -> Response {
    let content_type = if content.content_type.is_empty() {
        "application/octet-stream".to_string()
    } else {
        content.content_type.clone()
    };
    (
        StatusCode::OK,
        [
            ("content-type", content_type),
            (ARTIFACT_TYPE_HEADER, content.artifact_type.clone()),
        ],
        content.content.clone(),
    )
        .into_response()
}

fn parse_id(raw: &str) -> Result<i64, Problem> {
    raw.parse()
        .map_err(|_| Problem::bad_request(format!("Invalid ID: '{raw}'")))
}

fn is_inbound(query: &RefTypeQuery) -> bool {
    query.ref_type.as_deref() == Some("INBOUND")
}

// --- search ---

async fn search_artifacts(State(state): State<AppState>, Params(query): Params<SearchQuery>) -> Json<Value> {
    Json(state.db.read().await.search_artifacts(&query, None))
}

async fn search_artifacts_by_content(
    State(state): State<AppState>,
    Params(query): Params<SearchQuery>,
    content: String,
) -> Json<Value> {
    Json(state.db.read().await.search_artifacts(&query, Some(&content)))
}

async fn search_versions(State(state): State<AppState>, Params(query): Params<SearchQuery>) -> Json<Value> {
    Json(state.db.read().await.search_versions(&query, None))
}

async fn search_versions_by_content(
    State(state): State<AppState>,
    Params(query): Params<SearchQuery>,
    content: String,
) -> Json<Value> {
    Json(state.db.read().await.search_versions(&query, Some(&content)))
}

// --- ids ---

async fn content_by_id(State(state): State<AppState>, Path(content_id): Path<String>) -> Result<Response, Problem> {
    let db = state.db.read().await;
    Ok(content_response(db.content_by_id(parse_id(&content_id)?)?))
}

async fn references_by_content_id(State(state): State<AppState>, Path(content_id): Path<String>) -> JsonResult {
    let db = state.db.read().await;
    let content = db.content_by_id(parse_id(&content_id)?)?;
    Ok(Json(serde_json::json!(content.references)))
}

async fn content_by_global_id(State(state): State<AppState>, Path(global_id): Path<String>) -> Result<Response, Problem> {
    let db = state.db.read().await;
    Ok(content_response(db.content_by_global_id(parse_id(&global_id)?)?))
}

async fn references_by_global_id(
    State(state): State<AppState>,
    Path(global_id): Path<String>,
    Params(query): Params<RefTypeQuery>,
) -> JsonResult {
    let db = state.db.read().await;
    let references = db.references_by_global_id(parse_id(&global_id)?, is_inbound(&query))?;
    Ok(Json(serde_json::json!(references)))
}

async fn content_by_hash(State(state): State<AppState>, Path(hash): Path<String>) -> Result<Response, Problem> {
    let db = state.db.read().await;
    Ok(content_response(db.content_by_hash(&hash)?))
}

async fn references_by_hash(State(state): State<AppState>, Path(hash): Path<String>) -> JsonResult {
    let db = state.db.read().await;
    Ok(Json(serde_json::json!(db.content_by_hash(&hash)?.references)))
}

// --- artifacts ---

async fn list_group_artifacts(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Params(query): Params<SearchQuery>,
) -> Json<Value> {
    let query = SearchQuery {
        group_id: Some(group_id),
        ..query
    };
    Json(state.db.read().await.search_artifacts(&query, None))
}

async fn create_artifact(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Params(query): Params<CreateArtifactQuery>,
    Body(request): Body<CreateArtifact>,
) -> JsonResult {
    let if_exists = query.if_exists.as_deref().unwrap_or("FAIL");
    let created = state.db.write().await.create_artifact(
        &group_id,
        request,
        if_exists,
        query.canonical.unwrap_or(false),
        query.dry_run.unwrap_or(false),
    )?;
    Ok(Json(created))
}

async fn delete_group_artifacts(State(state): State<AppState>, Path(group_id): Path<String>) -> EmptyResult {
    state.check_deletion()?;
    state.db.write().await.delete_group_artifacts(&group_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn artifact_metadata(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
) -> JsonResult {
    Ok(Json(state.db.read().await.artifact_metadata(&group_id, &artifact_id)?))
}

async fn update_artifact_metadata(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
    Body(edit): Body<EditMetadata>,
) -> EmptyResult {
    state
        .db
        .write()
        .await
        .update_artifact_metadata(&group_id, &artifact_id, edit)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_artifact(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
) -> EmptyResult {
    state.check_deletion()?;
    state.db.write().await.delete_artifact(&group_id, &artifact_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- artifact rules ---

async fn list_artifact_rules(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
) -> JsonResult {
    let mut db = state.db.write().await;
    Ok(Json(rules::list(db.artifact_rules(&group_id, &artifact_id)?)))
}

async fn create_artifact_rule(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
    Body(body): Body<RuleBody>,
) -> EmptyResult {
    let mut db = state.db.write().await;
    rules::create(db.artifact_rules(&group_id, &artifact_id)?, &body.rule_type, &body.config)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_artifact_rules(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
) -> EmptyResult {
    let mut db = state.db.write().await;
    db.artifact_rules(&group_id, &artifact_id)?.clear();
    Ok(StatusCode::NO_CONTENT)
}

async fn get_artifact_rule(
    State(state): State<AppState>,
    Path((group_id, artifact_id, rule)): Path<(String, String, String)>,
) -> JsonResult {
    let mut db = state.db.write().await;
    Ok(Json(rules::get(db.artifact_rules(&group_id, &artifact_id)?, &rule)?))
}

async fn update_artifact_rule(
    State(state): State<AppState>,
    Path((group_id, artifact_id, rule)): Path<(String, String, String)>,
    Body(body): Body<RuleBody>,
) -> JsonResult {
    let mut db = state.db.write().await;
    Ok(Json(rules::update(
        db.artifact_rules(&group_id, &artifact_id)?,
        &rule,
        &body.config,
    )?))
}

async fn delete_artifact_rule(
    State(state): State<AppState>,
    Path((group_id, artifact_id, rule)): Path<(String, String, String)>,
) -> EmptyResult {
    let mut db = state.db.write().await;
    rules::delete(db.artifact_rules(&group_id, &artifact_id)?, &rule)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- versions ---

async fn list_versions(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
    Params(query): Params<SearchQuery>,
) -> JsonResult {
    Ok(Json(state.db.read().await.list_versions(&group_id, &artifact_id, &query)?))
}

async fn create_version(
    State(state): State<AppState>,
    Path((group_id, artifact_id)): Path<(String, String)>,
    Params(query): Params<DryRunQuery>,
    Body(request): Body<CreateVersion>,
) -> JsonResult {
    let created = state.db.write().await.create_version(
        &group_id,
        &artifact_id,
        request,
        query.dry_run.unwrap_or(false),
    )?;
    Ok(Json(created))
}

async fn version_metadata(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
) -> JsonResult {
    Ok(Json(
        state
            .db
            .read()
            .await
            .version_metadata(&group_id, &artifact_id, &version)?,
    ))
}

async fn update_version_metadata(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
    Body(edit): Body<EditMetadata>,
) -> EmptyResult {
    state
        .db
        .write()
        .await
        .update_version_metadata(&group_id, &artifact_id, &version, edit)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_version(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
) -> EmptyResult {
    state.check_deletion()?;
    state
        .db
        .write()
        .await
        .delete_version(&group_id, &artifact_id, &version)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn version_content(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
) -> Result<Response, Problem> {
    let db = state.db.read().await;
    Ok(content_response(db.version_content(&group_id, &artifact_id, &version)?))
}

async fn update_version_content(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
    Body(content): Body<CreateContent>,
) -> EmptyResult {
    state
        .db
        .write()
        .await
        .update_version_content(&group_id, &artifact_id, &version, content)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn version_references(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
    Params(query): Params<RefTypeQuery>,
) -> JsonResult {
    let references = state.db.read().await.version_references(
        &group_id,
        &artifact_id,
        &version,
        is_inbound(&query),
    )?;
    Ok(Json(serde_json::json!(references)))
}

async fn version_state(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
) -> JsonResult {
    Ok(Json(
        state
            .db
            .read()
            .await
            .version_state(&group_id, &artifact_id, &version)?,
    ))
}

async fn update_version_state(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
    Params(query): Params<DryRunQuery>,
    Body(body): Body<StateBody>,
) -> EmptyResult {
    state.db.write().await.update_version_state(
        &group_id,
        &artifact_id,
        &version,
        &body.state,
        query.dry_run.unwrap_or(false),
    )?;
    Ok(StatusCode::NO_CONTENT)
}

// --- comments ---

async fn list_comments(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
) -> JsonResult {
    Ok(Json(state.db.read().await.comments(&group_id, &artifact_id, &version)?))
}

async fn add_comment(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version)): Path<(String, String, String)>,
    Body(body): Body<CommentBody>,
) -> JsonResult {
    let comment = state
        .db
        .write()
        .await
        .add_comment(&group_id, &artifact_id, &version, body.value)?;
    Ok(Json(comment))
}

async fn update_comment(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version, comment_id)): Path<(String, String, String, String)>,
    Body(body): Body<CommentBody>,
) -> EmptyResult {
    state
        .db
        .write()
        .await
        .update_comment(&group_id, &artifact_id, &version, &comment_id, body.value)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_comment(
    State(state): State<AppState>,
    Path((group_id, artifact_id, version, comment_id)): Path<(String, String, String, String)>,
) -> EmptyResult {
    state
        .db
        .write()
        .await
        .delete_comment(&group_id, &artifact_id, &version, &comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- global rules ---

async fn list_global_rules(State(state): State<AppState>) -> Json<Value> {
    Json(rules::list(state.db.write().await.global_rules()))
}

async fn create_global_rule(State(state): State<AppState>, Body(body): Body<RuleBody>) -> EmptyResult {
    rules::create(state.db.write().await.global_rules(), &body.rule_type, &body.config)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_global_rules(State(state): State<AppState>) -> StatusCode {
    state.db.write().await.global_rules().clear();
    StatusCode::NO_CONTENT
}

async fn get_global_rule(State(state): State<AppState>, Path(rule): Path<String>) -> JsonResult {
    Ok(Json(rules::get(state.db.write().await.global_rules(), &rule)?))
}

async fn update_global_rule(
    State(state): State<AppState>,
    Path(rule): Path<String>,
    Body(body): Body<RuleBody>,
) -> JsonResult {
    Ok(Json(rules::update(
        state.db.write().await.global_rules(),
        &rule,
        &body.config,
    )?))
}

async fn delete_global_rule(State(state): State<AppState>, Path(rule): Path<String>) -> EmptyResult {
    rules::delete(state.db.write().await.global_rules(), &rule)?;
    Ok(StatusCode::NO_CONTENT)
}
