use super::{ApiError, ApiResult, AppState};
use crate::community::{Comment, CreateCommentInput, CreatePostInput, Post, PostFilter};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    api_port: u16,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SetLikedRequest {
    is_liked: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostLikeResponse {
    post_id: String,
    is_liked: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentLikeResponse {
    post_id: String,
    comment_id: String,
    is_liked: bool,
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_port: state.config.api_port,
    })
}

pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> ApiResult<Vec<Post>> {
    let posts = state.community.list_posts(&filter)?;
    Ok(Json(posts))
}

pub(crate) async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    Ok(Json(state.community.get_post(&id)?))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostInput>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.community.create_post(payload)?;
    tracing::info!(post_id = %post.id, topic = %post.topic, "created community post");
    Ok((StatusCode::CREATED, Json(post)))
}

pub(crate) async fn set_post_liked(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SetLikedRequest>,
) -> ApiResult<PostLikeResponse> {
    state.community.set_post_liked(&id, payload.is_liked)?;
    Ok(Json(PostLikeResponse {
        post_id: id,
        is_liked: payload.is_liked,
    }))
}

pub(crate) async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentInput>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.community.add_comment(&id, payload)?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub(crate) async fn set_comment_liked(
    State(state): State<AppState>,
    Path((id, comment_id)): Path<(String, String)>,
    Json(payload): Json<SetLikedRequest>,
) -> ApiResult<CommentLikeResponse> {
    state
        .community
        .set_comment_liked(&id, &comment_id, payload.is_liked)?;
    Ok(Json(CommentLikeResponse {
        post_id: id,
        comment_id,
        is_liked: payload.is_liked,
    }))
}
