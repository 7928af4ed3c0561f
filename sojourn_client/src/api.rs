use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    Comment, CommentLikeResponse, CreateCommentInput, CreatePostInput, Post, PostLikeResponse,
    Topic,
};

/// Typed errors surfaced by remote calls. Validation and NotFound carry the
/// server's human-readable message; Transport covers everything below HTTP.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Unknown(String),
}

/// The remote call surface the session layer is written against. Production
/// code uses [`ApiClient`]; tests substitute fakes.
#[allow(async_fn_in_trait)]
pub trait CommunityApi {
    async fn list_posts(
        &self,
        topic: Option<Topic>,
        search: Option<&str>,
    ) -> Result<Vec<Post>, ClientError>;
    async fn get_post(&self, post_id: &str) -> Result<Post, ClientError>;
    async fn create_post(&self, input: &CreatePostInput) -> Result<Post, ClientError>;
    async fn set_post_liked(
        &self,
        post_id: &str,
        is_liked: bool,
    ) -> Result<PostLikeResponse, ClientError>;
    async fn add_comment(
        &self,
        post_id: &str,
        input: &CreateCommentInput,
    ) -> Result<Comment, ClientError>;
    async fn set_comment_liked(
        &self,
        post_id: &str,
        comment_id: &str,
        is_liked: bool,
    ) -> Result<CommentLikeResponse, ClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ClientError::Unknown(format!("invalid base URL: {err}")))?;
        url.set_path(path.trim_start_matches('/'));
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps the server's `{ "message": ... }` error body plus status code onto
/// the typed error taxonomy.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.message)
        .unwrap_or_else(|_| status.to_string());
    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Unknown(message),
    })
}

impl CommunityApi for ApiClient {
    async fn list_posts(
        &self,
        topic: Option<Topic>,
        search: Option<&str>,
    ) -> Result<Vec<Post>, ClientError> {
        let url = self.url("/community/posts")?;
        let mut request = self.client.get(url);
        if let Some(topic) = topic {
            request = request.query(&[("topic", topic.as_str())]);
        }
        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        decode(request.send().await?).await
    }

    async fn get_post(&self, post_id: &str) -> Result<Post, ClientError> {
        let url = self.url(&format!("/community/posts/{post_id}"))?;
        decode(self.client.get(url).send().await?).await
    }

    async fn create_post(&self, input: &CreatePostInput) -> Result<Post, ClientError> {
        let url = self.url("/community/posts")?;
        decode(self.client.post(url).json(input).send().await?).await
    }

    async fn set_post_liked(
        &self,
        post_id: &str,
        is_liked: bool,
    ) -> Result<PostLikeResponse, ClientError> {
        let url = self.url(&format!("/community/posts/{post_id}/like"))?;
        let payload = serde_json::json!({ "is_liked": is_liked });
        decode(self.client.post(url).json(&payload).send().await?).await
    }

    async fn add_comment(
        &self,
        post_id: &str,
        input: &CreateCommentInput,
    ) -> Result<Comment, ClientError> {
        let url = self.url(&format!("/community/posts/{post_id}/comments"))?;
        decode(self.client.post(url).json(input).send().await?).await
    }

    async fn set_comment_liked(
        &self,
        post_id: &str,
        comment_id: &str,
        is_liked: bool,
    ) -> Result<CommentLikeResponse, ClientError> {
        let url = self.url(&format!(
            "/community/posts/{post_id}/comments/{comment_id}/like"
        ))?;
        let payload = serde_json::json!({ "is_liked": is_liked });
        decode(self.client.post(url).json(&payload).send().await?).await
    }
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}
