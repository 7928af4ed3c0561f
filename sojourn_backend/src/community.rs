use crate::repository::{CommunityRepository, MemoryRepository};
use crate::utils::{now_utc_iso, timestamp_id};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Fixed set of discussion categories. Every post carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Visa,
    University,
    Accommodation,
    Finances,
    Culture,
    Academics,
    Career,
    General,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::Visa,
        Topic::University,
        Topic::Accommodation,
        Topic::Finances,
        Topic::Culture,
        Topic::Academics,
        Topic::Career,
        Topic::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Visa => "visa",
            Topic::University => "university",
            Topic::Accommodation => "accommodation",
            Topic::Finances => "finances",
            Topic::Culture => "culture",
            Topic::Academics => "academics",
            Topic::Career => "career",
            Topic::General => "general",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = CommunityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == raw)
            .ok_or_else(|| CommunityError::Validation(format!("unknown topic '{raw}'")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub title: String,
    pub body: String,
    pub topic: Topic,
    pub created_at: String,
    pub likes: u32,
    pub is_liked: bool,
    pub is_premium: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub body: String,
    pub created_at: String,
    pub likes: u32,
    pub is_liked: bool,
    pub is_premium: bool,
}

/// Query-side filter for `list_posts`. Both predicates are optional and
/// combine conjunctively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub topic: Topic,
    #[serde(default = "default_author_id")]
    pub author_id: String,
    #[serde(default = "default_author_name")]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub body: String,
    #[serde(default = "default_author_id")]
    pub author_id: String,
    #[serde(default = "default_author_name")]
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

fn default_author_id() -> String {
    "current_user".to_string()
}

fn default_author_name() -> String {
    "Anonymous User".to_string()
}

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct CommunityService {
    repository: Arc<dyn CommunityRepository>,
}

impl CommunityService {
    pub fn new(repository: Arc<dyn CommunityRepository>) -> Self {
        Self { repository }
    }

    /// Service backed by the built-in fixture set. Created posts live until
    /// the process exits; there is no durable storage behind this.
    pub fn with_fixtures() -> Self {
        Self::new(Arc::new(MemoryRepository::with_fixtures()))
    }

    pub fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>, CommunityError> {
        let posts = self.repository.list()?;
        let query = filter
            .search
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        Ok(posts
            .into_iter()
            .filter(|post| filter.topic.map_or(true, |topic| post.topic == topic))
            .filter(|post| {
                query.is_empty()
                    || post.title.to_lowercase().contains(&query)
                    || post.body.to_lowercase().contains(&query)
            })
            .collect())
    }

    pub fn get_post(&self, post_id: &str) -> Result<Post, CommunityError> {
        self.repository
            .get(post_id)?
            .ok_or_else(|| CommunityError::NotFound(format!("post {post_id} not found")))
    }

    pub fn create_post(&self, input: CreatePostInput) -> Result<Post, CommunityError> {
        if input.title.trim().is_empty() {
            return Err(CommunityError::Validation(
                "post title may not be empty".into(),
            ));
        }
        if input.body.trim().is_empty() {
            return Err(CommunityError::Validation(
                "post body may not be empty".into(),
            ));
        }
        let post = Post {
            id: timestamp_id("post"),
            author_id: input.author_id,
            author_name: input.author_name,
            author_avatar: input.author_avatar,
            title: input.title,
            body: input.body,
            topic: input.topic,
            created_at: now_utc_iso(),
            likes: 0,
            is_liked: false,
            is_premium: input.is_premium,
            comments: Vec::new(),
        };
        self.repository.insert(post.clone())?;
        Ok(post)
    }

    pub fn set_post_liked(&self, post_id: &str, is_liked: bool) -> Result<(), CommunityError> {
        if !self.repository.set_post_liked(post_id, is_liked)? {
            return Err(CommunityError::NotFound(format!(
                "post {post_id} not found"
            )));
        }
        Ok(())
    }

    pub fn add_comment(
        &self,
        post_id: &str,
        input: CreateCommentInput,
    ) -> Result<Comment, CommunityError> {
        if input.body.trim().is_empty() {
            return Err(CommunityError::Validation(
                "comment body may not be empty".into(),
            ));
        }
        let comment = Comment {
            id: timestamp_id("comment"),
            author_id: input.author_id,
            author_name: input.author_name,
            author_avatar: input.author_avatar,
            body: input.body,
            created_at: now_utc_iso(),
            likes: 0,
            is_liked: false,
            is_premium: input.is_premium,
        };
        if !self.repository.append_comment(post_id, comment.clone())? {
            return Err(CommunityError::NotFound(format!(
                "post {post_id} not found"
            )));
        }
        Ok(comment)
    }

    pub fn set_comment_liked(
        &self,
        post_id: &str,
        comment_id: &str,
        is_liked: bool,
    ) -> Result<(), CommunityError> {
        if self.repository.get(post_id)?.is_none() {
            return Err(CommunityError::NotFound(format!(
                "post {post_id} not found"
            )));
        }
        if !self
            .repository
            .set_comment_liked(post_id, comment_id, is_liked)?
        {
            return Err(CommunityError::NotFound(format!(
                "comment {comment_id} not found in post {post_id}"
            )));
        }
        Ok(())
    }
}
