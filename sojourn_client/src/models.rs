use serde::{Deserialize, Serialize};

/// Fixed set of discussion categories, mirroring the backend's enumeration.
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
    #[serde(default)]
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
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub topic: Topic,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    pub body: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostLikeResponse {
    pub post_id: String,
    pub is_liked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentLikeResponse {
    pub post_id: String,
    pub comment_id: String,
    pub is_liked: bool,
}
