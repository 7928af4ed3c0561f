use chrono::Utc;

use crate::api::{ClientError, CommunityApi};
use crate::commands::StoreCommand;
use crate::models::{Comment, CreateCommentInput, CreatePostInput, Post, Topic};
use crate::store::CommunityStore;

/// Pairs the remote API with the local store and owns the optimistic-update
/// contract: every mutation applies its [`StoreCommand`] first, awaits the
/// remote confirmation, and applies the command's inverse when the call
/// fails. The store itself never rolls anything back.
pub struct CommunitySession<A: CommunityApi> {
    api: A,
    pub store: CommunityStore,
}

impl<A: CommunityApi> CommunitySession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: CommunityStore::new(),
        }
    }

    /// Fetches the unfiltered post list and replaces the snapshot; the
    /// store's own predicates take care of the visible view.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let posts = self.api.list_posts(None, None).await?;
        self.store.replace_snapshot(posts);
        Ok(())
    }

    /// Fetches one post with its full comment thread and folds it into the
    /// snapshot.
    pub async fn load_post(&mut self, post_id: &str) -> Result<(), ClientError> {
        let post = self.api.get_post(post_id).await?;
        self.store.upsert_post(post);
        Ok(())
    }

    pub fn set_topic_filter(&mut self, topic: Option<Topic>) {
        self.store.set_topic_filter(topic);
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.store.set_search_query(query);
    }

    /// Flips the viewer's like on a post. Returns the new liked state.
    pub async fn toggle_post_like(&mut self, post_id: &str) -> Result<bool, ClientError> {
        let desired = match self.store.find_post(post_id) {
            Some(post) => !post.is_liked,
            None => {
                return Err(ClientError::NotFound(format!(
                    "post {post_id} is not in the local snapshot"
                )))
            }
        };
        let command = if desired {
            StoreCommand::LikePost {
                post_id: post_id.to_string(),
            }
        } else {
            StoreCommand::UnlikePost {
                post_id: post_id.to_string(),
            }
        };

        command.apply(&mut self.store);
        match self.api.set_post_liked(post_id, desired).await {
            Ok(_) => Ok(desired),
            Err(err) => {
                log::warn!("like update for post {post_id} failed, rolling back: {err}");
                command.inverse().apply(&mut self.store);
                Err(err)
            }
        }
    }

    /// Flips the viewer's like on a comment. Returns the new liked state.
    pub async fn toggle_comment_like(
        &mut self,
        post_id: &str,
        comment_id: &str,
    ) -> Result<bool, ClientError> {
        let desired = match self.store.find_comment(post_id, comment_id) {
            Some(comment) => !comment.is_liked,
            None => {
                return Err(ClientError::NotFound(format!(
                    "comment {comment_id} is not in the local snapshot"
                )))
            }
        };
        let command = if desired {
            StoreCommand::LikeComment {
                post_id: post_id.to_string(),
                comment_id: comment_id.to_string(),
            }
        } else {
            StoreCommand::UnlikeComment {
                post_id: post_id.to_string(),
                comment_id: comment_id.to_string(),
            }
        };

        command.apply(&mut self.store);
        match self.api.set_comment_liked(post_id, comment_id, desired).await {
            Ok(_) => Ok(desired),
            Err(err) => {
                log::warn!(
                    "like update for comment {comment_id} failed, rolling back: {err}"
                );
                command.inverse().apply(&mut self.store);
                Err(err)
            }
        }
    }

    /// Adds a comment optimistically under a provisional id, then swaps in
    /// the server's comment once confirmed.
    pub async fn submit_comment(
        &mut self,
        post_id: &str,
        body: &str,
    ) -> Result<Comment, ClientError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(ClientError::Validation(
                "comment body may not be empty".into(),
            ));
        }

        let provisional = Comment {
            id: format!("local_{}", Utc::now().timestamp_millis()),
            author_id: "current_user".into(),
            author_name: "You".into(),
            author_avatar: None,
            body: trimmed.to_string(),
            created_at: Utc::now().to_rfc3339(),
            likes: 0,
            is_liked: false,
            is_premium: false,
        };
        let command = StoreCommand::AddComment {
            post_id: post_id.to_string(),
            comment: provisional.clone(),
        };
        command.apply(&mut self.store);

        let input = CreateCommentInput {
            body: trimmed.to_string(),
            author_id: provisional.author_id.clone(),
            author_name: provisional.author_name.clone(),
            author_avatar: None,
            is_premium: false,
        };
        match self.api.add_comment(post_id, &input).await {
            Ok(comment) => {
                self.store.remove_comment(post_id, &provisional.id);
                self.store.add_comment(post_id, comment.clone());
                Ok(comment)
            }
            Err(err) => {
                log::warn!("comment on post {post_id} failed, rolling back: {err}");
                command.inverse().apply(&mut self.store);
                Err(err)
            }
        }
    }

    /// Creates a post. No optimistic insert here: the snapshot only gains
    /// the post once the server has assigned it an id.
    pub async fn submit_post(&mut self, input: &CreatePostInput) -> Result<Post, ClientError> {
        if input.title.trim().is_empty() {
            return Err(ClientError::Validation("post title may not be empty".into()));
        }
        if input.body.trim().is_empty() {
            return Err(ClientError::Validation("post body may not be empty".into()));
        }
        let post = self.api.create_post(input).await?;
        self.store.add_post(post.clone());
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentLikeResponse, PostLikeResponse};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn sample_post(id: &str, topic: Topic, likes: u32) -> Post {
        Post {
            id: id.into(),
            author_id: "user1".into(),
            author_name: "Sarah Chen".into(),
            author_avatar: None,
            title: "Visa application timeline".into(),
            body: "Three weeks start to finish".into(),
            topic,
            created_at: "2024-01-15T10:30:00Z".into(),
            likes,
            is_liked: false,
            is_premium: false,
            comments: vec![Comment {
                id: "c1".into(),
                author_id: "user2".into(),
                author_name: "Alex Johnson".into(),
                author_avatar: None,
                body: "Congratulations!".into(),
                created_at: "2024-01-15T11:00:00Z".into(),
                likes: 3,
                is_liked: false,
                is_premium: false,
            }],
        }
    }

    /// Fake remote: serves a canned post list and fails every mutation when
    /// `fail_mutations` is set.
    struct FakeApi {
        posts: Vec<Post>,
        fail_mutations: Cell<bool>,
    }

    impl FakeApi {
        fn new(posts: Vec<Post>) -> Self {
            Self {
                posts,
                fail_mutations: Cell::new(false),
            }
        }

        fn failure(&self) -> ClientError {
            ClientError::Unknown("injected remote failure".into())
        }
    }

    impl CommunityApi for FakeApi {
        async fn list_posts(
            &self,
            topic: Option<Topic>,
            search: Option<&str>,
        ) -> Result<Vec<Post>, ClientError> {
            let query = search.map(str::to_lowercase).unwrap_or_default();
            Ok(self
                .posts
                .iter()
                .filter(|post| topic.map_or(true, |t| post.topic == t))
                .filter(|post| {
                    query.is_empty() || post.title.to_lowercase().contains(&query)
                })
                .cloned()
                .collect())
        }

        async fn get_post(&self, post_id: &str) -> Result<Post, ClientError> {
            self.posts
                .iter()
                .find(|post| post.id == post_id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("post {post_id} not found")))
        }

        async fn create_post(&self, input: &CreatePostInput) -> Result<Post, ClientError> {
            if self.fail_mutations.get() {
                return Err(self.failure());
            }
            Ok(Post {
                id: "post_900".into(),
                author_id: input.author_id.clone(),
                author_name: input.author_name.clone(),
                author_avatar: input.author_avatar.clone(),
                title: input.title.clone(),
                body: input.body.clone(),
                topic: input.topic,
                created_at: "2024-02-01T09:00:00Z".into(),
                likes: 0,
                is_liked: false,
                is_premium: input.is_premium,
                comments: Vec::new(),
            })
        }

        async fn set_post_liked(
            &self,
            post_id: &str,
            is_liked: bool,
        ) -> Result<PostLikeResponse, ClientError> {
            if self.fail_mutations.get() {
                return Err(self.failure());
            }
            Ok(PostLikeResponse {
                post_id: post_id.to_string(),
                is_liked,
            })
        }

        async fn add_comment(
            &self,
            _post_id: &str,
            input: &CreateCommentInput,
        ) -> Result<Comment, ClientError> {
            if self.fail_mutations.get() {
                return Err(self.failure());
            }
            Ok(Comment {
                id: "comment_900".into(),
                author_id: input.author_id.clone(),
                author_name: input.author_name.clone(),
                author_avatar: input.author_avatar.clone(),
                body: input.body.clone(),
                created_at: "2024-02-01T09:05:00Z".into(),
                likes: 0,
                is_liked: false,
                is_premium: input.is_premium,
            })
        }

        async fn set_comment_liked(
            &self,
            post_id: &str,
            comment_id: &str,
            is_liked: bool,
        ) -> Result<CommentLikeResponse, ClientError> {
            if self.fail_mutations.get() {
                return Err(self.failure());
            }
            Ok(CommentLikeResponse {
                post_id: post_id.to_string(),
                comment_id: comment_id.to_string(),
                is_liked,
            })
        }
    }

    async fn seeded_session() -> CommunitySession<FakeApi> {
        let api = FakeApi::new(vec![sample_post("1", Topic::Visa, 24)]);
        let mut session = CommunitySession::new(api);
        session.refresh().await.expect("refresh");
        session
    }

    #[tokio::test]
    async fn refresh_replaces_the_snapshot() {
        let session = seeded_session().await;
        assert_eq!(session.store.posts().len(), 1);
        assert_eq!(session.store.filtered().len(), 1);
    }

    #[tokio::test]
    async fn toggle_like_confirms_and_keeps_the_optimistic_state() {
        let mut session = seeded_session().await;
        let liked = session.toggle_post_like("1").await.expect("toggle");
        assert!(liked);
        let post = session.store.find_post("1").unwrap();
        assert_eq!(post.likes, 25);
        assert!(post.is_liked);

        let liked = session.toggle_post_like("1").await.expect("toggle back");
        assert!(!liked);
        let post = session.store.find_post("1").unwrap();
        assert_eq!(post.likes, 24);
        assert!(!post.is_liked);
    }

    #[tokio::test]
    async fn failed_like_rolls_the_store_back() {
        let mut session = seeded_session().await;
        session.api.fail_mutations.set(true);

        let err = session.toggle_post_like("1").await.expect_err("must fail");
        assert!(matches!(err, ClientError::Unknown(_)));

        let post = session.store.find_post("1").unwrap();
        assert_eq!(post.likes, 24, "optimistic bump must be undone");
        assert!(!post.is_liked);
    }

    #[tokio::test]
    async fn failed_comment_like_rolls_back() {
        let mut session = seeded_session().await;
        session.api.fail_mutations.set(true);

        session
            .toggle_comment_like("1", "c1")
            .await
            .expect_err("must fail");

        let comment = session.store.find_comment("1", "c1").unwrap();
        assert_eq!(comment.likes, 3);
        assert!(!comment.is_liked);
    }

    #[tokio::test]
    async fn submit_comment_swaps_in_the_server_id() {
        let mut session = seeded_session().await;
        let comment = session
            .submit_comment("1", "Thanks for the tips!")
            .await
            .expect("comment");
        assert_eq!(comment.id, "comment_900");

        let post = session.store.find_post("1").unwrap();
        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments.last().unwrap().id, "comment_900");
        assert!(!post.comments.iter().any(|c| c.id.starts_with("local_")));
    }

    #[tokio::test]
    async fn failed_comment_submission_removes_the_provisional_entry() {
        let mut session = seeded_session().await;
        session.api.fail_mutations.set(true);

        session
            .submit_comment("1", "Thanks for the tips!")
            .await
            .expect_err("must fail");

        let post = session.store.find_post("1").unwrap();
        assert_eq!(post.comments.len(), 1, "only the fixture comment remains");
    }

    #[tokio::test]
    async fn blank_comment_fails_client_side_without_touching_the_store() {
        let mut session = seeded_session().await;
        let err = session.submit_comment("1", "   ").await.expect_err("must fail");
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(session.store.find_post("1").unwrap().comments.len(), 1);
    }

    #[tokio::test]
    async fn submit_post_adds_the_server_post_to_the_snapshot() {
        let mut session = seeded_session().await;
        let input = CreatePostInput {
            title: "Opening a bank account".into(),
            body: "Remote-friendly banks?".into(),
            topic: Topic::Finances,
            author_id: "current_user".into(),
            author_name: "You".into(),
            author_avatar: None,
            is_premium: false,
        };
        let post = session.submit_post(&input).await.expect("create");
        assert_eq!(post.id, "post_900");
        assert_eq!(session.store.posts().len(), 2);
        assert_eq!(session.store.posts()[0].id, "post_900");
    }

    #[tokio::test]
    async fn toggling_an_unknown_post_is_a_local_not_found() {
        let mut session = seeded_session().await;
        let err = session
            .toggle_post_like("ghost")
            .await
            .expect_err("must fail");
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
