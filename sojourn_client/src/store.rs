use crate::models::{Comment, Post, Topic};

/// Client-side snapshot of the community feed.
///
/// Holds the full post list as last fetched plus a derived `filtered` view.
/// The two active predicates (selected topic, search text) combine
/// conjunctively and the view is recomputed wholesale from the full snapshot
/// whenever either predicate or the snapshot changes, so it can never hold a
/// stale entry. The store performs no I/O; remote reconciliation and
/// rollback live in the session layer.
#[derive(Debug, Clone, Default)]
pub struct CommunityStore {
    posts: Vec<Post>,
    filtered: Vec<Post>,
    selected_topic: Option<Topic>,
    search_query: String,
}

impl CommunityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filtered(&self) -> &[Post] {
        &self.filtered
    }

    pub fn selected_topic(&self) -> Option<Topic> {
        self.selected_topic
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn find_post(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn find_comment(&self, post_id: &str, comment_id: &str) -> Option<&Comment> {
        self.find_post(post_id)
            .and_then(|post| post.comments.iter().find(|c| c.id == comment_id))
    }

    /// Replaces the full snapshot, e.g. after a successful remote fetch.
    pub fn replace_snapshot(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.recompute_filtered();
    }

    /// Prepends a post (newest first) and refreshes the filtered view.
    pub fn add_post(&mut self, post: Post) {
        self.posts.insert(0, post);
        self.recompute_filtered();
    }

    /// Replaces the stored post with the same id, or prepends it when new.
    pub fn upsert_post(&mut self, post: Post) {
        match self.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => self.posts.insert(0, post),
        }
        self.recompute_filtered();
    }

    pub fn set_topic_filter(&mut self, topic: Option<Topic>) {
        self.selected_topic = topic;
        self.recompute_filtered();
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.recompute_filtered();
    }

    /// Optimistic like: bumps the count and flags the post in both views.
    /// Applies unconditionally: calling it twice counts twice. Issuing the
    /// matching inverse is the caller's job.
    pub fn like_post(&mut self, post_id: &str) {
        self.update_post(post_id, |post| {
            post.likes += 1;
            post.is_liked = true;
        });
    }

    pub fn unlike_post(&mut self, post_id: &str) {
        self.update_post(post_id, |post| {
            post.likes = post.likes.saturating_sub(1);
            post.is_liked = false;
        });
    }

    pub fn add_comment(&mut self, post_id: &str, comment: Comment) {
        self.update_post(post_id, |post| {
            post.comments.push(comment.clone());
        });
    }

    /// Exists as the inverse of `add_comment` for rollback; the server model
    /// itself never deletes comments.
    pub fn remove_comment(&mut self, post_id: &str, comment_id: &str) {
        self.update_post(post_id, |post| {
            post.comments.retain(|comment| comment.id != comment_id);
        });
    }

    pub fn like_comment(&mut self, post_id: &str, comment_id: &str) {
        self.update_comment(post_id, comment_id, |comment| {
            comment.likes += 1;
            comment.is_liked = true;
        });
    }

    pub fn unlike_comment(&mut self, post_id: &str, comment_id: &str) {
        self.update_comment(post_id, comment_id, |comment| {
            comment.likes = comment.likes.saturating_sub(1);
            comment.is_liked = false;
        });
    }

    /// Like/comment mutations leave every predicate input untouched, so
    /// patching the matching entry in both vectors is equivalent to a full
    /// recompute.
    fn update_post(&mut self, post_id: &str, mut apply: impl FnMut(&mut Post)) {
        if let Some(post) = self.posts.iter_mut().find(|post| post.id == post_id) {
            apply(post);
        }
        if let Some(post) = self.filtered.iter_mut().find(|post| post.id == post_id) {
            apply(post);
        }
    }

    fn update_comment(
        &mut self,
        post_id: &str,
        comment_id: &str,
        mut apply: impl FnMut(&mut Comment),
    ) {
        self.update_post(post_id, |post| {
            if let Some(comment) = post
                .comments
                .iter_mut()
                .find(|comment| comment.id == comment_id)
            {
                apply(comment);
            }
        });
    }

    fn recompute_filtered(&mut self) {
        let query = self.search_query.to_lowercase();
        let topic = self.selected_topic;
        self.filtered = self
            .posts
            .iter()
            .filter(|post| topic.map_or(true, |t| post.topic == t))
            .filter(|post| {
                query.is_empty()
                    || post.title.to_lowercase().contains(&query)
                    || post.body.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
    }
}
