use crate::community::{Comment, Post, Topic};
use anyhow::{anyhow, Result};
use std::sync::{Arc, RwLock};

/// Storage seam for community posts. Handlers go through a service holding
/// one of these; tests substitute fakes.
pub trait CommunityRepository: Send + Sync {
    fn list(&self) -> Result<Vec<Post>>;
    fn get(&self, post_id: &str) -> Result<Option<Post>>;
    /// Inserts at the front of the collection (newest first).
    fn insert(&self, post: Post) -> Result<()>;
    /// Returns false when the post does not exist.
    fn set_post_liked(&self, post_id: &str, is_liked: bool) -> Result<bool>;
    /// Returns false when the post does not exist.
    fn append_comment(&self, post_id: &str, comment: Comment) -> Result<bool>;
    /// Returns false when the comment does not exist within the post.
    fn set_comment_liked(&self, post_id: &str, comment_id: &str, is_liked: bool) -> Result<bool>;
}

/// Process-lifetime storage: seeded from the fixture set, mutated in place,
/// reset on restart. There is deliberately no durable layer behind this.
#[derive(Clone)]
pub struct MemoryRepository {
    posts: Arc<RwLock<Vec<Post>>>,
}

impl MemoryRepository {
    pub fn new(seed: Vec<Post>) -> Self {
        Self {
            posts: Arc::new(RwLock::new(seed)),
        }
    }

    pub fn with_fixtures() -> Self {
        Self::new(fixture_posts())
    }

    fn read<T>(&self, f: impl FnOnce(&Vec<Post>) -> T) -> Result<T> {
        let guard = self
            .posts
            .read()
            .map_err(|_| anyhow!("repository lock poisoned"))?;
        Ok(f(&guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Vec<Post>) -> T) -> Result<T> {
        let mut guard = self
            .posts
            .write()
            .map_err(|_| anyhow!("repository lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl CommunityRepository for MemoryRepository {
    fn list(&self) -> Result<Vec<Post>> {
        self.read(|posts| posts.clone())
    }

    fn get(&self, post_id: &str) -> Result<Option<Post>> {
        self.read(|posts| posts.iter().find(|post| post.id == post_id).cloned())
    }

    fn insert(&self, post: Post) -> Result<()> {
        self.write(|posts| posts.insert(0, post))
    }

    fn set_post_liked(&self, post_id: &str, is_liked: bool) -> Result<bool> {
        self.write(|posts| {
            let Some(post) = posts.iter_mut().find(|post| post.id == post_id) else {
                return false;
            };
            apply_like_state(&mut post.likes, &mut post.is_liked, is_liked);
            true
        })
    }

    fn append_comment(&self, post_id: &str, comment: Comment) -> Result<bool> {
        self.write(|posts| {
            let Some(post) = posts.iter_mut().find(|post| post.id == post_id) else {
                return false;
            };
            post.comments.push(comment);
            true
        })
    }

    fn set_comment_liked(&self, post_id: &str, comment_id: &str, is_liked: bool) -> Result<bool> {
        self.write(|posts| {
            let Some(comment) = posts
                .iter_mut()
                .find(|post| post.id == post_id)
                .and_then(|post| {
                    post.comments
                        .iter_mut()
                        .find(|comment| comment.id == comment_id)
                })
            else {
                return false;
            };
            apply_like_state(&mut comment.likes, &mut comment.is_liked, is_liked);
            true
        })
    }
}

/// The count moves only on an actual state transition; replaying the same
/// desired state is a no-op, and it never goes below zero.
fn apply_like_state(likes: &mut u32, is_liked: &mut bool, desired: bool) {
    if *is_liked == desired {
        return;
    }
    if desired {
        *likes += 1;
    } else {
        *likes = likes.saturating_sub(1);
    }
    *is_liked = desired;
}

pub fn fixture_posts() -> Vec<Post> {
    vec![
        Post {
            id: "1".into(),
            author_id: "user1".into(),
            author_name: "Sarah Chen".into(),
            author_avatar: Some(
                "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=256&q=80".into(),
            ),
            title: "Visa application timeline for UK universities".into(),
            body: "I just got my UK student visa approved! The whole process took about 3 weeks \
                   from submission. Here are some tips that helped me speed up the process:\n\n\
                   1. Make sure all documents are properly certified\n\
                   2. Book your biometrics appointment early\n\
                   3. Pay the healthcare surcharge upfront\n\
                   4. Include a detailed study plan\n\n\
                   Feel free to ask if you have any questions about the process!"
                .into(),
            topic: Topic::Visa,
            created_at: "2024-01-15T10:30:00Z".into(),
            likes: 24,
            is_liked: false,
            is_premium: true,
            comments: vec![
                Comment {
                    id: "c1".into(),
                    author_id: "user2".into(),
                    author_name: "Alex Johnson".into(),
                    author_avatar: Some(
                        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=256&q=80"
                            .into(),
                    ),
                    body: "Congratulations! How long did the biometrics appointment take?".into(),
                    created_at: "2024-01-15T11:00:00Z".into(),
                    likes: 3,
                    is_liked: false,
                    is_premium: false,
                },
                Comment {
                    id: "c3".into(),
                    author_id: "user1".into(),
                    author_name: "Sarah Chen".into(),
                    author_avatar: Some(
                        "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=256&q=80"
                            .into(),
                    ),
                    body: "The biometrics appointment was really quick - about 15 minutes total. \
                           Just make sure to arrive on time!"
                        .into(),
                    created_at: "2024-01-15T11:30:00Z".into(),
                    likes: 1,
                    is_liked: false,
                    is_premium: true,
                },
            ],
        },
        Post {
            id: "2".into(),
            author_id: "user3".into(),
            author_name: "Maria Rodriguez".into(),
            author_avatar: Some(
                "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=256&q=80".into(),
            ),
            title: "Best student accommodation in London?".into(),
            body: "I'm starting at UCL in September and looking for accommodation \
                   recommendations. What are your experiences with university halls vs private \
                   housing?\n\nI'm particularly interested in:\n- Cost comparison\n- Social \
                   aspects\n- Location convenience\n- Facilities available\n\nAny advice would \
                   be greatly appreciated!"
                .into(),
            topic: Topic::Accommodation,
            created_at: "2024-01-14T15:45:00Z".into(),
            likes: 18,
            is_liked: false,
            is_premium: false,
            comments: vec![Comment {
                id: "c2".into(),
                author_id: "user4".into(),
                author_name: "James Wilson".into(),
                author_avatar: Some(
                    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=256&q=80"
                        .into(),
                ),
                body: "I stayed in university halls for my first year and it was great for \
                       meeting people! The social aspect is definitely worth it."
                    .into(),
                created_at: "2024-01-14T16:00:00Z".into(),
                likes: 5,
                is_liked: false,
                is_premium: false,
            }],
        },
    ]
}
