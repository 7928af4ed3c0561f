use crate::models::Comment;
use crate::store::CommunityStore;

/// An optimistic store mutation captured as a value, paired with its exact
/// inverse. The session layer applies the forward command before the remote
/// call and applies `inverse()` when the call fails, so no call site has to
/// remember the undo by hand.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    LikePost {
        post_id: String,
    },
    UnlikePost {
        post_id: String,
    },
    LikeComment {
        post_id: String,
        comment_id: String,
    },
    UnlikeComment {
        post_id: String,
        comment_id: String,
    },
    AddComment {
        post_id: String,
        comment: Comment,
    },
    /// Carries the full comment so its inverse can restore it.
    RemoveComment {
        post_id: String,
        comment: Comment,
    },
}

impl StoreCommand {
    pub fn apply(&self, store: &mut CommunityStore) {
        match self {
            StoreCommand::LikePost { post_id } => store.like_post(post_id),
            StoreCommand::UnlikePost { post_id } => store.unlike_post(post_id),
            StoreCommand::LikeComment {
                post_id,
                comment_id,
            } => store.like_comment(post_id, comment_id),
            StoreCommand::UnlikeComment {
                post_id,
                comment_id,
            } => store.unlike_comment(post_id, comment_id),
            StoreCommand::AddComment { post_id, comment } => {
                store.add_comment(post_id, comment.clone())
            }
            StoreCommand::RemoveComment { post_id, comment } => {
                store.remove_comment(post_id, &comment.id)
            }
        }
    }

    pub fn inverse(&self) -> StoreCommand {
        match self {
            StoreCommand::LikePost { post_id } => StoreCommand::UnlikePost {
                post_id: post_id.clone(),
            },
            StoreCommand::UnlikePost { post_id } => StoreCommand::LikePost {
                post_id: post_id.clone(),
            },
            StoreCommand::LikeComment {
                post_id,
                comment_id,
            } => StoreCommand::UnlikeComment {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
            },
            StoreCommand::UnlikeComment {
                post_id,
                comment_id,
            } => StoreCommand::LikeComment {
                post_id: post_id.clone(),
                comment_id: comment_id.clone(),
            },
            StoreCommand::AddComment { post_id, comment } => StoreCommand::RemoveComment {
                post_id: post_id.clone(),
                comment: comment.clone(),
            },
            StoreCommand::RemoveComment { post_id, comment } => StoreCommand::AddComment {
                post_id: post_id.clone(),
                comment: comment.clone(),
            },
        }
    }
}
