pub mod api;
pub mod commands;
pub mod models;
pub mod session;
pub mod store;

pub use api::{ApiClient, ClientError, CommunityApi};
pub use commands::StoreCommand;
pub use models::{Comment, CreateCommentInput, CreatePostInput, Post, Topic};
pub use session::CommunitySession;
pub use store::CommunityStore;
