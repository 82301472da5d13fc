use crate::models::{
    CreatedPost, MediaItem, NewMediaItem, NewPost, NewSocialAccount, Platform, PlatformBinding,
    Post, SocialAccount,
};
use anyhow::Result;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to the configured store implementation.
pub type StoreHandle = Arc<dyn ContentStore>;

/// Trait defining the persistence interface for scheduler-service.
/// Both PostgresContentStore and MemoryContentStore implement this.
///
/// Every method is scoped to the calling user. A caller can never read or
/// mutate rows belonging to another user, regardless of the ids it supplies.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Verify the backend is reachable
    async fn health_check(&self) -> Result<()>;

    // ------------------------------------------------------------------
    // Posts
    // ------------------------------------------------------------------

    /// Create a post and assemble its platform bindings atomically.
    ///
    /// Binding assembly resolves `platforms` against the user's **active**
    /// social accounts; inactive accounts matching a requested platform are
    /// skipped. Each created binding starts in `pending` status. If binding
    /// assembly fails, the post row must not be left behind.
    async fn create_post(
        &self,
        user_id: Uuid,
        new_post: NewPost,
        platforms: &[Platform],
    ) -> Result<CreatedPost>;

    /// Fetch one post by id
    async fn get_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Post>>;

    /// All of the user's posts, scheduled ones first in ascending schedule
    /// order, undated drafts last
    async fn list_posts(&self, user_id: Uuid) -> Result<Vec<Post>>;

    /// Delete a post and detach its bindings. Returns whether a row was
    /// removed; deleting a nonexistent id is a no-op success.
    async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool>;

    /// Bindings for one post
    async fn bindings_for_post(&self, user_id: Uuid, post_id: Uuid)
        -> Result<Vec<PlatformBinding>>;

    // ------------------------------------------------------------------
    // Social accounts
    // ------------------------------------------------------------------

    /// Record a newly connected account
    async fn connect_account(
        &self,
        user_id: Uuid,
        new_account: NewSocialAccount,
    ) -> Result<SocialAccount>;

    /// All of the user's accounts, newest first
    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<SocialAccount>>;

    /// Toggle an account active/inactive. Returns whether a row matched.
    async fn set_account_active(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        is_active: bool,
    ) -> Result<bool>;

    /// Disconnect an account. Returns whether a row was removed.
    async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> Result<bool>;

    // ------------------------------------------------------------------
    // Media
    // ------------------------------------------------------------------

    /// Record an uploaded media item
    async fn insert_media(&self, user_id: Uuid, new_media: NewMediaItem) -> Result<MediaItem>;

    /// All of the user's media, newest first
    async fn list_media(&self, user_id: Uuid) -> Result<Vec<MediaItem>>;

    /// Fetch one media item by id
    async fn get_media(&self, user_id: Uuid, media_id: Uuid) -> Result<Option<MediaItem>>;

    /// Delete a media row. Returns whether a row was removed.
    async fn delete_media(&self, user_id: Uuid, media_id: Uuid) -> Result<bool>;
}
