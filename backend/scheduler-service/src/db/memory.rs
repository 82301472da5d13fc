use crate::db::store::ContentStore;
use crate::models::{
    BindingStatus, CreatedPost, MediaItem, NewMediaItem, NewPost, NewSocialAccount, Platform,
    PlatformBinding, Post, PostStatus, SocialAccount,
};
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store. The original system stubbed its backend with in-memory
/// mocks; here that stub is a first-class [`ContentStore`] implementation
/// used by the test suite and the `memory` storage mode.
#[derive(Default)]
pub struct MemoryContentStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    posts: HashMap<Uuid, Post>,
    bindings: HashMap<Uuid, PlatformBinding>,
    accounts: HashMap<Uuid, SocialAccount>,
    media: HashMap<Uuid, MediaItem>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryContentStore {
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        new_post: NewPost,
        platforms: &[Platform],
    ) -> Result<CreatedPost> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            status: PostStatus::for_new_post(new_post.scheduled_at.as_ref()),
            body: new_post.body,
            link: new_post.link,
            scheduled_at: new_post.scheduled_at,
            created_at: now,
            updated_at: now,
        };

        // Single write lock: post insert and binding assembly are atomic.
        let mut inner = self.inner.write().await;

        let bindings: Vec<PlatformBinding> = inner
            .accounts
            .values()
            .filter(|a| a.user_id == user_id && a.is_active && platforms.contains(&a.platform))
            .map(|account| PlatformBinding {
                id: Uuid::new_v4(),
                post_id: post.id,
                social_account_id: account.id,
                platform: account.platform,
                status: BindingStatus::Pending,
                created_at: now,
            })
            .collect();

        inner.posts.insert(post.id, post.clone());
        for binding in &bindings {
            inner.bindings.insert(binding.id, binding.clone());
        }

        Ok(CreatedPost { post, bindings })
    }

    async fn get_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Post>> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .get(&post_id)
            .filter(|p| p.user_id == user_id)
            .cloned())
    }

    async fn list_posts(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();

        // Scheduled ascending, undated drafts last, newest drafts first.
        posts.sort_by(|a, b| match (a.scheduled_at, b.scheduled_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });

        Ok(posts)
    }

    async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .posts
            .get(&post_id)
            .map(|p| p.user_id == user_id)
            .unwrap_or(false);

        if !owned {
            return Ok(false);
        }

        inner.posts.remove(&post_id);
        inner.bindings.retain(|_, b| b.post_id != post_id);
        Ok(true)
    }

    async fn bindings_for_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Vec<PlatformBinding>> {
        let inner = self.inner.read().await;
        let owned = inner
            .posts
            .get(&post_id)
            .map(|p| p.user_id == user_id)
            .unwrap_or(false);

        if !owned {
            return Ok(Vec::new());
        }

        let mut bindings: Vec<PlatformBinding> = inner
            .bindings
            .values()
            .filter(|b| b.post_id == post_id)
            .cloned()
            .collect();
        bindings.sort_by_key(|b| b.created_at);
        Ok(bindings)
    }

    async fn connect_account(
        &self,
        user_id: Uuid,
        new_account: NewSocialAccount,
    ) -> Result<SocialAccount> {
        let account = SocialAccount {
            id: Uuid::new_v4(),
            user_id,
            platform: new_account.platform,
            account_name: new_account.account_name,
            external_id: new_account.external_id,
            is_active: true,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<SocialAccount>> {
        let inner = self.inner.read().await;
        let mut accounts: Vec<SocialAccount> = inner
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn set_account_active(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        is_active: bool,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.accounts.get_mut(&account_id) {
            Some(account) if account.user_id == user_id => {
                account.is_active = is_active;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .accounts
            .get(&account_id)
            .map(|a| a.user_id == user_id)
            .unwrap_or(false);

        if !owned {
            return Ok(false);
        }

        inner.accounts.remove(&account_id);
        Ok(true)
    }

    async fn insert_media(&self, user_id: Uuid, new_media: NewMediaItem) -> Result<MediaItem> {
        let media = MediaItem {
            id: Uuid::new_v4(),
            user_id,
            file_name: new_media.file_name,
            file_type: new_media.file_type,
            file_size: new_media.file_size,
            storage_key: new_media.storage_key,
            url: new_media.url,
            thumbnail_url: new_media.thumbnail_url,
            alt_text: new_media.alt_text,
            title: new_media.title,
            description: new_media.description,
            created_at: Utc::now(),
        };

        let mut inner = self.inner.write().await;
        inner.media.insert(media.id, media.clone());
        Ok(media)
    }

    async fn list_media(&self, user_id: Uuid) -> Result<Vec<MediaItem>> {
        let inner = self.inner.read().await;
        let mut media: Vec<MediaItem> = inner
            .media
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(media)
    }

    async fn get_media(&self, user_id: Uuid, media_id: Uuid) -> Result<Option<MediaItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .media
            .get(&media_id)
            .filter(|m| m.user_id == user_id)
            .cloned())
    }

    async fn delete_media(&self, user_id: Uuid, media_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let owned = inner
            .media
            .get(&media_id)
            .map(|m| m.user_id == user_id)
            .unwrap_or(false);

        if !owned {
            return Ok(false);
        }

        inner.media.remove(&media_id);
        Ok(true)
    }
}
