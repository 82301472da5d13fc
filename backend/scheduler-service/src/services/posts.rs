/// Post service - creation with platform binding assembly, listing, deletion
use crate::db::StoreHandle;
use crate::error::{AppError, Result};
use crate::models::{NewPost, Platform, PlatformBinding, Post, PostBody};
use uuid::Uuid;

/// Outcome of a post creation. `skipped_platforms` names requested platforms
/// for which no active account existed; the operation still succeeds with
/// those dropped, but callers get enough signal to surface it.
#[derive(Debug, serde::Serialize)]
pub struct PostCreation {
    pub post: Post,
    pub bindings: Vec<PlatformBinding>,
    pub skipped_platforms: Vec<Platform>,
}

pub struct PostService {
    store: StoreHandle,
}

impl PostService {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Create a post and bind it to the requested platforms.
    ///
    /// Content and platform selection are validated here; binding assembly
    /// itself runs inside the store so the post row and its bindings commit
    /// atomically. Requested platforms with no active account are skipped,
    /// logged, and reported back - not treated as an error.
    pub async fn create_post(
        &self,
        user_id: Uuid,
        new_post: NewPost,
        platforms: Vec<Platform>,
    ) -> Result<PostCreation> {
        match &new_post.body {
            PostBody::Text { text } => {
                if text.trim().is_empty() {
                    return Err(AppError::Validation("Content is required".to_string()));
                }
            }
            PostBody::Video { title, .. } => {
                if title.trim().is_empty() {
                    return Err(AppError::Validation("Title is required".to_string()));
                }
            }
        }

        if platforms.is_empty() {
            return Err(AppError::Validation(
                "At least one platform is required".to_string(),
            ));
        }

        let created = self
            .store
            .create_post(user_id, new_post, &platforms)
            .await?;

        let bound: Vec<Platform> = created.bindings.iter().map(|b| b.platform).collect();
        let skipped_platforms: Vec<Platform> = platforms
            .into_iter()
            .filter(|p| !bound.contains(p))
            .collect();

        for platform in &skipped_platforms {
            tracing::warn!(
                user_id = %user_id,
                post_id = %created.post.id,
                platform = %platform,
                "no active account for requested platform; binding skipped"
            );
        }

        Ok(PostCreation {
            post: created.post,
            bindings: created.bindings,
            skipped_platforms,
        })
    }

    /// The user's queue: scheduled posts in ascending schedule order, then
    /// undated drafts.
    pub async fn list_posts(&self, user_id: Uuid) -> Result<Vec<Post>> {
        Ok(self.store.list_posts(user_id).await?)
    }

    /// One post with its bindings.
    pub async fn get_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<(Post, Vec<PlatformBinding>)>> {
        let Some(post) = self.store.get_post(user_id, post_id).await? else {
            return Ok(None);
        };
        let bindings = self.store.bindings_for_post(user_id, post_id).await?;
        Ok(Some((post, bindings)))
    }

    /// Delete a post and its bindings. Deleting an id that no longer exists
    /// is a success; callers treat delete as fire-and-forget.
    pub async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        let deleted = self.store.delete_post(user_id, post_id).await?;
        if !deleted {
            tracing::debug!(%user_id, %post_id, "delete for nonexistent post ignored");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryContentStore;
    use crate::models::NewSocialAccount;
    use std::sync::Arc;

    fn service_with_store() -> (PostService, StoreHandle) {
        let store: StoreHandle = Arc::new(MemoryContentStore::new());
        (PostService::new(store.clone()), store)
    }

    fn text(text: &str) -> NewPost {
        NewPost {
            body: PostBody::Text {
                text: text.to_string(),
            },
            link: None,
            scheduled_at: None,
        }
    }

    #[tokio::test]
    async fn create_rejects_empty_content() {
        let (service, _) = service_with_store();
        let err = service
            .create_post(Uuid::new_v4(), text("   "), vec![Platform::Twitter])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_empty_platform_selection() {
        let (service, _) = service_with_store();
        let err = service
            .create_post(Uuid::new_v4(), text("hello"), vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_reports_platforms_skipped_for_inactive_accounts() {
        let (service, store) = service_with_store();
        let user = Uuid::new_v4();

        let twitter = store
            .connect_account(
                user,
                NewSocialAccount {
                    platform: Platform::Twitter,
                    account_name: "ours".to_string(),
                    external_id: "mock-twitter-1".to_string(),
                },
            )
            .await
            .unwrap();
        let linkedin = store
            .connect_account(
                user,
                NewSocialAccount {
                    platform: Platform::Linkedin,
                    account_name: "ours".to_string(),
                    external_id: "mock-linkedin-1".to_string(),
                },
            )
            .await
            .unwrap();
        store
            .set_account_active(user, linkedin.id, false)
            .await
            .unwrap();

        let creation = service
            .create_post(
                user,
                text("hello"),
                vec![Platform::Twitter, Platform::Linkedin],
            )
            .await
            .unwrap();

        assert_eq!(creation.bindings.len(), 1);
        assert_eq!(creation.bindings[0].social_account_id, twitter.id);
        assert_eq!(creation.skipped_platforms, vec![Platform::Linkedin]);
    }

    #[tokio::test]
    async fn delete_is_idempotent_at_the_service_boundary() {
        let (service, _) = service_with_store();
        let user = Uuid::new_v4();

        // Never created; must not error.
        assert!(!service.delete_post(user, Uuid::new_v4()).await.unwrap());
    }
}
