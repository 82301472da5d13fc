use crate::db::store::ContentStore;
use crate::models::{
    BindingStatus, CreatedPost, MediaItem, NewMediaItem, NewPost, NewSocialAccount, Platform,
    PlatformBinding, Post, PostBody, PostStatus, SocialAccount,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL store (source of truth in deployed environments)
#[derive(Clone)]
pub struct PostgresContentStore {
    pool: PgPool,
}

/// Row shape for posts; the body column is JSONB holding the tagged
/// [`PostBody`] value.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    body: Json<PostBody>,
    link: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    status: PostStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user_id: row.user_id,
            body: row.body.0,
            link: row.link,
            scheduled_at: row.scheduled_at,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl PostgresContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run pending migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for PostgresContentStore {
    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("PostgreSQL health check failed")?;
        Ok(())
    }

    async fn create_post(
        &self,
        user_id: Uuid,
        new_post: NewPost,
        platforms: &[Platform],
    ) -> Result<CreatedPost> {
        let status = PostStatus::for_new_post(new_post.scheduled_at.as_ref());
        let now = Utc::now();

        // Post insert and binding assembly commit or roll back together.
        let mut tx = self.pool.begin().await?;

        let post: PostRow = sqlx::query_as(
            r#"
            INSERT INTO posts (id, user_id, body, link, scheduled_at, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING id, user_id, body, link, scheduled_at, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Json(&new_post.body))
        .bind(&new_post.link)
        .bind(new_post.scheduled_at)
        .bind(status)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert post")?;

        // Only active accounts are bound; inactive matches are skipped.
        let accounts: Vec<SocialAccount> = sqlx::query_as(
            r#"
            SELECT id, user_id, platform, account_name, external_id, is_active, created_at
            FROM social_accounts
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to resolve social accounts")?;

        let mut bindings = Vec::new();
        for account in accounts
            .iter()
            .filter(|a| platforms.contains(&a.platform))
        {
            let binding: PlatformBinding = sqlx::query_as(
                r#"
                INSERT INTO post_platforms (id, post_id, social_account_id, platform, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, post_id, social_account_id, platform, status, created_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(post.id)
            .bind(account.id)
            .bind(account.platform)
            .bind(BindingStatus::Pending)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to insert platform binding")?;
            bindings.push(binding);
        }

        tx.commit().await?;

        Ok(CreatedPost {
            post: post.into(),
            bindings,
        })
    }

    async fn get_post(&self, user_id: Uuid, post_id: Uuid) -> Result<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, body, link, scheduled_at, status, created_at, updated_at
            FROM posts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch post")?;

        Ok(row.map(Post::from))
    }

    async fn list_posts(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, body, link, scheduled_at, status, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY scheduled_at ASC NULLS LAST, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn delete_post(&self, user_id: Uuid, post_id: Uuid) -> Result<bool> {
        // Bindings go with the post via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected() > 0)
    }

    async fn bindings_for_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Vec<PlatformBinding>> {
        let bindings = sqlx::query_as::<_, PlatformBinding>(
            r#"
            SELECT b.id, b.post_id, b.social_account_id, b.platform, b.status, b.created_at
            FROM post_platforms b
            JOIN posts p ON p.id = b.post_id
            WHERE b.post_id = $1 AND p.user_id = $2
            ORDER BY b.created_at ASC
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch platform bindings")?;

        Ok(bindings)
    }

    async fn connect_account(
        &self,
        user_id: Uuid,
        new_account: NewSocialAccount,
    ) -> Result<SocialAccount> {
        let account = sqlx::query_as::<_, SocialAccount>(
            r#"
            INSERT INTO social_accounts
                (id, user_id, platform, account_name, external_id, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING id, user_id, platform, account_name, external_id, is_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(new_account.platform)
        .bind(&new_account.account_name)
        .bind(&new_account.external_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert social account")?;

        Ok(account)
    }

    async fn list_accounts(&self, user_id: Uuid) -> Result<Vec<SocialAccount>> {
        let accounts = sqlx::query_as::<_, SocialAccount>(
            r#"
            SELECT id, user_id, platform, account_name, external_id, is_active, created_at
            FROM social_accounts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list social accounts")?;

        Ok(accounts)
    }

    async fn set_account_active(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        is_active: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE social_accounts SET is_active = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(is_active)
        .bind(account_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .context("Failed to update social account")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_account(&self, user_id: Uuid, account_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM social_accounts WHERE id = $1 AND user_id = $2")
            .bind(account_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete social account")?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_media(&self, user_id: Uuid, new_media: NewMediaItem) -> Result<MediaItem> {
        let media = sqlx::query_as::<_, MediaItem>(
            r#"
            INSERT INTO media
                (id, user_id, file_name, file_type, file_size, storage_key, url,
                 thumbnail_url, alt_text, title, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, user_id, file_name, file_type, file_size, storage_key, url,
                      thumbnail_url, alt_text, title, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new_media.file_name)
        .bind(&new_media.file_type)
        .bind(new_media.file_size)
        .bind(&new_media.storage_key)
        .bind(&new_media.url)
        .bind(&new_media.thumbnail_url)
        .bind(&new_media.alt_text)
        .bind(&new_media.title)
        .bind(&new_media.description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert media item")?;

        Ok(media)
    }

    async fn list_media(&self, user_id: Uuid) -> Result<Vec<MediaItem>> {
        let media = sqlx::query_as::<_, MediaItem>(
            r#"
            SELECT id, user_id, file_name, file_type, file_size, storage_key, url,
                   thumbnail_url, alt_text, title, description, created_at
            FROM media
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list media")?;

        Ok(media)
    }

    async fn get_media(&self, user_id: Uuid, media_id: Uuid) -> Result<Option<MediaItem>> {
        let media = sqlx::query_as::<_, MediaItem>(
            r#"
            SELECT id, user_id, file_name, file_type, file_size, storage_key, url,
                   thumbnail_url, alt_text, title, description, created_at
            FROM media
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(media_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch media item")?;

        Ok(media)
    }

    async fn delete_media(&self, user_id: Uuid, media_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1 AND user_id = $2")
            .bind(media_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete media item")?;

        Ok(result.rows_affected() > 0)
    }
}
