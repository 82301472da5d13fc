/// Data models for scheduler-service
///
/// This module defines structures for:
/// - Post: a piece of content queued for multi-platform distribution
/// - PlatformBinding: join entity linking a post to a connected account
/// - SocialAccount: a user's connection to an external platform
/// - MediaItem: an uploaded file stored in object storage
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported social networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "platform", rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
    Youtube,
    Tiktok,
    Linkedin,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Twitter,
        Platform::Facebook,
        Platform::Instagram,
        Platform::Youtube,
        Platform::Tiktok,
        Platform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
            Platform::Linkedin => "linkedin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(Platform::Twitter),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            "linkedin" => Ok(Platform::Linkedin),
            _ => Err(()),
        }
    }
}

/// Post lifecycle state.
///
/// `Published` and `Failed` are declared states with no producing transition
/// in this service; they only become reachable once a background publisher
/// exists, which is out of scope here. The creation-time choice between
/// `Draft` and `Scheduled` is the only implemented transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
    Failed,
}

impl PostStatus {
    /// Status assigned at creation: `Scheduled` when a schedule time is
    /// supplied, `Draft` otherwise. Irrevocable at this layer.
    pub fn for_new_post(scheduled_at: Option<&DateTime<Utc>>) -> Self {
        match scheduled_at {
            Some(_) => PostStatus::Scheduled,
            None => PostStatus::Draft,
        }
    }
}

/// Per-binding publication state. Bindings start `Pending`; nothing in this
/// service advances them further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "binding_status", rename_all = "lowercase")]
pub enum BindingStatus {
    Pending,
    Published,
    Failed,
}

/// Post content, discriminated explicitly instead of an untyped metadata bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostBody {
    Text {
        text: String,
    },
    Video {
        title: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        tags: Vec<String>,
        media_id: Uuid,
    },
}

impl PostBody {
    /// Display text for listings: the text body, or the video title.
    pub fn content(&self) -> &str {
        match self {
            PostBody::Text { text } => text,
            PostBody::Video { title, .. } => title,
        }
    }
}

/// Post entity - one piece of content with its scheduling timestamp and status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub body: PostBody,
    pub link: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PlatformBinding entity - joins a post to one connected social account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlatformBinding {
    pub id: Uuid,
    pub post_id: Uuid,
    pub social_account_id: Uuid,
    pub platform: Platform,
    pub status: BindingStatus,
    pub created_at: DateTime<Utc>,
}

/// SocialAccount entity - a user's connection to an external platform.
/// No real OAuth handshake occurs; `external_id` is synthesized at connect.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SocialAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub account_name: String,
    pub external_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// MediaItem entity - an uploaded file and the object-storage location backing it
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MediaItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub alt_text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for post creation, before ids and timestamps are assigned.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub body: PostBody,
    pub link: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Input for connecting a social account.
#[derive(Debug, Clone)]
pub struct NewSocialAccount {
    pub platform: Platform,
    pub account_name: String,
    pub external_id: String,
}

/// Input for recording an uploaded media item.
#[derive(Debug, Clone)]
pub struct NewMediaItem {
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub storage_key: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub alt_text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Result of an atomic post creation: the post row plus the bindings that
/// were assembled for it in the same transaction.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPost {
    pub post: Post,
    pub bindings: Vec<PlatformBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_at_creation_without_schedule_is_draft() {
        assert_eq!(PostStatus::for_new_post(None), PostStatus::Draft);
    }

    #[test]
    fn status_at_creation_with_schedule_is_scheduled() {
        let at = Utc::now();
        assert_eq!(
            PostStatus::for_new_post(Some(&at)),
            PostStatus::Scheduled
        );
    }

    #[test]
    fn platform_parses_all_supported_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
    }

    #[test]
    fn platform_rejects_unknown_names() {
        assert!("myspace".parse::<Platform>().is_err());
        assert!("Twitter".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn post_body_content_uses_title_for_video() {
        let body = PostBody::Video {
            title: "Launch teaser".to_string(),
            description: String::new(),
            tags: vec![],
            media_id: Uuid::new_v4(),
        };
        assert_eq!(body.content(), "Launch teaser");
    }

    #[test]
    fn post_body_round_trips_through_tagged_json() {
        let body = PostBody::Text {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "text");
        let back: PostBody = serde_json::from_value(json).unwrap();
        assert_eq!(back, body);
    }
}
