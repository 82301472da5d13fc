/// Calendar handlers - day buckets and month summaries
///
/// Both endpoints read the caller's full post collection and run the pure
/// bucketing functions over it; the calendar, queue, and dashboard all see
/// the same grouping because there is only one implementation of it.
use crate::db::StoreHandle;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::schedule;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    /// Target calendar date, `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Viewer's UTC offset in minutes east; 0 when absent
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

/// Posts scheduled on one local calendar day.
pub async fn day(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse> {
    let tz = schedule::viewer_offset(query.tz_offset_minutes)
        .ok_or_else(|| AppError::Validation("Invalid tz_offset_minutes".to_string()))?;

    let posts = store.list_posts(user_id.0).await?;
    let bucket = schedule::posts_on_date(&posts, query.date, tz);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "date": query.date,
        "count": bucket.len(),
        "posts": bucket,
    })))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

#[derive(Debug, serde::Serialize)]
struct DayBadge {
    date: NaiveDate,
    count: usize,
    has_posts: bool,
}

/// Per-day counts for one month, used to paint calendar badges, plus the
/// undated drafts bucket for the dashboard cards.
pub async fn summary(
    store: web::Data<StoreHandle>,
    user_id: UserId,
    query: web::Query<SummaryQuery>,
) -> Result<HttpResponse> {
    let tz = schedule::viewer_offset(query.tz_offset_minutes)
        .ok_or_else(|| AppError::Validation("Invalid tz_offset_minutes".to_string()))?;

    let first = NaiveDate::from_ymd_opt(query.year, query.month, 1)
        .ok_or_else(|| AppError::Validation("Invalid year/month".to_string()))?;

    let posts = store.list_posts(user_id.0).await?;

    let mut days = Vec::new();
    let mut cursor = first;
    while cursor.month() == query.month {
        days.push(DayBadge {
            date: cursor,
            count: schedule::count_posts_on_date(&posts, cursor, tz),
            has_posts: schedule::has_posts_on_date(&posts, cursor, tz),
        });
        cursor = match cursor.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "year": query.year,
        "month": query.month,
        "days": days,
        "draft_count": schedule::drafts(&posts).len(),
    })))
}
