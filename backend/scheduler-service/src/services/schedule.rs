//! Date-bucketing for the calendar, queue, and dashboard counts.
//!
//! The calendar view, queue view, and dashboard badges all answer the same
//! question: which posts land on a given local calendar day? The original
//! implementation answered it three slightly different ways; this module is
//! the single shared answer. Everything here is pure: no I/O, no persistent
//! state, cheap enough to call once per request for the tens-to-hundreds of
//! posts a user holds.

use crate::models::{Post, PostStatus};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;

/// Widest UTC offset accepted from clients, in minutes (UTC-14:00..UTC+14:00).
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

/// Build the viewer's fixed offset from a minutes-east-of-UTC value.
/// Returns `None` for offsets outside the real-world range.
pub fn viewer_offset(minutes: i32) -> Option<FixedOffset> {
    if minutes.abs() > MAX_TZ_OFFSET_MINUTES {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

/// The local calendar day an instant falls on, for the given viewer offset.
pub fn local_day(at: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Posts whose schedule time falls on `day` in the viewer's local time.
///
/// Order-preserving relative to the input. Posts with no schedule time never
/// appear in any date bucket; they belong to the drafts bucket, which is a
/// status filter, not a date filter.
pub fn posts_on_date<'a>(posts: &'a [Post], day: NaiveDate, tz: FixedOffset) -> Vec<&'a Post> {
    posts
        .iter()
        .filter(|post| {
            post.scheduled_at
                .map(|at| local_day(at, tz) == day)
                .unwrap_or(false)
        })
        .collect()
}

/// How many posts are scheduled on `day`.
pub fn count_posts_on_date(posts: &[Post], day: NaiveDate, tz: FixedOffset) -> usize {
    posts_on_date(posts, day, tz).len()
}

/// Whether at least one post is scheduled on `day`. Agrees with
/// `count_posts_on_date` by construction; the calendar paints its badges
/// from both.
pub fn has_posts_on_date(posts: &[Post], day: NaiveDate, tz: FixedOffset) -> bool {
    count_posts_on_date(posts, day, tz) > 0
}

/// Undated drafts, order-preserving. Selected by status, independent of any
/// date filter.
pub fn drafts(posts: &[Post]) -> Vec<&Post> {
    posts
        .iter()
        .filter(|post| post.status == PostStatus::Draft)
        .collect()
}

/// Per-day post counts across the whole collection, for badge painting.
pub fn day_counts(posts: &[Post], tz: FixedOffset) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        if let Some(at) = post.scheduled_at {
            *counts.entry(local_day(at, tz)).or_insert(0) += 1;
        }
    }
    counts
}

/// Defensive parse of a client-supplied schedule timestamp.
///
/// Accepts RFC 3339 and a couple of naive layouts the original frontends
/// emitted (naive values are read as UTC). Anything else is `None`; a
/// malformed value must never raise past this boundary.
pub fn parse_schedule_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostBody;
    use chrono::Duration;
    use uuid::Uuid;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn post(scheduled_at: Option<DateTime<Utc>>) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            body: PostBody::Text {
                text: "post".to_string(),
            },
            link: None,
            status: PostStatus::for_new_post(scheduled_at.as_ref()),
            scheduled_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        parse_schedule_time(s).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn bucket_contains_post_iff_local_date_matches() {
        let posts = vec![
            post(Some(at("2024-06-01T09:00:00"))),
            post(Some(at("2024-06-01T23:59:59"))),
            post(Some(at("2024-06-02T00:00:00"))),
        ];

        let first = posts_on_date(&posts, day("2024-06-01"), utc());
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id, posts[0].id);
        assert_eq!(first[1].id, posts[1].id);

        let second = posts_on_date(&posts, day("2024-06-02"), utc());
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, posts[2].id);
    }

    #[test]
    fn undated_posts_never_bucket_and_land_in_drafts() {
        // Post A scheduled, post B undated.
        let posts = vec![post(Some(at("2024-06-01T09:00:00"))), post(None)];

        let bucket = posts_on_date(&posts, day("2024-06-01"), utc());
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].id, posts[0].id);

        assert!(posts_on_date(&posts, day("2024-06-02"), utc()).is_empty());
        assert!(posts_on_date(&posts, day("2024-05-31"), utc()).is_empty());

        let drafts = drafts(&posts);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, posts[1].id);
    }

    #[test]
    fn presence_and_count_agree_for_every_day() {
        let posts = vec![
            post(Some(at("2024-06-01T09:00:00"))),
            post(Some(at("2024-06-03T12:00:00"))),
            post(None),
        ];

        let mut probe = day("2024-05-28");
        for _ in 0..10 {
            assert_eq!(
                has_posts_on_date(&posts, probe, utc()),
                count_posts_on_date(&posts, probe, utc()) > 0
            );
            probe = probe.succ_opt().unwrap();
        }
    }

    #[test]
    fn day_counts_agree_with_per_day_queries() {
        let posts = vec![
            post(Some(at("2024-06-01T09:00:00"))),
            post(Some(at("2024-06-01T10:00:00"))),
            post(Some(at("2024-06-05T08:00:00"))),
            post(None),
        ];

        let counts = day_counts(&posts, utc());
        assert_eq!(counts.len(), 2);
        for (d, n) in counts {
            assert_eq!(n, count_posts_on_date(&posts, d, utc()));
        }
    }

    #[test]
    fn viewer_offset_moves_posts_across_the_midnight_boundary() {
        // 23:30 UTC on June 1st is already June 2nd at UTC+2.
        let posts = vec![post(Some(at("2024-06-01T23:30:00")))];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        assert!(posts_on_date(&posts, day("2024-06-01"), plus_two).is_empty());
        assert_eq!(posts_on_date(&posts, day("2024-06-02"), plus_two).len(), 1);
        assert_eq!(posts_on_date(&posts, day("2024-06-01"), utc()).len(), 1);
    }

    #[test]
    fn bucketing_is_order_preserving() {
        let b = post(Some(at("2024-06-01T15:00:00")));
        let a = post(Some(at("2024-06-01T09:00:00")));
        let posts = vec![b.clone(), a.clone()];

        let bucket = posts_on_date(&posts, day("2024-06-01"), utc());
        assert_eq!(bucket[0].id, b.id);
        assert_eq!(bucket[1].id, a.id);
    }

    #[test]
    fn malformed_schedule_values_parse_to_none_without_panicking() {
        for garbage in [
            "",
            "  ",
            "not-a-date",
            "2024-13-40T99:99:99",
            "06/01/2024",
            "1717232400",
            "2024-06-01TT09:00",
        ] {
            assert_eq!(parse_schedule_time(garbage), None, "input: {garbage:?}");
        }
    }

    #[test]
    fn schedule_parser_accepts_rfc3339_and_naive_layouts() {
        assert_eq!(
            parse_schedule_time("2024-06-01T09:00:00Z"),
            Some(at("2024-06-01T09:00:00"))
        );
        assert_eq!(
            parse_schedule_time("2024-06-01T11:00:00+02:00"),
            Some(at("2024-06-01T09:00:00"))
        );
        assert!(parse_schedule_time("2024-06-01 09:00:00").is_some());
        assert!(parse_schedule_time("2024-06-01T09:00").is_some());
    }

    #[test]
    fn viewer_offset_rejects_unreal_offsets() {
        assert!(viewer_offset(0).is_some());
        assert!(viewer_offset(-480).is_some());
        assert!(viewer_offset(14 * 60).is_some());
        assert!(viewer_offset(15 * 60).is_none());
        assert!(viewer_offset(i32::MIN).is_none());
    }

    #[test]
    fn far_future_and_past_instants_do_not_panic() {
        let posts = vec![
            post(Some(DateTime::<Utc>::MAX_UTC - Duration::days(1))),
            post(Some(DateTime::<Utc>::MIN_UTC + Duration::days(1))),
        ];
        // Only exercising the conversion path; no bucket should match today.
        assert!(posts_on_date(&posts, Utc::now().date_naive(), utc()).is_empty());
    }
}
