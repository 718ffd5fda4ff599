//! The post registry: canonical operations over the submitted-post
//! collection inside a [`Document`].
//!
//! Pure synchronous functions; the engine calls them under its document lock
//! and follows every mutation with a store save. Clock values are passed in
//! by the caller so the daily-limit and ordering rules are testable without
//! real time.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use peerboost_types::document::Document;
use peerboost_types::post::{Category, Post, PostId};
use peerboost_types::user::UserId;

/// Bounded per-category view of recent posts, keyed in display order.
/// Categories without posts are omitted.
pub type Feed = BTreeMap<Category, Vec<Post>>;

/// Whether the user may submit a post today.
///
/// True if the user has never posted, or if their most recent post (by
/// allocation order) was created on a UTC calendar date strictly before
/// `today`. A post whose timestamp was lost to corruption never blocks its
/// author.
pub fn can_submit(doc: &Document, user: UserId, today: NaiveDate) -> bool {
    let latest = doc
        .posts
        .iter()
        .filter(|post| post.author_id == user)
        .max_by_key(|post| post.id);

    match latest.and_then(|post| post.created_at) {
        Some(created_at) => created_at.date_naive() < today,
        None => true,
    }
}

/// Append a new post, consuming the next allocator id.
///
/// Does NOT check `can_submit`; the engine performs check-then-allocate
/// inside a single critical section so two concurrent submissions from the
/// same user cannot both pass the daily check.
pub fn allocate_post(
    doc: &mut Document,
    author_id: UserId,
    category: Category,
    title: String,
    url: String,
    now: DateTime<Utc>,
) -> Post {
    let post = Post {
        id: PostId(doc.next_post_id),
        author_id,
        category,
        title,
        url,
        created_at: Some(now),
    };
    doc.next_post_id += 1;
    doc.posts.push(post.clone());
    post
}

/// Remove the post with the given id. Returns whether anything was removed.
pub fn delete_post(doc: &mut Document, id: PostId) -> bool {
    let before = doc.posts.len();
    doc.posts.retain(|post| post.id != id);
    doc.posts.len() != before
}

/// Clear the entire post collection. Returns the prior count.
///
/// The allocator is left untouched: ids are never reused.
pub fn clear_posts(doc: &mut Document) -> usize {
    let count = doc.posts.len();
    doc.posts.clear();
    count
}

/// Build the reciprocation feed: per category, the newest posts first,
/// truncated to `limit_per_category`.
///
/// When `max_total` is set and the summed count exceeds it, each category's
/// slice is shrunk by the ratio `max_total / total`, rounding down but
/// keeping at least one post per non-empty category.
pub fn recent_feed(doc: &Document, limit_per_category: usize, max_total: Option<usize>) -> Feed {
    let mut feed = Feed::new();
    for category in Category::ALL {
        let mut posts: Vec<Post> = doc
            .posts
            .iter()
            .filter(|post| post.category == category)
            .cloned()
            .collect();
        // Newest first; posts without a timestamp sort oldest. Id breaks
        // ties so the ordering is total.
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(limit_per_category);
        if !posts.is_empty() {
            feed.insert(category, posts);
        }
    }

    if let Some(cap) = max_total {
        let total: usize = feed.values().map(Vec::len).sum();
        if total > cap {
            for posts in feed.values_mut() {
                let keep = (posts.len() * cap / total).max(1);
                posts.truncate(keep);
            }
        }
    }

    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    fn submit(doc: &mut Document, user: i64, category: Category, at: DateTime<Utc>) -> Post {
        allocate_post(
            doc,
            UserId(user),
            category,
            format!("post by {user}"),
            "https://example.com".to_string(),
            at,
        )
    }

    #[test]
    fn test_can_submit_with_no_posts() {
        let doc = Document::default();
        assert!(can_submit(&doc, UserId(1), ts(10, 0).date_naive()));
    }

    #[test]
    fn test_can_submit_false_same_day_true_next_day() {
        let mut doc = Document::default();
        submit(&mut doc, 1, Category::Technology, ts(10, 9));

        // Later the same UTC day: blocked.
        assert!(!can_submit(&doc, UserId(1), ts(10, 23).date_naive()));
        // Next UTC day: allowed again.
        assert!(can_submit(&doc, UserId(1), ts(11, 0).date_naive()));
        // Other users are unaffected.
        assert!(can_submit(&doc, UserId(2), ts(10, 23).date_naive()));
    }

    #[test]
    fn test_can_submit_permissive_on_missing_timestamp() {
        let mut doc = Document::default();
        let post = submit(&mut doc, 1, Category::Life, ts(10, 9));
        doc.posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .unwrap()
            .created_at = None;

        assert!(can_submit(&doc, UserId(1), ts(10, 9).date_naive()));
    }

    #[test]
    fn test_ids_monotonic_and_never_reused() {
        let mut doc = Document::default();
        let a = submit(&mut doc, 1, Category::Money, ts(1, 0));
        let b = submit(&mut doc, 2, Category::Money, ts(2, 0));
        let c = submit(&mut doc, 3, Category::Money, ts(3, 0));
        assert_eq!((a.id, b.id, c.id), (PostId(1), PostId(2), PostId(3)));

        assert!(delete_post(&mut doc, PostId(3)));
        let d = submit(&mut doc, 4, Category::Money, ts(4, 0));
        assert_eq!(d.id, PostId(4));
        assert!(doc.allocator_consistent());
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let mut doc = Document::default();
        assert!(!delete_post(&mut doc, PostId(99)));
    }

    #[test]
    fn test_clear_posts_returns_prior_count_and_keeps_allocator() {
        let mut doc = Document::default();
        submit(&mut doc, 1, Category::Media, ts(1, 0));
        submit(&mut doc, 2, Category::Media, ts(2, 0));

        assert_eq!(clear_posts(&mut doc), 2);
        assert!(doc.posts.is_empty());
        assert_eq!(doc.next_post_id, 3);
    }

    #[test]
    fn test_feed_limit_and_ordering() {
        let mut doc = Document::default();
        for day in 1..=8 {
            submit(&mut doc, i64::from(day), Category::Science, ts(day, 12));
        }
        submit(&mut doc, 99, Category::Life, ts(4, 0));

        let feed = recent_feed(&doc, 5, None);
        let science = &feed[&Category::Science];
        assert_eq!(science.len(), 5);
        // Newest first: days 8 down to 4.
        let days: Vec<u32> = science
            .iter()
            .map(|p| {
                use chrono::Datelike;
                p.created_at.unwrap().day()
            })
            .collect();
        assert_eq!(days, vec![8, 7, 6, 5, 4]);

        assert_eq!(feed[&Category::Life].len(), 1);
        // Categories with no posts are omitted entirely.
        assert!(!feed.contains_key(&Category::Money));
    }

    #[test]
    fn test_feed_posts_without_timestamp_sort_oldest() {
        let mut doc = Document::default();
        let stale = submit(&mut doc, 1, Category::Culture, ts(1, 0));
        doc.posts
            .iter_mut()
            .find(|p| p.id == stale.id)
            .unwrap()
            .created_at = None;
        let fresh = submit(&mut doc, 2, Category::Culture, ts(2, 0));

        let feed = recent_feed(&doc, 5, None);
        let culture = &feed[&Category::Culture];
        assert_eq!(culture[0].id, fresh.id);
        assert_eq!(culture[1].id, stale.id);
    }

    #[test]
    fn test_feed_total_cap_shrinks_proportionally() {
        let mut doc = Document::default();
        // 5 posts in each of 4 categories = 20 total.
        for category in [
            Category::Technology,
            Category::Money,
            Category::Media,
            Category::Personal,
        ] {
            for day in 1..=5 {
                submit(&mut doc, i64::from(day), category, ts(day, 0));
            }
        }

        let feed = recent_feed(&doc, 5, Some(10));
        // floor(5 * 10 / 20) = 2 per category.
        for posts in feed.values() {
            assert_eq!(posts.len(), 2);
        }
        let total: usize = feed.values().map(Vec::len).sum();
        assert!(total <= 10);
    }

    #[test]
    fn test_feed_total_cap_keeps_at_least_one_per_category() {
        let mut doc = Document::default();
        for (i, category) in Category::ALL.iter().enumerate() {
            submit(&mut doc, i as i64, *category, ts(1 + i as u32, 0));
        }

        // 7 singleton categories against a cap of 3: the floor would drop
        // whole categories, so each keeps its one post instead.
        let feed = recent_feed(&doc, 5, Some(3));
        assert_eq!(feed.len(), 7);
        for posts in feed.values() {
            assert_eq!(posts.len(), 1);
        }
    }
}
