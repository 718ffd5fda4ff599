//! The persisted root aggregate.
//!
//! Everything the engine needs to survive a restart lives in one
//! [`Document`]: the post collection, the user table, the session table, and
//! the post id allocator. The whole document is replaced atomically on every
//! committed mutation.
//!
//! Loading is tolerant: unknown fields are ignored, missing fields take
//! defaults, and a session entry that no longer deserializes (for example an
//! `awaiting_title` entry persisted without its category by an older build)
//! degrades to `start` instead of poisoning the rest of the document.

use serde::{Deserialize, Deserializer, Serialize};

use std::collections::HashMap;

use crate::post::{Post, PostId};
use crate::session::SessionState;
use crate::user::{User, UserId};

/// Aggregate of all durable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub users: HashMap<UserId, User>,
    #[serde(default, deserialize_with = "lenient_sessions")]
    pub sessions: HashMap<UserId, SessionState>,
    /// Next post id to allocate. Strictly greater than every stored post id;
    /// never decremented or reused, so deletions leave gaps.
    #[serde(default = "default_next_post_id")]
    pub next_post_id: u64,
}

fn default_next_post_id() -> u64 {
    1
}

impl Default for Document {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            users: HashMap::new(),
            sessions: HashMap::new(),
            next_post_id: default_next_post_id(),
        }
    }
}

impl Document {
    /// Whether the allocator invariant holds: `next_post_id` exceeds every
    /// stored post id.
    pub fn allocator_consistent(&self) -> bool {
        self.posts.iter().all(|p| p.id < PostId(self.next_post_id))
    }
}

/// Deserialize the session table entry by entry, replacing entries that fail
/// to parse with `SessionState::Start` (forced reset on corrupt state).
fn lenient_sessions<'de, D>(deserializer: D) -> Result<HashMap<UserId, SessionState>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<UserId, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(user_id, value)| {
            let state = serde_json::from_value(value).unwrap_or_default();
            (user_id, state)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Category;
    use chrono::Utc;

    #[test]
    fn test_empty_json_yields_default() {
        let doc: Document = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, Document::default());
        assert_eq!(doc.next_post_id, 1);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc: Document =
            serde_json::from_str(r#"{"next_post_id": 4, "schema_hint": "v2"}"#).unwrap();
        assert_eq!(doc.next_post_id, 4);
    }

    #[test]
    fn test_corrupt_session_entry_degrades_to_start() {
        let json = r#"{
            "sessions": {
                "10": {"state": "awaiting_title"},
                "11": {"state": "awaiting_title", "category": "science"},
                "12": "garbage"
            }
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.sessions[&UserId(10)], SessionState::Start);
        assert_eq!(
            doc.sessions[&UserId(11)],
            SessionState::AwaitingTitle {
                category: Category::Science
            }
        );
        assert_eq!(doc.sessions[&UserId(12)], SessionState::Start);
    }

    #[test]
    fn test_roundtrip_is_identity() {
        let mut doc = Document::default();
        let now = Utc::now();
        doc.users
            .insert(UserId(1), User::new(UserId(1), Some("ada".into()), now));
        doc.sessions.insert(
            UserId(1),
            SessionState::AwaitingUrl {
                category: Category::Technology,
                title: "My Piece".to_string(),
            },
        );
        doc.posts.push(Post {
            id: PostId(1),
            author_id: UserId(1),
            category: Category::Technology,
            title: "My Piece".to_string(),
            url: "https://example.com/a".to_string(),
            created_at: Some(now),
        });
        doc.next_post_id = 2;

        let json = serde_json::to_string_pretty(&doc).unwrap();
        let reloaded: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_allocator_consistency() {
        let mut doc = Document::default();
        assert!(doc.allocator_consistent());

        doc.posts.push(Post {
            id: PostId(3),
            author_id: UserId(1),
            category: Category::Life,
            title: "t".to_string(),
            url: "https://example.com".to_string(),
            created_at: None,
        });
        assert!(!doc.allocator_consistent());
        doc.next_post_id = 4;
        assert!(doc.allocator_consistent());
    }
}
