use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::user::UserId;

/// Unique identifier for a submitted post.
///
/// Assigned by the registry from a monotonically increasing allocator;
/// never reused, even after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Fixed content categories a post is filed under.
///
/// The set is closed: the feed is grouped by these seven values and the
/// transport layer renders one button per variant. `Ord` gives the feed its
/// stable display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Money,
    Media,
    Personal,
    Culture,
    Science,
    Life,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::Technology,
        Category::Money,
        Category::Media,
        Category::Personal,
        Category::Culture,
        Category::Science,
        Category::Life,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Technology => write!(f, "technology"),
            Category::Money => write!(f, "money"),
            Category::Media => write!(f, "media"),
            Category::Personal => write!(f, "personal"),
            Category::Culture => write!(f, "culture"),
            Category::Science => write!(f, "science"),
            Category::Life => write!(f, "life"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technology" => Ok(Category::Technology),
            "money" => Ok(Category::Money),
            "media" => Ok(Category::Media),
            "personal" => Ok(Category::Personal),
            "culture" => Ok(Category::Culture),
            "science" => Ok(Category::Science),
            "life" => Ok(Category::Life),
            other => Err(format!("unknown category: '{other}'")),
        }
    }
}

/// A single submitted content item.
///
/// Immutable once created, except for admin deletion. Owned exclusively by
/// the registry inside the persisted [`Document`](crate::document::Document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub category: Category,
    /// Submission title, at most 50 characters.
    pub title: String,
    /// Absolute http/https URL of the promoted content.
    pub url: String,
    /// UTC creation time. Loaded leniently: a missing or malformed value in
    /// the stored document becomes `None` instead of failing the load, and a
    /// post without a timestamp never blocks its author's daily submission.
    #[serde(default, with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Serde helpers for `Post::created_at`.
///
/// Serializes as a normal RFC 3339 timestamp (or null); deserializes any
/// unparseable value to `None`.
mod lenient_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| serde_json::from_value::<DateTime<Utc>>(value).ok()))
    }
}
