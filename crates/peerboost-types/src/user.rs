use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a user, wrapping the opaque numeric id supplied by
/// the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Create a UserId from a raw platform id.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A known user of the promotion hub.
///
/// Created on first interaction, touched (display name + last-active
/// timestamp) on every interaction, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Platform display name, absent when the platform supplies none.
    pub display_name: Option<String>,
    pub last_active_at: DateTime<Utc>,
}

impl User {
    /// Create a user record active as of `now`.
    pub fn new(id: UserId, display_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            display_name,
            last_active_at: now,
        }
    }

    /// Refresh the display name and last-active timestamp.
    pub fn touch(&mut self, display_name: Option<String>, now: DateTime<Utc>) {
        if display_name.is_some() {
            self.display_name = display_name;
        }
        self.last_active_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.to_string(), "42");
        let parsed: UserId = "42".parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_user_id_serde_transparent() {
        let id = UserId::new(123456789);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123456789");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_touch_keeps_name_when_none_given() {
        let now = Utc::now();
        let mut user = User::new(UserId::new(1), Some("ada".to_string()), now);

        user.touch(None, now);
        assert_eq!(user.display_name.as_deref(), Some("ada"));

        user.touch(Some("ada_l".to_string()), now);
        assert_eq!(user.display_name.as_deref(), Some("ada_l"));
    }
}
