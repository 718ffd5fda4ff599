//! Engine configuration.
//!
//! Loaded from `{data_dir}/config.toml` by the infra layer; every field has
//! a default so a missing or partial file still yields a working engine.

use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Default per-category feed size.
pub const DEFAULT_FEED_LIMIT: usize = 5;

/// Default cap on the total number of posts across all feed categories.
pub const DEFAULT_FEED_MAX_TOTAL: usize = 50;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubConfig {
    /// File name of the persisted document, relative to the data directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// User ids permitted to run moderation operations from chat.
    #[serde(default)]
    pub admin_ids: Vec<UserId>,

    /// Maximum posts shown per category in the reciprocation feed.
    #[serde(default = "default_feed_limit")]
    pub feed_limit_per_category: usize,

    /// Cap on the summed feed size across categories; 0 disables the cap.
    #[serde(default = "default_feed_max_total")]
    pub feed_max_total: usize,
}

fn default_data_file() -> String {
    "hub.json".to_string()
}

fn default_feed_limit() -> usize {
    DEFAULT_FEED_LIMIT
}

fn default_feed_max_total() -> usize {
    DEFAULT_FEED_MAX_TOTAL
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            admin_ids: Vec::new(),
            feed_limit_per_category: default_feed_limit(),
            feed_max_total: default_feed_max_total(),
        }
    }
}

impl HubConfig {
    /// The total-size cap as an option: `None` when disabled.
    pub fn feed_max_total_opt(&self) -> Option<usize> {
        (self.feed_max_total > 0).then_some(self.feed_max_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.data_file, "hub.json");
        assert!(config.admin_ids.is_empty());
        assert_eq!(config.feed_limit_per_category, 5);
        assert_eq!(config.feed_max_total, 50);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: HubConfig = toml::from_str("admin_ids = [42, 99]").unwrap();
        assert_eq!(config.admin_ids, vec![UserId(42), UserId(99)]);
        assert_eq!(config.feed_limit_per_category, 5);
        assert_eq!(config.data_file, "hub.json");
    }

    #[test]
    fn test_zero_cap_disables_total_limit() {
        let config: HubConfig = toml::from_str("feed_max_total = 0").unwrap();
        assert_eq!(config.feed_max_total_opt(), None);

        let config = HubConfig::default();
        assert_eq!(config.feed_max_total_opt(), Some(50));
    }
}
