//! Configuration loader for Peerboost.
//!
//! Reads `config.toml` from the data directory (`~/.peerboost/` in
//! production) and deserializes it into [`HubConfig`]. Falls back to
//! defaults when the file is missing or malformed -- the engine must come
//! up regardless.

use std::path::{Path, PathBuf};

use peerboost_types::config::HubConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`HubConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(data_dir: &Path) -> HubConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return HubConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return HubConfig::default();
        }
    };

    match toml::from_str::<HubConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            HubConfig::default()
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PEERBOOST_DATA_DIR` environment variable
/// 2. Platform home directory (`~/.peerboost`)
/// 3. Current directory fallback (`.peerboost`)
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PEERBOOST_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".peerboost");
    }

    PathBuf::from(".peerboost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use peerboost_types::user::UserId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, HubConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
data_file = "promo.json"
admin_ids = [7, 99]
feed_limit_per_category = 3
feed_max_total = 20
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.data_file, "promo.json");
        assert_eq!(config.admin_ids, vec![UserId(7), UserId(99)]);
        assert_eq!(config.feed_limit_per_category, 3);
        assert_eq!(config.feed_max_total, 20);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, HubConfig::default());
    }

    #[test]
    fn resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var("PEERBOOST_DATA_DIR", "/tmp/test-peerboost");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-peerboost"));
        unsafe {
            std::env::remove_var("PEERBOOST_DATA_DIR");
        }
    }
}
