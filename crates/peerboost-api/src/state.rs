//! Application state wiring the engine to its infrastructure.
//!
//! The engine is generic over the store and oracle ports; AppState pins it
//! to the JSON file store and the always-admitting oracle (the CLI is a
//! local operator tool -- channel membership is a chat-side concern).

use std::path::PathBuf;
use std::sync::Arc;

use peerboost_core::engine::{Engine, EngineOptions};
use peerboost_core::subscription::AlwaysSubscribed;
use peerboost_infra::config::{load_config, resolve_data_dir};
use peerboost_infra::json_store::JsonDocumentStore;
use peerboost_types::config::HubConfig;

/// Engine pinned to the concrete infra implementations.
pub type ConcreteEngine = Engine<JsonDocumentStore, AlwaysSubscribed>;

/// Shared application state for CLI commands.
pub struct AppState {
    pub engine: Arc<ConcreteEngine>,
    pub config: HubConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config, open the document store.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;
        let store = JsonDocumentStore::new(data_dir.join(&config.data_file));
        let engine = Engine::open(store, AlwaysSubscribed, EngineOptions::from(&config)).await;

        Ok(Self {
            engine: Arc::new(engine),
            config,
            data_dir,
        })
    }
}
