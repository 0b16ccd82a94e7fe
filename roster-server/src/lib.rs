//! Roster HTTP service
//!
//! Wires configuration, storage and the review engine into an axum router.

pub mod api;

use std::sync::Arc;

use roster_core::{
    Backend, Config, MemoryStore, RandomSource, ReviewEngine, SeededRandom, Store, ThreadRandom,
};
use roster_db::{DatabaseConfig, SqliteStore};
use tracing::info;

pub use api::{router, AppState};

/// Open the configured store and build an engine on top of it
pub async fn build_engine(config: &Config) -> anyhow::Result<ReviewEngine> {
    let store: Arc<dyn Store> = match config.database.backend {
        Backend::Sqlite => {
            let store = SqliteStore::open(DatabaseConfig::from(&config.database)).await?;
            Arc::new(store)
        }
        Backend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let rng: Arc<dyn RandomSource> = match config.assignment.seed {
        Some(seed) => {
            info!(seed, "Using seeded reviewer selection");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRandom),
    };

    Ok(ReviewEngine::new(store, rng, config.assignment.policy.clone()))
}
