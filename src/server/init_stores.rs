//! Store initialization functions
//!
//! Opens the SQLite database shared by the painting and social stores.

use super::config::AppConfig;
use anyhow::{Context, Result};
use atelier_canvas::PaintingStore;
use atelier_social::SocialStore;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of store initialization
pub struct StoreBundle {
    pub social_store: SocialStore,
    pub painting_store: PaintingStore,
}

/// Data directory from config, falling back to `~/.atelier`
pub fn resolve_data_dir(config: &AppConfig) -> PathBuf {
    config
        .data_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(atelier_social::default_data_dir)
}

/// Initialize all data stores
pub async fn init_stores(data_dir: &Path) -> Result<StoreBundle> {
    let db_path = data_dir.join("atelier.db");
    let social_store = SocialStore::from_path(&db_path)
        .await
        .context("Failed to initialize SQLite social store")?;

    let painting_store = PaintingStore::new(social_store.pool().clone());
    painting_store
        .init()
        .await
        .context("Failed to initialize painting store")?;
    info!("SQLite painting store initialized at {}", db_path.display());

    Ok(StoreBundle {
        social_store,
        painting_store,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_data_dir_prefers_config() {
        let config = AppConfig {
            data_dir: Some("/tmp/atelier-test".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_data_dir(&config), PathBuf::from("/tmp/atelier-test"));

        let fallback = resolve_data_dir(&AppConfig::default());
        assert!(fallback.to_string_lossy().contains("atelier"));
    }
}
