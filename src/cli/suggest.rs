//! `atelier suggest` - print suggestions for a user

use anyhow::{Context, Result};
use atelier_social::SuggestionEngine;

use crate::server::{init_stores, load_config, resolve_data_dir};

/// Compute and print suggestions as pretty JSON
pub async fn run(user_id: &str) -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;
    let stores = init_stores(&resolve_data_dir(&config)).await?;

    let engine = SuggestionEngine::with_config(stores.social_store, config.suggestions);
    let users = engine
        .get_suggestions(user_id)
        .await
        .with_context(|| format!("Failed to compute suggestions for {user_id}"))?;

    println!("{}", serde_json::to_string_pretty(&users)?);
    Ok(())
}
