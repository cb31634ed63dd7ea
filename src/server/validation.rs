//! Configuration validation
//!
//! Rejects settings that would only fail later, at the first canvas session
//! or the first sweep of idle sessions.

use super::config::AppConfig;
use anyhow::{ensure, Context, Result};
use atelier_canvas::Compositor;
use tracing::warn;

/// Validate a deserialized configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let canvas = &config.canvas;
    Compositor::with_settings(canvas.settings()).with_context(|| {
        format!(
            "invalid [canvas] size {}x{} (max_dimension {})",
            canvas.width, canvas.height, canvas.max_dimension
        )
    })?;
    ensure!(
        canvas.max_sessions_per_user > 0,
        "[canvas] max_sessions_per_user must be at least 1"
    );
    ensure!(
        canvas.cleanup_interval_secs > 0,
        "[canvas] cleanup_interval_secs must be at least 1"
    );

    let suggestions = &config.suggestions;
    if suggestions.limit == 0 {
        warn!("[suggestions] limit is 0, no suggestions will be returned");
    }
    if suggestions.like_window == 0 && suggestions.bookmark_window == 0 {
        warn!("[suggestions] both windows are 0, no interests will be found");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_canvas_larger_than_max_dimension_rejected() {
        let mut config = AppConfig::default();
        config.canvas.width = 5000;
        config.canvas.max_dimension = 4096;

        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("5000x800"));
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let mut config = AppConfig::default();
        config.canvas.cleanup_interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
