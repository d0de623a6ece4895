//! Editor-wide configuration, optionally loaded from a TOML file and
//! falling back to defaults on any error (the corpus's
//! `editor::config::FiletypeConfig::new` fallback pattern).

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spaces per tab stop.
    pub tabstop: u8,
    /// Milliseconds within which consecutive inserts/deletes coalesce, both
    /// in the piece table's add-buffer and in the undo log.
    pub coalesce_threshold_ms: u64,
    /// Undo stack eviction bound.
    pub max_undo_entries: usize,
    pub line_numbers: bool,
    /// Size of the per-view block-comment-state and line-analysis caches.
    pub comment_cache_lines: usize,
    /// Size of the per-view line-width cache.
    pub line_width_cache_lines: usize,
    /// Files above this size refuse to load via the normal path.
    pub big_file_threshold_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tabstop: 8,
            coalesce_threshold_ms: 300,
            max_undo_entries: 1000,
            line_numbers: true,
            comment_cache_lines: 64,
            line_width_cache_lines: 128,
            big_file_threshold_bytes: 100 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to [`Config::default`] and logging a
    /// warning on any error (missing file, bad TOML, unknown fields).
    pub fn load(path: &Path) -> Config {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("failed to load configuration from {path:?}, using defaults: {e}");
                Config::default()
            }
        }
    }

    fn try_load(path: &Path) -> anyhow::Result<Config> {
        let builder = config::Config::builder().add_source(config::File::from(path));
        let config = builder.build()?.try_deserialize::<Config>()?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = Config::load(Path::new("/nonexistent/scriv-config-test.toml"));
        assert_eq!(config.tabstop, 8);
        assert_eq!(config.max_undo_entries, 1000);
    }
}
