//! Composer configuration persistence
//!
//! Stores settings in `~/.config/tagline/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::caret::{CaretLocator, FontMetrics, GlyphMetrics, MirrorLocator, MonospaceMetrics};
use crate::trigger::MAX_QUERY_LEN;

/// Composer configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Longest query (chars after the trigger) that keeps a session open
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
    /// Maximum number of candidates requested per query
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default)]
    pub caret: CaretConfig,
    #[serde(default)]
    pub links: LinkConfig,
}

fn default_max_query_len() -> usize {
    MAX_QUERY_LEN
}

fn default_candidate_limit() -> usize {
    8
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_query_len: default_max_query_len(),
            candidate_limit: default_candidate_limit(),
            caret: CaretConfig::default(),
            links: LinkConfig::default(),
        }
    }
}

/// Field metrics used to measure the caret position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaretConfig {
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// Line height in px; derived from the font size when absent
    #[serde(default)]
    pub line_height: Option<f32>,
    #[serde(default)]
    pub padding_x: f32,
    #[serde(default)]
    pub padding_y: f32,
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// TrueType/OpenType font for proportional measurement
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

fn default_font_size() -> f32 {
    14.0
}

fn default_tab_width() -> usize {
    crate::caret::TABULATOR_WIDTH
}

impl Default for CaretConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            line_height: None,
            padding_x: 0.0,
            padding_y: 0.0,
            tab_width: default_tab_width(),
            font_path: None,
        }
    }
}

impl CaretConfig {
    /// Line height in px (1.6 x font size unless set)
    pub fn effective_line_height(&self) -> f32 {
        self.line_height.unwrap_or(self.font_size * 1.6)
    }

    /// Build a locator from these settings.
    ///
    /// Uses the configured font when it loads, otherwise falls back to
    /// monospace metrics at 0.6 em per glyph.
    pub fn locator(&self) -> Box<dyn CaretLocator> {
        if let Some(path) = &self.font_path {
            match FontMetrics::load(path, self.font_size) {
                Ok(metrics) => return Box::new(self.configure(metrics)),
                Err(e) => {
                    tracing::warn!("Falling back to monospace metrics: {}", e);
                }
            }
        }
        let metrics = MonospaceMetrics::new(self.font_size * 0.6, self.effective_line_height());
        Box::new(self.configure(metrics))
    }

    fn configure<M: GlyphMetrics + 'static>(&self, metrics: M) -> MirrorLocator<M> {
        MirrorLocator::new(metrics)
            .with_padding(self.padding_x, self.padding_y)
            .with_tab_width(self.tab_width)
            .with_line_height(self.effective_line_height())
    }
}

/// URL templates for resolved tokens. `{id}` and `{tag}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_mention_link")]
    pub mention: String,
    #[serde(default = "default_hashtag_link")]
    pub hashtag: String,
}

fn default_mention_link() -> String {
    "/users/{id}".to_string()
}

fn default_hashtag_link() -> String {
    "/hashtags/{tag}".to_string()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            mention: default_mention_link(),
            hashtag: default_hashtag_link(),
        }
    }
}

impl LinkConfig {
    pub fn mention_href(&self, id: &str) -> String {
        self.mention.replace("{id}", id)
    }

    pub fn hashtag_href(&self, tag: &str) -> String {
        self.hashtag.replace("{tag}", tag)
    }
}

impl ComposerConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
