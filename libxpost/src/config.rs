//! Configuration management for Xpost
//!
//! Platforms, their character limits and the mode templates are all read from
//! one TOML file:
//!
//! ```toml
//! [defaults]
//! draft = true
//! platforms = ["mastodon"]
//! counting = "graphemes"
//!
//! [[platforms]]
//! name = "mastodon"
//! char_limit = 500
//!
//! [[platforms]]
//! name = "bluesky"
//! char_limit = 300
//!
//! [modes.11ty]
//! label = "11ty"
//! platforms = ["mastodon", "bluesky"]
//!
//! [modes.11ty.suffixes]
//! mastodon = "\n\n#11ty"
//! bluesky = "\n\n@11ty.dev"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compose::graphemes::CountStrategy;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub platforms: Vec<PlatformConfig>,
    #[serde(default)]
    pub modes: BTreeMap<String, ModeConfig>,
    #[serde(default)]
    pub attachments: AttachmentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Value of the draft flag for a fresh or cleared session
    #[serde(default = "default_draft")]
    pub draft: bool,
    /// Platforms checked when a session starts
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub counting: CountStrategy,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            draft: default_draft(),
            platforms: Vec::new(),
            counting: CountStrategy::default(),
        }
    }
}

fn default_draft() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub name: String,
    pub char_limit: usize,
}

/// Raw mode template as written in the config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeConfig {
    pub label: Option<String>,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub suffixes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentsConfig {
    /// URL prefix for previously persisted draft images
    #[serde(default = "default_draft_image_base")]
    pub draft_image_base: String,
}

impl Default for AttachmentsConfig {
    fn default() -> Self {
        Self {
            draft_image_base: default_draft_image_base(),
        }
    }
}

fn default_draft_image_base() -> String {
    "/draft-image".to_string()
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from the default location, or the built-in
    /// configuration when no file exists there
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default_config());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        if config.platforms.is_empty() {
            return Err(ConfigError::MissingField("platforms".to_string()).into());
        }
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        let platforms = vec![
            PlatformConfig {
                name: "mastodon".to_string(),
                char_limit: 500,
            },
            PlatformConfig {
                name: "bluesky".to_string(),
                char_limit: 300,
            },
            PlatformConfig {
                name: "discord".to_string(),
                char_limit: 2000,
            },
        ];

        let suffixes: BTreeMap<String, String> = [
            ("mastodon", "\n\n#11ty @11ty@neighborhood.11ty.dev"),
            ("bluesky", "\n\n@11ty.dev"),
        ]
        .into_iter()
        .map(|(p, s)| (p.to_string(), s.to_string()))
        .collect();

        let bwe_prefixes: BTreeMap<String, String> = ["mastodon", "bluesky", "discord"]
            .into_iter()
            .map(|p| (p.to_string(), "Built with Eleventy: ".to_string()))
            .collect();

        let mut modes = BTreeMap::new();
        modes.insert(
            "11ty".to_string(),
            ModeConfig {
                label: Some("11ty".to_string()),
                platforms: vec!["mastodon".to_string(), "bluesky".to_string()],
                prefixes: BTreeMap::new(),
                suffixes: suffixes.clone(),
            },
        );
        modes.insert(
            "11ty-bwe".to_string(),
            ModeConfig {
                label: Some("11ty BWE".to_string()),
                platforms: vec!["mastodon".to_string(), "bluesky".to_string()],
                prefixes: bwe_prefixes,
                suffixes,
            },
        );

        Self {
            defaults: DefaultsConfig::default(),
            platforms,
            modes,
            attachments: AttachmentsConfig::default(),
        }
    }

    /// Character limit table, keyed by platform name
    pub fn char_limits(&self) -> BTreeMap<String, usize> {
        self.platforms
            .iter()
            .map(|p| (p.name.clone(), p.char_limit))
            .collect()
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("XPOST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("xpost").join("config.toml"))
}
