//! Mode templates and body extraction
//!
//! A mode wraps the platform-independent body of a post in a fixed prefix and
//! suffix per platform. Templates are built once from [`Config`] and never
//! change for the life of a session.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::types::Platform;

/// A named set of included platforms plus per-platform decoration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTemplate {
    pub name: String,
    pub label: String,
    /// Platforms the mode auto-selects, in declaration order
    pub platforms: Vec<Platform>,
    prefixes: BTreeMap<Platform, String>,
    suffixes: BTreeMap<Platform, String>,
}

impl ModeTemplate {
    pub fn new(
        name: impl Into<String>,
        platforms: Vec<Platform>,
        prefixes: BTreeMap<Platform, String>,
        suffixes: BTreeMap<Platform, String>,
    ) -> Self {
        let name = name.into();
        let mut unique = Vec::with_capacity(platforms.len());
        for platform in platforms {
            if !unique.contains(&platform) {
                unique.push(platform);
            }
        }
        Self {
            label: name.clone(),
            name,
            platforms: unique,
            prefixes,
            suffixes,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn includes(&self, platform: &Platform) -> bool {
        self.platforms.contains(platform)
    }

    /// Prefix for `platform`, empty when the mode does not decorate it
    pub fn prefix(&self, platform: &Platform) -> &str {
        self.prefixes.get(platform).map(String::as_str).unwrap_or("")
    }

    /// Suffix for `platform`, empty when the mode does not decorate it
    pub fn suffix(&self, platform: &Platform) -> &str {
        self.suffixes.get(platform).map(String::as_str).unwrap_or("")
    }

    /// Recover the body of `text` as decorated for `platform`
    pub fn extract(&self, platform: &Platform, text: &str) -> String {
        extract_body(text, self.prefix(platform), self.suffix(platform))
    }

    /// Decorate `body` for `platform`
    pub fn apply(&self, platform: &Platform, body: &str) -> String {
        apply_template(body, self.prefix(platform), self.suffix(platform))
    }
}

/// Read-only lookup of mode templates by name
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, Arc<ModeTemplate>>,
}

impl TemplateStore {
    /// Build the store from configuration, checking that every platform a
    /// mode includes is a configured platform.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut known: Vec<&str> = Vec::with_capacity(config.platforms.len());
        for platform in &config.platforms {
            if known.contains(&platform.name.as_str()) {
                return Err(ConfigError::DuplicatePlatform(platform.name.clone()).into());
            }
            known.push(&platform.name);
        }

        let mut templates = BTreeMap::new();
        for (name, mode) in &config.modes {
            if let Some(unknown) = mode.platforms.iter().find(|p| !known.contains(&p.as_str())) {
                return Err(ConfigError::UnknownPlatform {
                    mode: name.clone(),
                    platform: unknown.clone(),
                }
                .into());
            }

            let decorate = |map: &BTreeMap<String, String>| {
                map.iter()
                    .map(|(p, s)| (Platform::from(p.as_str()), s.clone()))
                    .collect::<BTreeMap<_, _>>()
            };

            let template = ModeTemplate::new(
                name.clone(),
                mode.platforms.iter().map(|p| Platform::from(p.as_str())).collect(),
                decorate(&mode.prefixes),
                decorate(&mode.suffixes),
            );
            let template = match &mode.label {
                Some(label) => template.with_label(label.clone()),
                None => template,
            };
            templates.insert(name.clone(), Arc::new(template));
        }

        Ok(Self { templates })
    }

    pub fn from_templates(templates: impl IntoIterator<Item = ModeTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.name.clone(), Arc::new(t)))
                .collect(),
        }
    }

    /// Look up a template; unknown names yield `None`
    pub fn get(&self, name: &str) -> Option<Arc<ModeTemplate>> {
        self.templates.get(name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeTemplate> {
        self.templates.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Strip a literal leading `prefix` and trailing `suffix` from `text`.
///
/// Each side is stripped only when present; the suffix test runs against what
/// remains after the prefix is removed.
pub fn extract_body(text: &str, prefix: &str, suffix: &str) -> String {
    let mut body = text;
    if !prefix.is_empty() {
        if let Some(rest) = body.strip_prefix(prefix) {
            body = rest;
        }
    }
    if !suffix.is_empty() {
        if let Some(rest) = body.strip_suffix(suffix) {
            body = rest;
        }
    }
    body.to_string()
}

/// `prefix + body + suffix`
pub fn apply_template(body: &str, prefix: &str, suffix: &str) -> String {
    let mut text = String::with_capacity(prefix.len() + body.len() + suffix.len());
    text.push_str(prefix);
    text.push_str(body);
    text.push_str(suffix);
    text
}
