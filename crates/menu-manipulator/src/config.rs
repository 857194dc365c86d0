//! Configuration access with language overrides.
//!
//! Config snapshots are language-sensitive: a read returns the snapshot
//! for the ambient override language. That override is the one piece of
//! shared request state the filter touches; every temporary swap must be
//! paired with a restore, which [`OverrideLanguageGuard`] guarantees on
//! scope exit.

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::language::Langcode;

/// Config id holding the filter's own settings.
pub const SETTINGS_CONFIG_ID: &str = "menu_manipulator.settings";

/// Settings key for the global entity-translation preference.
pub const USE_ENTITY_KEY: &str = "preprocess_menus_language_use_entity";

/// Language-aware configuration store.
#[async_trait]
pub trait ConfigFactory: Send + Sync {
    /// Read a config snapshot under the ambient override language.
    async fn get(&self, id: &str) -> Result<Option<JsonValue>>;

    /// The ambient override language.
    fn override_language(&self) -> Langcode;

    /// Swap the ambient override language.
    fn set_override_language(&self, langcode: Langcode);
}

/// Restores a chosen override language when dropped.
///
/// Wraps the set → read → restore discipline around translated-config
/// reads: the restore runs even when the read path returns early with
/// `?`.
pub struct OverrideLanguageGuard<'a> {
    config: &'a dyn ConfigFactory,
    restore: Langcode,
}

impl<'a> OverrideLanguageGuard<'a> {
    /// Arrange for `restore` to become the override language on drop.
    pub fn new(config: &'a dyn ConfigFactory, restore: Langcode) -> Self {
        Self { config, restore }
    }
}

impl Drop for OverrideLanguageGuard<'_> {
    fn drop(&mut self) {
        self.config.set_override_language(self.restore.clone());
    }
}

/// Global filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    /// Prefer the target entity's translations over the menu item's own
    /// language when deciding access.
    pub language_use_entity: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            language_use_entity: true,
        }
    }
}

impl FilterSettings {
    /// Load settings from config, falling back to defaults when the
    /// config is absent or malformed.
    pub async fn load(config: &dyn ConfigFactory) -> Self {
        let snapshot = match config.get(SETTINGS_CONFIG_ID).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(error = %error, "failed to read filter settings, using defaults");
                None
            }
        };

        let language_use_entity = snapshot
            .as_ref()
            .and_then(|value| value.get(USE_ENTITY_KEY))
            .and_then(JsonValue::as_bool)
            .unwrap_or(Self::default().language_use_entity);

        Self {
            language_use_entity,
        }
    }
}

/// In-memory config factory with per-language overlay snapshots.
///
/// Base snapshots hold the stored configuration; overlays hold the
/// translated portions for a language and are deep-merged onto the base
/// at read time.
pub struct MemoryConfigFactory {
    base: DashMap<String, JsonValue>,
    /// (langcode, config id) → translation overlay.
    overlays: DashMap<(String, String), JsonValue>,
    override_language: RwLock<Langcode>,
}

impl MemoryConfigFactory {
    /// A factory with the given initial override language.
    pub fn new(override_language: Langcode) -> Self {
        Self {
            base: DashMap::new(),
            overlays: DashMap::new(),
            override_language: RwLock::new(override_language),
        }
    }

    /// Store a base config snapshot.
    pub fn set(&self, id: &str, value: JsonValue) {
        self.base.insert(id.to_string(), value);
    }

    /// Store a translation overlay for a config under a language.
    pub fn set_overlay(&self, langcode: &str, id: &str, overlay: JsonValue) {
        self.overlays
            .insert((langcode.to_string(), id.to_string()), overlay);
    }
}

#[async_trait]
impl ConfigFactory for MemoryConfigFactory {
    async fn get(&self, id: &str) -> Result<Option<JsonValue>> {
        let Some(base) = self.base.get(id).map(|entry| entry.clone()) else {
            return Ok(None);
        };

        let langcode = self.override_language().as_str().to_string();
        match self.overlays.get(&(langcode, id.to_string())) {
            Some(overlay) => Ok(Some(merge_overlay(base, &overlay))),
            None => Ok(Some(base)),
        }
    }

    fn override_language(&self) -> Langcode {
        self.override_language.read().clone()
    }

    fn set_override_language(&self, langcode: Langcode) {
        *self.override_language.write() = langcode;
    }
}

/// Deep-merge a translation overlay onto a base snapshot.
///
/// Objects merge key-wise; anything else in the overlay replaces the
/// base value outright.
fn merge_overlay(base: JsonValue, overlay: &JsonValue) -> JsonValue {
    match (base, overlay) {
        (JsonValue::Object(mut base), JsonValue::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(key) {
                    Some(existing) => merge_overlay(existing, value),
                    None => value.clone(),
                };
                base.insert(key.clone(), merged);
            }
            JsonValue::Object(base)
        }
        (_, other) => other.clone(),
    }
}
