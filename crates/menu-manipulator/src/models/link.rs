//! Menu link model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What backs a menu link.
///
/// Language resolution is per-variant: content-backed links resolve
/// through their stored record, view-backed links through translated
/// view configuration, and custom links always resolve to
/// "not applicable".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkSource {
    /// Backed by a stored menu-link-content record.
    Content {
        /// Id of the menu-link-content record.
        entity_id: Uuid,
    },
    /// Provided by a saved view display.
    View {
        view_id: String,
        display_id: String,
    },
    /// External or routeless link with no backing record.
    Custom,
}

/// Per-link display options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOptions {
    /// Overrides the global "prefer entity translation" setting for this
    /// link. `None` falls back to the global default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_use_entity: Option<bool>,
}

/// A navigational menu link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLink {
    /// Display title.
    pub title: String,

    /// Link destination path.
    pub path: String,

    /// What backs this link.
    pub source: LinkSource,

    /// Per-link options.
    #[serde(default)]
    pub options: LinkOptions,
}

impl MenuLink {
    /// A link backed by a stored menu-link-content record.
    pub fn content(title: &str, path: &str, entity_id: Uuid) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
            source: LinkSource::Content { entity_id },
            options: LinkOptions::default(),
        }
    }

    /// A link provided by a saved view display.
    pub fn view(title: &str, path: &str, view_id: &str, display_id: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
            source: LinkSource::View {
                view_id: view_id.to_string(),
                display_id: display_id.to_string(),
            },
            options: LinkOptions::default(),
        }
    }

    /// A custom link with no backing record.
    pub fn custom(title: &str, path: &str) -> Self {
        Self {
            title: title.to_string(),
            path: path.to_string(),
            source: LinkSource::Custom,
            options: LinkOptions::default(),
        }
    }

    /// Set the per-link entity-translation preference.
    pub fn with_language_use_entity(mut self, use_entity: bool) -> Self {
        self.options.language_use_entity = Some(use_entity);
        self
    }
}
