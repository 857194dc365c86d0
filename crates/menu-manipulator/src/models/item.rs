//! Render-ready menu items.
//!
//! The item shape is what menu preprocessing hands to templates: a flat
//! list with nested `below` collections, already detached from the tree
//! structure that produced it.

use serde::{Deserialize, Serialize};

use super::link::MenuLink;

/// A render-ready menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display title.
    pub title: String,

    /// Resolved URL.
    pub url: String,

    /// The original link this item was built from, when known. Items
    /// without one (separators, headings) are never filtered out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<MenuLink>,

    /// Nested child items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub below: Vec<MenuItem>,
}

impl MenuItem {
    /// An item built from a menu link.
    pub fn from_link(link: MenuLink) -> Self {
        Self {
            title: link.title.clone(),
            url: link.path.clone(),
            link: Some(link),
            below: Vec::new(),
        }
    }

    /// An item with no backing link.
    pub fn bare(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            link: None,
            below: Vec::new(),
        }
    }

    /// Attach child items.
    pub fn with_below(mut self, below: Vec<MenuItem>) -> Self {
        self.below = below;
        self
    }
}
