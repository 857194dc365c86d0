//! Language-aware menu link filtering.
//!
//! Decides, per menu link, whether the current visitor's active language
//! may see it, and cascades denial to all descendants. Two entry points
//! serve the two rendering paths: tree filtering replaces denied links
//! with inaccessible stubs and keeps the element in place, item
//! filtering removes denied items outright. The divergence is
//! deliberate; tree consumers rely on positional stability, item
//! consumers tolerate holes.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use tracing::debug;
use uuid::Uuid;

use crate::config::{ConfigFactory, FilterSettings, OverrideLanguageGuard};
use crate::entity::{ContentEntity, EntityRepository, MENU_LINK_CONTENT};
use crate::error::LookupError;
use crate::language::Langcode;
use crate::models::{AccessDecision, LinkSource, MenuItem, MenuLink, MenuTreeElement};
use crate::routing::RouteMatcher;

/// Filters menu trees and item collections by the active language.
///
/// Request-scoped: one manipulator per request, carrying the language
/// resolved for that request. No operation propagates an error to the
/// rendering caller; collaborator failures degrade to "not applicable".
pub struct MenuTreeManipulator {
    entities: Arc<dyn EntityRepository>,
    router: Arc<dyn RouteMatcher>,
    config: Arc<dyn ConfigFactory>,
    current: Langcode,
}

impl MenuTreeManipulator {
    /// A manipulator filtering for the given active language.
    pub fn new(
        entities: Arc<dyn EntityRepository>,
        router: Arc<dyn RouteMatcher>,
        config: Arc<dyn ConfigFactory>,
        current: Langcode,
    ) -> Self {
        Self {
            entities,
            router,
            config,
            current,
        }
    }

    /// The active language this manipulator filters for.
    pub fn current_langcode(&self) -> &Langcode {
        &self.current
    }

    /// Filter a menu tree in place.
    ///
    /// Denied elements keep their position: the link becomes an
    /// inaccessible stub, the element is marked forbidden, and the
    /// subtree is pruned without evaluating its members. Accessible
    /// elements are marked allowed and their subtrees recursed.
    /// Elements whose link is already a stub pass through unmodified.
    pub async fn filter_tree_by_current_language(&self, tree: &mut Vec<MenuTreeElement>) {
        for element in tree.iter_mut() {
            let Some(link) = element.link.as_link() else {
                continue;
            };

            if !self.check_link_access(link).await {
                debug!(
                    title = %element.link.title(),
                    langcode = %self.current,
                    "hiding menu tree element for language mismatch"
                );
                element.deny();
                continue;
            }

            element.access = Some(AccessDecision::Allowed);
            if element.has_children && !element.subtree.is_empty() {
                Box::pin(self.filter_tree_by_current_language(&mut element.subtree)).await;
            }
        }
    }

    /// Filter a render-ready item collection in place.
    ///
    /// Denied items are removed entirely, including everything below
    /// them; surviving items have their `below` collections filtered
    /// recursively. Items with no backing link are kept.
    pub async fn filter_items_by_current_language(&self, items: &mut Vec<MenuItem>) {
        let mut kept = Vec::with_capacity(items.len());

        for mut item in items.drain(..) {
            if let Some(link) = &item.link
                && !self.check_link_access(link).await
            {
                debug!(
                    title = %item.title,
                    langcode = %self.current,
                    "removing menu item for language mismatch"
                );
                continue;
            }

            if !item.below.is_empty() {
                Box::pin(self.filter_items_by_current_language(&mut item.below)).await;
            }
            kept.push(item);
        }

        *items = kept;
    }

    /// Whether the current visitor's language may see a link.
    pub async fn check_link_access(&self, link: &MenuLink) -> bool {
        let langcode = self.link_language(link).await;

        // Unspecified and non-linguistic links always pass.
        if langcode.is_sentinel() {
            return true;
        }

        let settings = FilterSettings::load(self.config.as_ref()).await;
        let use_entity = link
            .options
            .language_use_entity
            .unwrap_or(settings.language_use_entity);

        if use_entity
            && let Some(entity) = self.link_target_entity(link).await
        {
            // The target entity's translations win over the menu item's
            // own language.
            return entity.has_translation(&self.current);
        }

        self.current == langcode
    }

    /// Resolve the effective language of a link, per source variant.
    async fn link_language(&self, link: &MenuLink) -> Langcode {
        match &link.source {
            LinkSource::Content { entity_id } => self.content_link_language(*entity_id).await,
            LinkSource::View {
                view_id,
                display_id,
            } => self.view_link_language(view_id, display_id).await,
            LinkSource::Custom => Langcode::NotApplicable,
        }
    }

    /// Language of a content-backed link: the best-match translation of
    /// its stored record. Misses and storage failures resolve to
    /// "not applicable".
    async fn content_link_language(&self, entity_id: Uuid) -> Langcode {
        if !self.entities.has_storage(MENU_LINK_CONTENT) {
            return Langcode::NotApplicable;
        }

        match self.entities.load(MENU_LINK_CONTENT, entity_id).await {
            Ok(Some(record)) => record.translation_from_context(&self.current),
            Ok(None) => {
                debug!(entity_id = %entity_id, "menu link record not found");
                Langcode::NotApplicable
            }
            Err(error) => {
                debug!(
                    entity_id = %entity_id,
                    error = %error,
                    "menu link record lookup failed"
                );
                Langcode::NotApplicable
            }
        }
    }

    /// Language of a view-backed link: the current language when the
    /// view's configuration is translated into it, "not applicable"
    /// otherwise.
    async fn view_link_language(&self, view_id: &str, display_id: &str) -> Langcode {
        match self
            .view_has_translation(&self.current, view_id, display_id)
            .await
        {
            Ok(Some(langcode)) => langcode,
            Ok(None) => Langcode::NotApplicable,
            Err(error) => {
                debug!(
                    view_id = %view_id,
                    error = %error,
                    "view config lookup failed"
                );
                Langcode::NotApplicable
            }
        }
    }

    /// Whether a view's stored configuration is translated into
    /// `langcode`.
    ///
    /// Compares the snapshot under the ambient override language against
    /// the snapshot under the view's own base language. A difference
    /// outside the display collection, or within the requested display,
    /// means the view is translated. The ambient override language is
    /// left at `langcode` on return, including early error returns.
    pub async fn view_has_translation(
        &self,
        langcode: &Langcode,
        view_id: &str,
        display_id: &str,
    ) -> Result<Option<Langcode>> {
        let config_id = format!("views.view.{view_id}");

        // Snapshot under the ambient (current) override language.
        let Some(translated) = self.config.get(&config_id).await? else {
            return Ok(None);
        };

        let view_langcode = translated
            .get("langcode")
            .and_then(JsonValue::as_str)
            .map(Langcode::from);

        // The view natively carries the target language: no comparison
        // needed.
        if view_langcode.as_ref() == Some(langcode) {
            return Ok(Some(langcode.clone()));
        }

        let Some(base_langcode) = view_langcode else {
            debug!(view_id = %view_id, "view config has no langcode");
            return Ok(None);
        };

        // Fetch the original snapshot under the view's base language.
        // The guard restores the target langcode even if a read below
        // returns early with an error.
        let _guard = OverrideLanguageGuard::new(self.config.as_ref(), langcode.clone());
        self.config.set_override_language(base_langcode);
        let original = self
            .config
            .get(&config_id)
            .await?
            .unwrap_or(JsonValue::Null);

        // Compare everything but the display collection first, then the
        // one display this link renders through. A translation confined
        // to an unrelated display does not mark this link translated.
        if serialize(&strip_displays(&translated))? != serialize(&strip_displays(&original))? {
            return Ok(Some(langcode.clone()));
        }

        let translated_display = display_section(&translated, display_id);
        let original_display = display_section(&original, display_id);
        if serialize(&translated_display)? != serialize(&original_display)? {
            return Ok(Some(langcode.clone()));
        }

        Ok(None)
    }

    /// Resolve the entity a link points at, via route matching.
    ///
    /// Every failure degrades to `None`: the caller falls back to
    /// comparing the menu item's own language.
    async fn link_target_entity(&self, link: &MenuLink) -> Option<ContentEntity> {
        match self.lookup_target_entity(link).await {
            Ok(entity) => entity,
            Err(error) => {
                debug!(path = %link.path, error = %error, "link target lookup skipped");
                None
            }
        }
    }

    /// The fallible half of target-entity resolution.
    async fn lookup_target_entity(
        &self,
        link: &MenuLink,
    ) -> std::result::Result<Option<ContentEntity>, LookupError> {
        if !is_routed_path(&link.path) {
            return Err(LookupError::UnroutedPath(link.path.clone()));
        }

        let matched = self
            .router
            .match_path(&link.path)?
            .ok_or_else(|| LookupError::NoRoute(link.path.clone()))?;

        let Some((entity_type, raw_id)) = matched.entity_param() else {
            return Ok(None);
        };
        let entity_type = entity_type.to_string();

        let id = Uuid::parse_str(raw_id)
            .map_err(|_| LookupError::BadEntityId(raw_id.to_string()))?;

        let entity = self.entities.active(&entity_type, id).await?;
        Ok(entity)
    }
}

/// Whether a link path can be matched against internal routes.
///
/// External URLs, fragments, and placeholder paths (empty, "<nolink>")
/// are not routable.
fn is_routed_path(path: &str) -> bool {
    path.starts_with('/')
}

/// A config snapshot with its display collection removed.
fn strip_displays(snapshot: &JsonValue) -> JsonValue {
    let mut stripped = snapshot.clone();
    if let Some(object) = stripped.as_object_mut() {
        object.remove("display");
    }
    stripped
}

/// The sub-section of a snapshot for one display, `Null` when absent.
fn display_section(snapshot: &JsonValue, display_id: &str) -> JsonValue {
    snapshot
        .get("display")
        .and_then(|displays| displays.get(display_id))
        .cloned()
        .unwrap_or(JsonValue::Null)
}

fn serialize(value: &JsonValue) -> Result<String> {
    serde_json::to_string(value).context("failed to serialize config snapshot")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn routed_paths() {
        assert!(is_routed_path("/item/abc"));
        assert!(!is_routed_path(""));
        assert!(!is_routed_path("<nolink>"));
        assert!(!is_routed_path("https://example.com/"));
        assert!(!is_routed_path("#main"));
    }

    #[test]
    fn strip_displays_removes_only_display() {
        let snapshot = serde_json::json!({
            "langcode": "en",
            "label": "Latest",
            "display": {"default": {}}
        });
        let stripped = strip_displays(&snapshot);
        assert!(stripped.get("display").is_none());
        assert_eq!(stripped["label"], "Latest");
    }

    #[test]
    fn display_section_absent_is_null() {
        let snapshot = serde_json::json!({"langcode": "en"});
        assert_eq!(display_section(&snapshot, "default"), JsonValue::Null);
    }
}
