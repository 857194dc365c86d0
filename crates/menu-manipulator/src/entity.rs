//! Content entity lookup.
//!
//! The filter consults entity storage twice: to load the stored record
//! behind a content-backed menu link, and to load the target entity a
//! link points at. Both go through [`EntityRepository`] so callers can
//! swap in database-backed implementations.

use std::collections::BTreeSet;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Langcode;

/// Entity type of stored menu-link-content records.
pub const MENU_LINK_CONTENT: &str = "menu_link_content";

/// A loaded content entity with its translation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntity {
    /// Entity type (e.g. "item", "menu_link_content").
    pub entity_type: String,

    /// Unique identifier.
    pub id: Uuid,

    /// The entity's own language.
    pub langcode: Langcode,

    /// Additional languages this entity is translated into.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub translations: BTreeSet<String>,
}

impl ContentEntity {
    /// A new entity in the given language, with no translations.
    pub fn new(entity_type: &str, id: Uuid, langcode: Langcode) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            id,
            langcode,
            translations: BTreeSet::new(),
        }
    }

    /// Add a translation language.
    pub fn with_translation(mut self, langcode: &str) -> Self {
        self.translations.insert(langcode.to_string());
        self
    }

    /// Whether the entity is available in the given language.
    ///
    /// The entity's own language always counts as available.
    pub fn has_translation(&self, langcode: &Langcode) -> bool {
        if self.langcode == *langcode {
            return true;
        }
        match langcode {
            Langcode::Tag(tag) => self.translations.contains(tag),
            _ => false,
        }
    }

    /// Best-match language for the current rendering context: the
    /// current language if the entity is available in it, otherwise the
    /// entity's own language.
    pub fn translation_from_context(&self, current: &Langcode) -> Langcode {
        if self.has_translation(current) {
            current.clone()
        } else {
            self.langcode.clone()
        }
    }
}

/// Lookup of stored content entities.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Whether storage exists for the given entity type.
    fn has_storage(&self, entity_type: &str) -> bool;

    /// Load an entity by type and id.
    async fn load(&self, entity_type: &str, id: Uuid) -> Result<Option<ContentEntity>>;

    /// Load the currently active variant of an entity.
    ///
    /// Defaults to [`load`](Self::load); implementations with revisions
    /// or workspaces override this.
    async fn active(&self, entity_type: &str, id: Uuid) -> Result<Option<ContentEntity>> {
        self.load(entity_type, id).await
    }
}

/// In-memory entity repository backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryEntityRepository {
    entities: DashMap<(String, Uuid), ContentEntity>,
    storages: DashSet<String>,
}

impl MemoryEntityRepository {
    /// An empty repository with no registered storages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a storage for an entity type, even if it holds no
    /// entities yet.
    pub fn register_storage(&self, entity_type: &str) {
        self.storages.insert(entity_type.to_string());
    }

    /// Insert an entity, registering its type's storage as a side effect.
    pub fn insert(&self, entity: ContentEntity) {
        self.storages.insert(entity.entity_type.clone());
        self.entities
            .insert((entity.entity_type.clone(), entity.id), entity);
    }
}

#[async_trait]
impl EntityRepository for MemoryEntityRepository {
    fn has_storage(&self, entity_type: &str) -> bool {
        self.storages.contains(entity_type)
    }

    async fn load(&self, entity_type: &str, id: Uuid) -> Result<Option<ContentEntity>> {
        Ok(self
            .entities
            .get(&(entity_type.to_string(), id))
            .map(|entry| entry.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entity() -> ContentEntity {
        ContentEntity::new("item", Uuid::now_v7(), Langcode::new("en")).with_translation("fr")
    }

    #[test]
    fn own_language_counts_as_translation() {
        let entity = entity();
        assert!(entity.has_translation(&Langcode::new("en")));
        assert!(entity.has_translation(&Langcode::new("fr")));
        assert!(!entity.has_translation(&Langcode::new("de")));
    }

    #[test]
    fn sentinel_never_matches_a_translation() {
        let entity = entity();
        assert!(!entity.has_translation(&Langcode::NotApplicable));
        assert!(!entity.has_translation(&Langcode::NotSpecified));
    }

    #[test]
    fn context_translation_prefers_current_language() {
        let entity = entity();
        assert_eq!(
            entity.translation_from_context(&Langcode::new("fr")),
            Langcode::new("fr")
        );
        assert_eq!(
            entity.translation_from_context(&Langcode::new("de")),
            Langcode::new("en")
        );
    }

    #[test]
    fn unspecified_entity_resolves_to_sentinel() {
        // A record saved without a language resolves to "und", which the
        // filter always lets through.
        let entity = ContentEntity::new("menu_link_content", Uuid::now_v7(), Langcode::NotSpecified);
        assert_eq!(
            entity.translation_from_context(&Langcode::new("fr")),
            Langcode::NotSpecified
        );
    }

    #[tokio::test]
    async fn memory_repository_load_and_storage_registration() {
        let repo = MemoryEntityRepository::new();
        assert!(!repo.has_storage("item"));

        let entity = entity();
        let id = entity.id;
        repo.insert(entity.clone());

        assert!(repo.has_storage("item"));
        let loaded = repo.load("item", id).await.unwrap();
        assert_eq!(loaded, Some(entity));

        let missing = repo.load("item", Uuid::now_v7()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn active_defaults_to_load() {
        let repo = MemoryEntityRepository::new();
        let entity = entity();
        let id = entity.id;
        repo.insert(entity.clone());

        let active = repo.active("item", id).await.unwrap();
        assert_eq!(active, Some(entity));
    }
}
