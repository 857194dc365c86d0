//! Menu filtering test utilities.
//!
//! Fixture builders for integration tests: an environment bundling the
//! in-memory collaborators, plus helpers for seeding menu link records,
//! routable entities, and translated view configuration.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use menu_manipulator::{
    ConfigFactory, ContentEntity, Langcode, MENU_LINK_CONTENT, MemoryConfigFactory,
    MemoryEntityRepository, MenuItem, MenuLink, MenuTreeElement, MenuTreeManipulator,
    PatternRouter, RouteDefinition,
};

/// A filtering environment with in-memory collaborators.
///
/// Seed it with records, routes, and config, then build a
/// [`MenuTreeManipulator`] for the language under test.
pub struct FilterFixture {
    entities: Arc<MemoryEntityRepository>,
    router: PatternRouter,
    config: Arc<MemoryConfigFactory>,
}

impl FilterFixture {
    /// An empty environment with the given default override language.
    pub fn new(default_language: &str) -> Self {
        Self {
            entities: Arc::new(MemoryEntityRepository::new()),
            router: PatternRouter::new(),
            config: Arc::new(MemoryConfigFactory::new(Langcode::new(default_language))),
        }
    }

    /// Seed a menu-link-content record and return its id.
    pub fn menu_link_record(&self, langcode: &str, translations: &[&str]) -> Uuid {
        let id = Uuid::now_v7();
        let mut record = ContentEntity::new(MENU_LINK_CONTENT, id, Langcode::new(langcode));
        for translation in translations {
            record = record.with_translation(translation);
        }
        self.entities.insert(record);
        id
    }

    /// Register storage for menu-link-content records without seeding any.
    pub fn empty_menu_link_storage(&self) {
        self.entities.register_storage(MENU_LINK_CONTENT);
    }

    /// Seed a routable content entity and its route, returning the path
    /// a link should use to reach it.
    pub fn routed_entity(&mut self, entity_type: &str, langcode: &str, translations: &[&str]) -> String {
        let id = Uuid::now_v7();
        let mut entity = ContentEntity::new(entity_type, id, Langcode::new(langcode));
        for translation in translations {
            entity = entity.with_translation(translation);
        }
        self.entities.insert(entity);

        let pattern = format!("/{entity_type}/:{entity_type}");
        self.router.register(
            RouteDefinition::new(&pattern).with_entity_param(entity_type, entity_type),
        );
        format!("/{entity_type}/{id}")
    }

    /// Register a route without any backing entity.
    pub fn route(&mut self, route: RouteDefinition) {
        self.router.register(route);
    }

    /// Store a base view configuration snapshot.
    pub fn view_config(&self, view_id: &str, snapshot: JsonValue) {
        self.config.set(&format!("views.view.{view_id}"), snapshot);
    }

    /// Store a translation overlay for a view configuration.
    pub fn view_config_overlay(&self, langcode: &str, view_id: &str, overlay: JsonValue) {
        self.config
            .set_overlay(langcode, &format!("views.view.{view_id}"), overlay);
    }

    /// Store the filter settings config.
    pub fn settings(&self, snapshot: JsonValue) {
        self.config.set("menu_manipulator.settings", snapshot);
    }

    /// The config factory, for override-language assertions.
    pub fn config(&self) -> &MemoryConfigFactory {
        &self.config
    }

    /// Build a manipulator filtering for the given language.
    ///
    /// Also points the ambient config override language at it, as
    /// request setup does.
    pub fn manipulator(&self, current: &str) -> MenuTreeManipulator {
        let current = Langcode::new(current);
        self.config.set_override_language(current.clone());
        MenuTreeManipulator::new(
            self.entities.clone(),
            Arc::new(self.router.clone()),
            self.config.clone(),
            current,
        )
    }
}

/// A one-level tree: parent with the given children.
pub fn tree_with_children(parent: MenuLink, children: Vec<MenuLink>) -> Vec<MenuTreeElement> {
    let subtree = children.into_iter().map(MenuTreeElement::new).collect();
    vec![MenuTreeElement::with_subtree(parent, subtree)]
}

/// Collect the titles of a flattened item collection, depth-first.
pub fn item_titles(items: &[MenuItem]) -> Vec<String> {
    let mut titles = Vec::new();
    for item in items {
        titles.push(item.title.clone());
        titles.extend(item_titles(&item.below));
    }
    titles
}
