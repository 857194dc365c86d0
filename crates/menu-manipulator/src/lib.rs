//! Language-aware menu link tree filtering.
//!
//! Given a menu link tree built elsewhere, [`MenuTreeManipulator`]
//! decides per link whether the current visitor's active language may
//! see it, and cascades denial to descendants. Content-backed links
//! resolve through their stored record's translations, view-backed
//! links through translated view configuration, and custom links always
//! pass. Collaborators (entity storage, route matching, config) are
//! traits so hosts can plug in their own backends; in-memory
//! implementations are provided.

pub mod config;
pub mod entity;
pub mod error;
pub mod filter;
pub mod language;
pub mod models;
pub mod routing;

pub use config::{
    ConfigFactory, FilterSettings, MemoryConfigFactory, OverrideLanguageGuard, SETTINGS_CONFIG_ID,
    USE_ENTITY_KEY,
};
pub use entity::{ContentEntity, EntityRepository, MENU_LINK_CONTENT, MemoryEntityRepository};
pub use error::LookupError;
pub use filter::MenuTreeManipulator;
pub use language::{LANGCODE_NOT_APPLICABLE, LANGCODE_NOT_SPECIFIED, Langcode};
pub use models::{
    AccessDecision, LinkOptions, LinkSource, MenuItem, MenuLink, MenuTreeElement, TreeLink,
};
pub use routing::{ParamType, PatternRouter, RouteDefinition, RouteMatch, RouteMatcher};
