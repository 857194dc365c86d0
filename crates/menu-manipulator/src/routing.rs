//! Route matching for link target resolution.
//!
//! To decide whether a link's target is translated, the filter needs
//! the entity behind the link's path. Routes declare typed parameters;
//! matching a path against them yields the entity type and id to load.

use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Type of a route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamType {
    /// Plain string parameter.
    String,
    /// Parameter bound to a stored entity of the given type.
    Entity { entity_type: String },
}

/// A route definition with typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// URL path pattern (e.g. "/item/:item").
    pub pattern: String,

    /// Parameter name → type. Parameters absent from this map are
    /// treated as plain strings.
    #[serde(default)]
    pub parameters: HashMap<String, ParamType>,
}

impl RouteDefinition {
    /// A route with no typed parameters.
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            parameters: HashMap::new(),
        }
    }

    /// Declare a parameter as entity-bound.
    pub fn with_entity_param(mut self, name: &str, entity_type: &str) -> Self {
        self.parameters.insert(
            name.to_string(),
            ParamType::Entity {
                entity_type: entity_type.to_string(),
            },
        );
        self
    }
}

/// Result of matching a path against registered routes.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route definition.
    pub route: RouteDefinition,

    /// Parameter values extracted from the path.
    pub params: HashMap<String, String>,
}

impl RouteMatch {
    /// The first entity-typed parameter bound by this match, in pattern
    /// order: `(entity_type, raw value)`.
    pub fn entity_param(&self) -> Option<(&str, &str)> {
        for segment in self.route.pattern.split('/') {
            if let Some(name) = segment.strip_prefix(':')
                && let Some(ParamType::Entity { entity_type }) = self.route.parameters.get(name)
                && let Some(value) = self.params.get(name)
            {
                return Some((entity_type.as_str(), value.as_str()));
            }
        }
        None
    }
}

/// Route matching abstraction consumed by the filter.
pub trait RouteMatcher: Send + Sync {
    /// Match a request path against known routes.
    fn match_path(&self, path: &str) -> Result<Option<RouteMatch>>;
}

/// Pattern-based router with `:param` placeholders.
///
/// Routes are kept sorted most-specific first (fewest parameters, then
/// most segments) so literal routes win over parameterized ones.
#[derive(Debug, Clone, Default)]
pub struct PatternRouter {
    routes: Vec<RouteDefinition>,
}

impl PatternRouter {
    /// An empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route, keeping the route table specificity-sorted.
    pub fn register(&mut self, route: RouteDefinition) {
        self.routes.push(route);
        self.routes.sort_by_key(|route| {
            let param_count = route.pattern.matches(':').count();
            let segment_count = route.pattern.matches('/').count();
            (param_count, -(segment_count as i32))
        });
        debug!(routes = self.routes.len(), "built route table");
    }
}

impl RouteMatcher for PatternRouter {
    fn match_path(&self, path: &str) -> Result<Option<RouteMatch>> {
        for route in &self.routes {
            if let Some(params) = match_pattern(&route.pattern, path) {
                return Ok(Some(RouteMatch {
                    route: route.clone(),
                    params,
                }));
            }
        }
        Ok(None)
    }
}

/// Match a route pattern against a path, extracting parameters.
///
/// Pattern: "/item/:item/edit"
/// Path: "/item/0192a-.../edit"
/// Result: Some({"item": "0192a-..."})
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_parts: Vec<&str> = pattern.split('/').collect();
    let path_parts: Vec<&str> = path.split('/').collect();

    if pattern_parts.len() != path_parts.len() {
        return None;
    }

    let mut params = HashMap::new();

    for (pat, actual) in pattern_parts.iter().zip(path_parts.iter()) {
        if let Some(param_name) = pat.strip_prefix(':') {
            params.insert(param_name.to_string(), (*actual).to_string());
        } else if pat != actual {
            return None;
        }
    }

    Some(params)
}
