//! Integration tests for view configuration translation detection.
//!
//! `view_has_translation` temporarily swaps the ambient config override
//! language; every test asserts the swap is undone, including on error.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};

use menu_manipulator::{
    ConfigFactory, Langcode, MemoryConfigFactory, MemoryEntityRepository, MenuLink,
    MenuTreeManipulator, PatternRouter,
};
use menu_manipulator_test_utils::FilterFixture;

fn base_view_config() -> JsonValue {
    json!({
        "langcode": "en",
        "label": "Latest items",
        "display": {
            "default": {"title": "Latest items"},
            "page_1": {"title": "Latest items page"}
        }
    })
}

/// When the view's own language already is the target language, no
/// comparison (and no override swap) happens.
#[tokio::test]
async fn short_circuits_when_base_language_matches() {
    let fixture = FilterFixture::new("en");
    fixture.view_config("latest", json!({"langcode": "fr", "label": "Derniers"}));
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();

    assert_eq!(result, Some(Langcode::new("fr")));
    assert_eq!(fixture.config().override_language(), Langcode::new("fr"));
}

/// A difference outside the display collection marks the view
/// translated.
#[tokio::test]
async fn top_level_difference_is_translated() {
    let fixture = FilterFixture::new("en");
    fixture.view_config("latest", base_view_config());
    fixture.view_config_overlay("fr", "latest", json!({"label": "Derniers contenus"}));
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();

    assert_eq!(result, Some(Langcode::new("fr")));
    assert_eq!(fixture.config().override_language(), Langcode::new("fr"));
}

/// Identical top levels with a translated display still count, when the
/// difference is in the requested display.
#[tokio::test]
async fn display_level_difference_is_translated() {
    let fixture = FilterFixture::new("en");
    fixture.view_config("latest", base_view_config());
    fixture.view_config_overlay(
        "fr",
        "latest",
        json!({"display": {"default": {"title": "Derniers contenus"}}}),
    );
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();

    assert_eq!(result, Some(Langcode::new("fr")));
}

/// A translation confined to a different display does not mark this
/// link's display translated.
#[tokio::test]
async fn unrelated_display_difference_is_not_translated() {
    let fixture = FilterFixture::new("en");
    fixture.view_config("latest", base_view_config());
    fixture.view_config_overlay(
        "fr",
        "latest",
        json!({"display": {"page_1": {"title": "Page des derniers"}}}),
    );
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(fixture.config().override_language(), Langcode::new("fr"));
}

/// With no translation anywhere, the view is not translated, and a
/// view-backed link falls back to "not applicable" (always visible).
#[tokio::test]
async fn untranslated_view_link_resolves_to_not_applicable() {
    let fixture = FilterFixture::new("en");
    fixture.view_config("latest", base_view_config());
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();
    assert_eq!(result, None);

    let link = MenuLink::view("Latest", "/latest", "latest", "default");
    assert!(manipulator.check_link_access(&link).await);
}

/// A missing view config is simply not translated.
#[tokio::test]
async fn missing_view_config_is_not_translated() {
    let fixture = FilterFixture::new("en");
    let manipulator = fixture.manipulator("fr");

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "ghost", "default")
        .await
        .unwrap();
    assert_eq!(result, None);
}

/// Config factory that fails once the override language is swapped to
/// the view's base language, simulating a backend outage mid-comparison.
struct FlakyConfig {
    inner: MemoryConfigFactory,
    fail_under: Langcode,
}

#[async_trait]
impl ConfigFactory for FlakyConfig {
    async fn get(&self, id: &str) -> Result<Option<JsonValue>> {
        if self.inner.override_language() == self.fail_under {
            anyhow::bail!("config backend unavailable");
        }
        self.inner.get(id).await
    }

    fn override_language(&self) -> Langcode {
        self.inner.override_language()
    }

    fn set_override_language(&self, langcode: Langcode) {
        self.inner.set_override_language(langcode);
    }
}

/// The override language is restored even when the second snapshot read
/// fails partway through the comparison.
#[tokio::test]
async fn override_language_restored_on_error() {
    let inner = MemoryConfigFactory::new(Langcode::new("fr"));
    inner.set("views.view.latest", base_view_config());
    let config = Arc::new(FlakyConfig {
        inner,
        fail_under: Langcode::new("en"),
    });

    let manipulator = MenuTreeManipulator::new(
        Arc::new(MemoryEntityRepository::new()),
        Arc::new(PatternRouter::new()),
        config.clone(),
        Langcode::new("fr"),
    );

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await;

    assert!(result.is_err());
    assert_eq!(config.override_language(), Langcode::new("fr"));
}

/// The short-circuit path never reads under the base language, so a
/// backend that fails under it is never hit.
#[tokio::test]
async fn short_circuit_skips_base_language_read() {
    let inner = MemoryConfigFactory::new(Langcode::new("fr"));
    inner.set("views.view.latest", json!({"langcode": "fr", "label": "Derniers"}));
    let config = Arc::new(FlakyConfig {
        inner,
        fail_under: Langcode::new("en"),
    });

    let manipulator = MenuTreeManipulator::new(
        Arc::new(MemoryEntityRepository::new()),
        Arc::new(PatternRouter::new()),
        config,
        Langcode::new("fr"),
    );

    let result = manipulator
        .view_has_translation(&Langcode::new("fr"), "latest", "default")
        .await
        .unwrap();
    assert_eq!(result, Some(Langcode::new("fr")));
}
