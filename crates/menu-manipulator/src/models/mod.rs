//! Menu data models.
//!
//! The filter operates on two shapes produced by menu-building code:
//! hierarchical [`MenuTreeElement`] trees and flattened, render-ready
//! [`MenuItem`] collections.

mod item;
mod link;
mod tree;

pub use item::MenuItem;
pub use link::{LinkOptions, LinkSource, MenuLink};
pub use tree::{AccessDecision, MenuTreeElement, TreeLink};
