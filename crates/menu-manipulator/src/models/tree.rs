//! Menu link tree elements.
//!
//! Tree elements mirror the structure produced by menu-tree building:
//! each element carries its link, an access decision once evaluated, a
//! has-children indicator, and its subtree in menu order.

use serde::{Deserialize, Serialize};

use super::link::MenuLink;

/// Access decision attached to a tree element after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed,
    Forbidden,
}

/// The link slot of a tree element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "link", rename_all = "snake_case")]
pub enum TreeLink {
    /// A regular menu link.
    Link(MenuLink),

    /// Stand-in for a link the current visitor may not see. The original
    /// link is kept so the element retains its place in the tree, but
    /// renderers must not expose its destination.
    Inaccessible(Box<MenuLink>),
}

impl TreeLink {
    /// The regular link, if this slot has not been replaced by a stub.
    pub fn as_link(&self) -> Option<&MenuLink> {
        match self {
            Self::Link(link) => Some(link),
            Self::Inaccessible(_) => None,
        }
    }

    /// Display title, regardless of accessibility.
    pub fn title(&self) -> &str {
        match self {
            Self::Link(link) => &link.title,
            Self::Inaccessible(link) => &link.title,
        }
    }

    /// Replace a regular link with its inaccessible stand-in.
    pub fn make_inaccessible(&mut self) {
        if let Self::Link(link) = self {
            *self = Self::Inaccessible(Box::new(link.clone()));
        }
    }
}

/// One element of a menu link tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTreeElement {
    /// The element's link.
    pub link: TreeLink,

    /// Access decision, set by filtering. `None` means not yet evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessDecision>,

    /// Whether the element had children when the tree was built.
    #[serde(default)]
    pub has_children: bool,

    /// Child elements in menu order.
    #[serde(default)]
    pub subtree: Vec<MenuTreeElement>,
}

impl MenuTreeElement {
    /// A leaf element.
    pub fn new(link: MenuLink) -> Self {
        Self {
            link: TreeLink::Link(link),
            access: None,
            has_children: false,
            subtree: Vec::new(),
        }
    }

    /// An element with the given subtree.
    pub fn with_subtree(link: MenuLink, subtree: Vec<MenuTreeElement>) -> Self {
        Self {
            link: TreeLink::Link(link),
            access: None,
            has_children: !subtree.is_empty(),
            subtree,
        }
    }

    /// Deny access: stub out the link, mark the element forbidden, and
    /// prune the subtree. Descendants are dropped unevaluated.
    pub fn deny(&mut self) {
        self.link.make_inaccessible();
        self.access = Some(AccessDecision::Forbidden);
        self.subtree.clear();
    }
}
