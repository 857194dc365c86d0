//! Link resolution error types.

use thiserror::Error;

/// Errors raised while resolving a menu link to its backing data.
///
/// These never reach the rendering caller: the filter consumes them with
/// a defined fallback (the lookup result is treated as absent and the
/// link falls back to the next resolution rule).
#[derive(Debug, Error)]
pub enum LookupError {
    /// The link path is external or otherwise not routable.
    #[error("path is not routable: {0}")]
    UnroutedPath(String),

    /// No registered route matched the link path.
    #[error("no route matched path: {0}")]
    NoRoute(String),

    /// A route parameter bound a value that is not a valid entity id.
    #[error("route parameter value is not a valid entity id: {0}")]
    BadEntityId(String),

    /// The underlying storage failed.
    #[error("storage error")]
    Storage(#[from] anyhow::Error),
}
