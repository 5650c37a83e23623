//! Menu tree structure for documentation navigation.
//!
//! Provides [`MenuTree`] and [`MenuNode`] for the site's hierarchical menu,
//! loaded from and serialized back to the persisted JSON form. Supports
//! depth-first leaf flattening via [`MenuTree::leaves`] and order-preserving
//! sibling insertion via [`MenuTree::insert_after`].

mod leaves;
mod tree;

pub use leaves::{LeafEntry, Leaves};
pub use tree::{MenuNode, MenuTree};

/// Error type for menu tree operations.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// The persisted menu JSON is malformed.
    #[error("{0}")]
    Parse(String),
}
