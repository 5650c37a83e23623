//! Placement coordination.
//!
//! Drives a single placement run end to end: loads the menu tree and locale
//! catalog, asks the operator to pick an anchor from the flattened tree,
//! mutates both structures at that anchor, derives the new page (and patches
//! up to two ancestor pages), then serializes every mutated artifact as a
//! best-effort batch.

mod placement;
mod report;
mod request;

pub use placement::{
    AnchorSelector, Placement, PlacementError, PlacementOutcome, PlacementPaths, Stage,
};
pub use report::{Artifact, SerializationReport};
pub use request::PlacementRequest;
