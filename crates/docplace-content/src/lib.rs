//! Marker-based content derivation.
//!
//! Derives a new documentation page from an existing template document by
//! replacing recognized markers (an inline video-id token, a bracketed
//! external-link reference, and the Overview body section) with supplied
//! values, leaving all other content byte-identical. Also supports appending
//! partial-card reference lines to existing pages.
//!
//! Substitution follows a partial-success policy: a marker absent from the
//! template or an empty field value is surfaced as a [`DeriveWarning`]
//! without aborting the remaining substitutions.

mod derive;
mod partial;

use std::fmt;

pub use derive::{Derived, PageFields, derive};
pub use partial::append_partial_reference;

/// A recognizable substitution target in a content document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Inline `videoId: "..."` token.
    VideoId,
    /// `[githublink]: <url>` reference line.
    ExternalLink,
    /// `## Overview` body section.
    Overview,
    /// `<<partial_card_*>>` include line.
    PartialReference,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VideoId => "videoId",
            Self::ExternalLink => "[githublink]",
            Self::Overview => "Overview section",
            Self::PartialReference => "partial card reference",
        };
        f.write_str(name)
    }
}

/// Non-fatal condition observed while deriving content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeriveWarning {
    /// The marker is absent from the template; the substitution was skipped.
    #[error("marker `{0}` not found in template, substitution skipped")]
    MarkerMissing(Marker),

    /// An empty value was substituted for the marker.
    #[error("empty value substituted for marker `{0}`")]
    EmptyField(Marker),
}
