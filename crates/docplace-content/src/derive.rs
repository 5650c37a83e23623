//! Template-to-page derivation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{DeriveWarning, Marker};

/// Inline video-id token. Bounded so a match cannot span past the closing
/// quote of the same token.
static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"videoId:\s*["'][^"'\n]*["']"#).unwrap());

/// External-link reference line.
static GITHUB_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[githublink\]:\s*https?://\S+").unwrap());

/// The Overview section header line. Whitespace is restricted to the line
/// itself so the match never swallows the trailing newline.
static OVERVIEW_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]*Overview[ \t]*$").unwrap());

/// Any markdown header line, used to bound the Overview body.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s").unwrap());

/// Field values to substitute into a template.
///
/// `None` means the field was not supplied and its marker is left untouched;
/// `Some("")` substitutes an empty string and is flagged as a warning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageFields {
    /// Video identifier for the inline `videoId` token.
    pub video_id: Option<String>,
    /// URL for the `[githublink]` reference.
    pub external_link: Option<String>,
    /// Replacement body for the Overview section.
    pub overview: Option<String>,
}

/// A derived document together with the warnings raised while deriving it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derived {
    /// The complete derived document.
    pub content: String,
    /// Non-fatal conditions observed during substitution.
    pub warnings: Vec<DeriveWarning>,
}

/// Derive a new document from `template` by substituting the supplied
/// fields.
///
/// Only the first occurrence of each inline marker is substituted. The
/// result is deterministic for identical inputs and the template itself is
/// never mutated; every byte outside the matched marker spans is carried
/// through unchanged.
#[must_use]
pub fn derive(template: &str, fields: &PageFields) -> Derived {
    let mut content = template.to_owned();
    let mut warnings = Vec::new();

    if let Some(video_id) = &fields.video_id {
        substitute(
            &mut content,
            &mut warnings,
            Marker::VideoId,
            video_id,
            |content| replace_first(&VIDEO_ID_RE, content, &format!("videoId: \"{video_id}\"")),
        );
    }

    if let Some(link) = &fields.external_link {
        substitute(
            &mut content,
            &mut warnings,
            Marker::ExternalLink,
            link,
            |content| replace_first(&GITHUB_LINK_RE, content, &format!("[githublink]: {link}")),
        );
    }

    if let Some(overview) = &fields.overview {
        substitute(
            &mut content,
            &mut warnings,
            Marker::Overview,
            overview,
            |content| replace_overview(content, overview),
        );
    }

    Derived { content, warnings }
}

/// Apply one substitution, recording the marker-missing and empty-field
/// warnings.
fn substitute(
    content: &mut String,
    warnings: &mut Vec<DeriveWarning>,
    marker: Marker,
    value: &str,
    apply: impl FnOnce(&str) -> Option<String>,
) {
    match apply(content.as_str()) {
        Some(updated) => {
            debug!(%marker, "substituted marker");
            *content = updated;
            if value.is_empty() {
                warnings.push(DeriveWarning::EmptyField(marker));
            }
        }
        None => warnings.push(DeriveWarning::MarkerMissing(marker)),
    }
}

/// Replace the first match of `re` with a literal replacement.
///
/// The replacement is spliced in directly (no capture-group expansion), so
/// untrusted values containing `$` are safe.
fn replace_first(re: &Regex, content: &str, replacement: &str) -> Option<String> {
    let m = re.find(content)?;
    let mut out = String::with_capacity(content.len() + replacement.len());
    out.push_str(&content[..m.start()]);
    out.push_str(replacement);
    out.push_str(&content[m.end()..]);
    Some(out)
}

/// Replace the Overview body: everything after the `## Overview` header line
/// up to (but not including) the next header line or end of document. The
/// header line itself is preserved byte-identical.
fn replace_overview(content: &str, overview: &str) -> Option<String> {
    let header = OVERVIEW_HEADER_RE.find(content)?;

    // Skip the newline that terminates the header line, if any.
    let body_start = if content[header.end()..].starts_with('\n') {
        header.end() + 1
    } else {
        header.end()
    };
    let body_end = HEADER_RE
        .find(&content[body_start..])
        .map_or(content.len(), |m| body_start + m.start());

    let mut out = String::with_capacity(content.len() + overview.len());
    out.push_str(&content[..header.end()]);
    out.push_str("\n\n");
    out.push_str(overview);
    if body_end < content.len() {
        out.push_str("\n\n");
        out.push_str(&content[body_end..]);
    } else {
        out.push('\n');
    }
    Some(out)
}
