//! Partial-card reference appending for ancestor pages.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// A partial-card include line, e.g. `<<partial_card_node_get_started>>`.
static PARTIAL_CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^<<partial_card_[A-Za-z0-9_-]+>>[ \t]*$").unwrap());

/// Append a new partial-card reference line immediately after the last
/// existing occurrence of that marker type in `content`, leaving all other
/// content untouched.
///
/// Returns `None` when the content has no partial-card line to anchor on;
/// the caller decides how to surface that.
#[must_use]
pub fn append_partial_reference(content: &str, partial_name: &str) -> Option<String> {
    let last = PARTIAL_CARD_RE.find_iter(content).last()?;

    let mut out = String::with_capacity(content.len() + partial_name.len() + 5);
    out.push_str(&content[..last.end()]);
    out.push('\n');
    out.push_str("<<");
    out.push_str(partial_name);
    out.push_str(">>");
    out.push_str(&content[last.end()..]);
    debug!(partial = partial_name, "appended partial card reference");
    Some(out)
}
