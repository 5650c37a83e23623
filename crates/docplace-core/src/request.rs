//! Placement request: the raw strings supplied by external collaborators.

use serde::Deserialize;

/// All page details for one placement run.
///
/// The values come from outside the core (a details file plus whatever the
/// ticket and video services resolved) and are treated as untrusted, possibly
/// empty strings. Empty values are substituted as-is and surfaced as
/// warnings, never as hard failures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementRequest {
    /// Key of the new page: menu identifier, catalog key, and content file
    /// stem (`<file_name>.html.md`).
    pub file_name: String,
    /// Page title.
    pub title: String,
    /// Title for HTML meta tags.
    #[serde(default)]
    pub meta_title: String,
    /// Page description.
    #[serde(default)]
    pub description: String,
    /// Short title shown in the navigation menu.
    #[serde(default)]
    pub menu_title: String,
    /// Short summary used as the Overview body.
    #[serde(default)]
    pub short_summary: String,
    /// Name of the partial card appended to ancestor pages, e.g.
    /// `partial_card_node_get_started`.
    #[serde(default)]
    pub partial_card_file_name: String,
    /// External reference link for the `[githublink]` marker.
    #[serde(default)]
    pub github_url: String,
    /// Resolved video identifier for the `videoId` marker.
    #[serde(default)]
    pub video_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_request_defaults_optional_fields() {
        let request: PlacementRequest =
            toml::from_str("file_name = \"node_get_started\"\ntitle = \"Get started\"\n").unwrap();

        assert_eq!(request.file_name, "node_get_started");
        assert_eq!(request.title, "Get started");
        assert!(request.video_id.is_empty());
        assert!(request.partial_card_file_name.is_empty());
    }

    #[test]
    fn test_full_details_file_parses() {
        let request: PlacementRequest = toml::from_str(
            "\
file_name = \"node_get_started\"
title = \"Get started with Node.js (video tutorial)\"
meta_title = \"Get Started with Node.js (Video Tutorial)\"
description = \"Learn to get started with Node.js.\"
menu_title = \"Get started with Node.js\"
short_summary = \"Walks through configuration and unsigned uploads.\"
partial_card_file_name = \"partial_card_node_get_started\"
github_url = \"https://github.com/example/node-image-upload\"
video_id = \"abc123\"
",
        )
        .unwrap();

        assert_eq!(request.menu_title, "Get started with Node.js");
        assert_eq!(request.video_id, "abc123");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<PlacementRequest, _> =
            toml::from_str("file_name = \"x\"\ntitle = \"X\"\nmistyped_field = \"y\"\n");
        assert!(result.is_err());
    }
}
