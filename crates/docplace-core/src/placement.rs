//! The placement state machine.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use docplace_catalog::{CatalogEntry, CatalogError, LocaleDocument};
use docplace_content::{PageFields, append_partial_reference, derive};
use docplace_menu::{LeafEntry, MenuError, MenuNode, MenuTree};

use crate::report::{Artifact, SerializationReport, write_all};
use crate::request::PlacementRequest;

/// Filesystem locations of the artifacts a placement run touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementPaths {
    /// Menu tree JSON file.
    pub menu: PathBuf,
    /// Locale YAML file.
    pub locale: PathBuf,
    /// Template page the new content is derived from.
    pub template: PathBuf,
    /// Directory holding content documents (`<id>.html.md`).
    pub views_dir: PathBuf,
}

/// Seam for operator anchor selection.
///
/// Receives the flattened leaves and returns the index of the chosen anchor.
/// Implementations may prompt interactively; the core only sees the result.
pub trait AnchorSelector {
    /// Pick an anchor from the flattened leaves.
    fn select(&mut self, leaves: &[LeafEntry]) -> Result<usize, PlacementError>;
}

/// Lifecycle of a placement run. Each state is attempted exactly once; there
/// is no automatic retry across states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Stage {
    /// Not yet started.
    #[default]
    Idle,
    /// Artifacts loaded, waiting for the operator to pick an anchor.
    AwaitingAnchorSelection,
    /// Mutating the in-memory tree and catalog, deriving content.
    Mutating,
    /// Writing mutated artifacts.
    Serializing,
    /// All artifacts committed.
    Done,
    /// Terminal failure: the anchor was absent from a structure.
    AnchorNotFound,
    /// Terminal failure: at least one artifact write failed.
    SerializationFailed,
}

/// Error type for placement runs.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// Reading a persisted artifact failed.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// The artifact that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The persisted menu tree is malformed.
    #[error("{0}")]
    Menu(#[from] MenuError),

    /// The persisted locale catalog is malformed.
    #[error("{0}")]
    Catalog(CatalogError),

    /// The anchor identifier is absent from the tree or catalog.
    #[error("anchor `{0}` not found")]
    AnchorNotFound(String),

    /// The page is already placed (duplicate menu id or catalog key).
    #[error("page `{0}` is already placed")]
    Duplicate(String),

    /// The menu tree has no leaf pages to anchor on.
    #[error("menu tree has no leaf pages")]
    EmptyMenu,

    /// The operator selection is outside the flattened leaf range.
    #[error("selection {index} is out of range (1..={len})")]
    SelectionOutOfRange {
        /// 0-based selected index.
        index: usize,
        /// Number of selectable leaves.
        len: usize,
    },

    /// The operator aborted or supplied unusable input.
    #[error("anchor selection failed: {0}")]
    Selection(String),

    /// Invalid request data, rejected before any mutation.
    #[error("{0}")]
    Validation(String),

    /// A placement value was executed twice.
    #[error("placement already executed")]
    AlreadyRun,

    /// At least one artifact write failed; the report says which artifacts
    /// were and were not committed.
    #[error("{0}")]
    Serialization(SerializationReport),
}

/// Result of a successful placement run.
#[derive(Debug)]
pub struct PlacementOutcome {
    /// The anchor the operator chose.
    pub anchor: LeafEntry,
    /// Path of the newly created content document.
    pub new_page: PathBuf,
    /// Per-artifact commit report (complete on success).
    pub report: SerializationReport,
    /// Non-fatal conditions observed during the run.
    pub warnings: Vec<String>,
}

/// Coordinates one placement run.
///
/// Constructed fresh per run; no state is shared across invocations. A
/// failed run leaves no partially written artifacts before the serializing
/// stage, but in-memory mutations are not rolled back — retry means a fresh
/// reload, not a resume.
#[derive(Debug)]
pub struct Placement {
    paths: PlacementPaths,
    request: PlacementRequest,
    locale: String,
    section: String,
    stage: Stage,
}

impl Placement {
    /// Create a placement run over the given artifacts.
    #[must_use]
    pub fn new(
        paths: PlacementPaths,
        request: PlacementRequest,
        locale: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            request,
            locale: locale.into(),
            section: section.into(),
            stage: Stage::Idle,
        }
    }

    /// Current lifecycle stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Execute the run: load, select, mutate, derive, serialize.
    ///
    /// # Errors
    ///
    /// Fatal errors (`Read`, `Menu`, `Catalog`, `AnchorNotFound`,
    /// `Duplicate`, selection errors) abort before any artifact is written.
    /// [`PlacementError::Serialization`] means some artifacts may already be
    /// on disk; its report says exactly which.
    pub fn run(
        &mut self,
        selector: &mut dyn AnchorSelector,
    ) -> Result<PlacementOutcome, PlacementError> {
        if self.stage != Stage::Idle {
            return Err(PlacementError::AlreadyRun);
        }
        if self.request.file_name.is_empty() {
            return Err(PlacementError::Validation(
                "request file_name must not be empty".to_owned(),
            ));
        }

        // Load everything up front; parse failures abort before selection.
        let mut menu = MenuTree::from_json(&read(&self.paths.menu)?)?;
        let mut locale_doc =
            LocaleDocument::from_yaml(&read(&self.paths.locale)?, &self.locale, &self.section)
                .map_err(PlacementError::Catalog)?;
        let mut catalog = locale_doc.catalog().map_err(PlacementError::Catalog)?;
        let template = read(&self.paths.template)?;

        // Anchor selection: the only suspension point. Out-of-range input is
        // rejected before any mutation begins.
        self.stage = Stage::AwaitingAnchorSelection;
        let leaves: Vec<LeafEntry> = menu.leaves().collect();
        if leaves.is_empty() {
            return Err(PlacementError::EmptyMenu);
        }
        let index = selector.select(&leaves)?;
        let Some(anchor) = leaves.get(index).cloned() else {
            return Err(PlacementError::SelectionOutOfRange {
                index,
                len: leaves.len(),
            });
        };
        info!(anchor = %anchor.id, "anchor selected");

        // Mutate in memory. Duplicates fail loudly rather than silently
        // inserting a second copy.
        self.stage = Stage::Mutating;
        let key = self.request.file_name.clone();
        if menu.contains(&key) {
            return Err(PlacementError::Duplicate(key));
        }
        if !menu.insert_after(&anchor.id, MenuNode::page(key.as_str())) {
            self.stage = Stage::AnchorNotFound;
            return Err(PlacementError::AnchorNotFound(anchor.id.clone()));
        }
        match catalog.insert_after(&anchor.id, key.as_str(), self.catalog_entry()) {
            Ok(()) => {}
            Err(CatalogError::AnchorNotFound(anchor_key)) => {
                self.stage = Stage::AnchorNotFound;
                return Err(PlacementError::AnchorNotFound(anchor_key));
            }
            Err(CatalogError::DuplicateKey(key)) => {
                return Err(PlacementError::Duplicate(key));
            }
            Err(err) => return Err(PlacementError::Catalog(err)),
        }
        locale_doc
            .set_catalog(&catalog)
            .map_err(PlacementError::Catalog)?;

        let mut warnings = Vec::new();
        let derived = derive(
            &template,
            &PageFields {
                video_id: Some(self.request.video_id.clone()),
                external_link: Some(self.request.github_url.clone()),
                overview: Some(self.request.short_summary.clone()),
            },
        );
        warnings.extend(derived.warnings.iter().map(ToString::to_string));

        let new_page = self.page_path(&key);
        let mut artifacts = vec![
            Artifact::new(&self.paths.menu, menu.to_json()? + "\n"),
            Artifact::new(
                &self.paths.locale,
                locale_doc.to_yaml().map_err(PlacementError::Catalog)?,
            ),
            Artifact::new(&new_page, derived.content),
        ];
        artifacts.extend(self.patch_ancestors(&anchor, &mut warnings));

        // Best-effort batch: all in-memory mutations succeeded, write
        // everything and report exactly what was committed.
        self.stage = Stage::Serializing;
        let report = write_all(artifacts);
        if !report.is_complete() {
            self.stage = Stage::SerializationFailed;
            return Err(PlacementError::Serialization(report));
        }

        self.stage = Stage::Done;
        Ok(PlacementOutcome {
            anchor,
            new_page,
            report,
            warnings,
        })
    }

    /// Build the localized record for the new page.
    fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            title: Some(self.request.title.clone()),
            meta_title: Some(self.request.meta_title.clone()),
            description: Some(self.request.description.clone()),
            menu_title: Some(self.request.menu_title.clone()),
            ..CatalogEntry::default()
        }
    }

    /// Patch up to two nearest ancestor pages with a partial-card reference.
    ///
    /// Every problem here (no partial name, missing ancestor document, no
    /// marker to anchor on) is a warning, never fatal.
    fn patch_ancestors(&self, anchor: &LeafEntry, warnings: &mut Vec<String>) -> Vec<Artifact> {
        let partial = &self.request.partial_card_file_name;
        if partial.is_empty() {
            debug!("no partial card name supplied, ancestors untouched");
            return Vec::new();
        }

        let mut patched = Vec::new();
        for ancestor_id in anchor.path.iter().rev().take(2) {
            let path = self.page_path(ancestor_id);
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(page = ancestor_id, %err, "ancestor page not readable");
                    warnings.push(format!(
                        "ancestor page `{ancestor_id}` not patched: {err}"
                    ));
                    continue;
                }
            };
            match append_partial_reference(&content, partial) {
                Some(updated) => patched.push(Artifact::new(path, updated)),
                None => {
                    warnings.push(format!(
                        "ancestor page `{ancestor_id}` has no partial card marker, skipped"
                    ));
                }
            }
        }
        patched
    }

    /// Content document path for a page identifier.
    fn page_path(&self, id: &str) -> PathBuf {
        self.paths.views_dir.join(format!("{id}.html.md"))
    }
}

/// Read a persisted artifact fully into memory.
fn read(path: &Path) -> Result<String, PlacementError> {
    std::fs::read_to_string(path).map_err(|source| PlacementError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MENU: &str = r#"[
  {
    "id": "a",
    "children": [
      { "id": "b" },
      { "id": "c" }
    ]
  }
]"#;

    const LOCALE: &str = "\
en:
  docs:
    x:
      title: X
    b:
      title: B
    y:
      title: Y
";

    const TEMPLATE: &str = "\
videoId: \"old\"

## Overview

Old summary.

## Tutorial

[githublink]: https://github.com/example/old
";

    struct Fixed(usize);

    impl AnchorSelector for Fixed {
        fn select(&mut self, _leaves: &[LeafEntry]) -> Result<usize, PlacementError> {
            Ok(self.0)
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        paths: PlacementPaths,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let views_dir = dir.path().join("views");
        std::fs::create_dir(&views_dir).unwrap();

        let paths = PlacementPaths {
            menu: dir.path().join("menu.json"),
            locale: dir.path().join("en.yml"),
            template: views_dir.join("template.html.md"),
            views_dir,
        };
        std::fs::write(&paths.menu, MENU).unwrap();
        std::fs::write(&paths.locale, LOCALE).unwrap();
        std::fs::write(&paths.template, TEMPLATE).unwrap();
        Fixture { _dir: dir, paths }
    }

    fn request() -> PlacementRequest {
        PlacementRequest {
            file_name: "new".to_owned(),
            title: "New page".to_owned(),
            meta_title: "New Page".to_owned(),
            description: "A new page.".to_owned(),
            menu_title: "New".to_owned(),
            short_summary: "New summary.".to_owned(),
            partial_card_file_name: "partial_card_new".to_owned(),
            github_url: "https://github.com/example/new".to_owned(),
            video_id: "abc123".to_owned(),
        }
    }

    fn placement(fx: &Fixture, request: PlacementRequest) -> Placement {
        Placement::new(fx.paths.clone(), request, "en", "docs")
    }

    #[test]
    fn test_end_to_end_places_page_after_anchor() {
        let fx = fixture();
        let mut run = placement(&fx, request());

        // Leaves are [b, c]; select b.
        let outcome = run.run(&mut Fixed(0)).unwrap();

        assert_eq!(run.stage(), Stage::Done);
        assert_eq!(outcome.anchor.id, "b");

        let menu = MenuTree::from_json(&std::fs::read_to_string(&fx.paths.menu).unwrap()).unwrap();
        let ids: Vec<_> = menu.leaves().map(|leaf| leaf.id).collect();
        assert_eq!(ids, vec!["b", "new", "c"]);

        let locale =
            LocaleDocument::from_yaml(&std::fs::read_to_string(&fx.paths.locale).unwrap(), "en", "docs")
                .unwrap();
        assert_eq!(locale.catalog().unwrap().keys(), vec!["x", "b", "new", "y"]);

        let page = std::fs::read_to_string(&outcome.new_page).unwrap();
        assert!(page.contains("videoId: \"abc123\""));
        assert!(page.contains("New summary."));
        assert!(page.contains("[githublink]: https://github.com/example/new"));
    }

    #[test]
    fn test_ancestor_page_patched_with_partial_reference() {
        let fx = fixture();
        std::fs::write(
            fx.paths.views_dir.join("a.html.md"),
            "# Section\n\n<<partial_card_existing>>\n",
        )
        .unwrap();
        let mut run = placement(&fx, request());

        let outcome = run.run(&mut Fixed(0)).unwrap();

        let patched = std::fs::read_to_string(fx.paths.views_dir.join("a.html.md")).unwrap();
        assert!(patched.contains("<<partial_card_existing>>\n<<partial_card_new>>"));
        assert!(outcome.report.committed.len() >= 4);
    }

    #[test]
    fn test_missing_ancestor_page_is_a_warning() {
        let fx = fixture();
        let mut run = placement(&fx, request());

        let outcome = run.run(&mut Fixed(0)).unwrap();

        assert!(
            outcome
                .warnings
                .iter()
                .any(|warning| warning.contains("ancestor page `a`"))
        );
    }

    #[test]
    fn test_ancestor_without_marker_is_a_warning() {
        let fx = fixture();
        std::fs::write(fx.paths.views_dir.join("a.html.md"), "# No cards here\n").unwrap();
        let mut run = placement(&fx, request());

        let outcome = run.run(&mut Fixed(0)).unwrap();

        assert!(
            outcome
                .warnings
                .iter()
                .any(|warning| warning.contains("no partial card marker"))
        );
    }

    #[test]
    fn test_out_of_range_selection_rejected_before_mutation() {
        let fx = fixture();
        let mut run = placement(&fx, request());

        let err = run.run(&mut Fixed(99)).unwrap_err();

        assert!(matches!(
            err,
            PlacementError::SelectionOutOfRange { index: 99, len: 2 }
        ));
        // Nothing was written.
        assert_eq!(std::fs::read_to_string(&fx.paths.menu).unwrap(), MENU);
        assert_eq!(std::fs::read_to_string(&fx.paths.locale).unwrap(), LOCALE);
        assert!(!fx.paths.views_dir.join("new.html.md").exists());
    }

    #[test]
    fn test_catalog_anchor_missing_aborts_without_writes() {
        let fx = fixture();
        // Catalog without the `b` key the menu anchor needs.
        std::fs::write(&fx.paths.locale, "en:\n  docs:\n    x:\n      title: X\n").unwrap();
        let mut run = placement(&fx, request());

        let err = run.run(&mut Fixed(0)).unwrap_err();

        assert!(matches!(err, PlacementError::AnchorNotFound(_)));
        assert_eq!(run.stage(), Stage::AnchorNotFound);
        assert_eq!(std::fs::read_to_string(&fx.paths.menu).unwrap(), MENU);
        assert!(!fx.paths.views_dir.join("new.html.md").exists());
    }

    #[test]
    fn test_duplicate_page_fails_loudly() {
        let fx = fixture();
        let mut first = placement(&fx, request());
        first.run(&mut Fixed(0)).unwrap();

        let mut second = placement(&fx, request());
        let err = second.run(&mut Fixed(0)).unwrap_err();

        assert!(matches!(err, PlacementError::Duplicate(_)));
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let fx = fixture();
        let mut run = placement(&fx, request());
        run.run(&mut Fixed(0)).unwrap();

        let err = run.run(&mut Fixed(0)).unwrap_err();
        assert!(matches!(err, PlacementError::AlreadyRun));
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let fx = fixture();
        let mut run = placement(
            &fx,
            PlacementRequest {
                file_name: String::new(),
                ..request()
            },
        );

        let err = run.run(&mut Fixed(0)).unwrap_err();
        assert!(matches!(err, PlacementError::Validation(_)));
    }

    #[test]
    fn test_missing_menu_file_is_a_read_error() {
        let fx = fixture();
        std::fs::remove_file(&fx.paths.menu).unwrap();
        let mut run = placement(&fx, request());

        let err = run.run(&mut Fixed(0)).unwrap_err();
        assert!(matches!(err, PlacementError::Read { .. }));
    }

    #[test]
    fn test_empty_fields_surface_as_warnings() {
        let fx = fixture();
        let mut run = placement(
            &fx,
            PlacementRequest {
                video_id: String::new(),
                ..request()
            },
        );

        let outcome = run.run(&mut Fixed(0)).unwrap();

        assert!(
            outcome
                .warnings
                .iter()
                .any(|warning| warning.contains("empty value"))
        );
        let page = std::fs::read_to_string(&outcome.new_page).unwrap();
        assert!(page.contains("videoId: \"\""));
    }
}
