use std::path::{Path, PathBuf};

use crate::constants::{SOURCE_EXCLUDES, STAGING_DIR};

/// The blog's source files, as handed to a build.
///
/// Exclusions use `.dockerignore`-style literal entries relative to the
/// root: `public` excludes `public/` and everything below it, but not
/// `content/public/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: PathBuf,
    exclude: Vec<String>,
}

impl SourceTree {
    /// A source tree at `root` with the fixed site exclusions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_exclusions(root, SOURCE_EXCLUDES)
    }

    pub fn with_exclusions<I, S>(root: impl Into<PathBuf>, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Like [`SourceTree::new`], but fails if `root` is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> crate::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(crate::Error::SourceNotFound(root));
        }
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclude
    }

    /// Whether a root-relative path falls under one of the exclusions.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude
            .iter()
            .any(|entry| relative.starts_with(Path::new(entry)))
    }

    /// Scratch directory for contexts and artifacts; skipped when copying sources.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }
}
