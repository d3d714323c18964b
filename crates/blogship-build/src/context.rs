use std::path::{Path, PathBuf};

use blogship_core::SourceTree;
use blogship_core::constants::STAGING_DIR;

use crate::recipe::{ARTIFACT_CONTEXT_PATH, SITE_CONTEXT_PATH};

/// File name of the generated Containerfile inside every staged context.
pub const CONTAINERFILE: &str = "Containerfile";

const TOOLCHAIN_DIR: &str = "toolchain";
const SITE_DIR: &str = "context";
const ARTIFACTS_DIR: &str = "artifacts";

/// A build context ready to hand to the engine.
#[derive(Debug, Clone)]
pub struct StagedContext {
    pub dir: PathBuf,
    /// Number of source files copied (zero for the toolchain context).
    pub file_count: usize,
}

impl StagedContext {
    pub fn containerfile(&self) -> PathBuf {
        self.dir.join(CONTAINERFILE)
    }
}

/// Where the extracted generator binary is kept between stages.
pub fn artifact_path(source: &SourceTree) -> PathBuf {
    source
        .staging_dir()
        .join(ARTIFACTS_DIR)
        .join(ARTIFACT_CONTEXT_PATH)
}

/// Prepares the toolchain context: an otherwise empty directory holding
/// only the Containerfile. Also makes sure the artifacts directory exists.
pub fn stage_toolchain(
    source: &SourceTree,
    containerfile: &str,
) -> Result<StagedContext, ContextError> {
    let dir = source.staging_dir().join(TOOLCHAIN_DIR);
    recreate_dir(&dir)?;
    write_containerfile(&dir, containerfile)?;

    let artifacts = source.staging_dir().join(ARTIFACTS_DIR);
    std::fs::create_dir_all(&artifacts).map_err(|e| ContextError::Create {
        path: artifacts,
        source: e,
    })?;

    Ok(StagedContext { dir, file_count: 0 })
}

/// Prepares the site context: sources minus exclusions under `site/`,
/// the generator binary at `hugo`, and the Containerfile.
pub fn stage_site(
    source: &SourceTree,
    artifact: &Path,
    containerfile: &str,
) -> Result<StagedContext, ContextError> {
    if !artifact.is_file() {
        return Err(ContextError::MissingArtifact(artifact.to_path_buf()));
    }

    let dir = source.staging_dir().join(SITE_DIR);
    recreate_dir(&dir)?;

    let site_dir = dir.join(SITE_CONTEXT_PATH);
    create_dir(&site_dir)?;
    let file_count = copy_tree(source, source.root(), Path::new(""), &site_dir)?;

    let artifact_dst = dir.join(ARTIFACT_CONTEXT_PATH);
    std::fs::copy(artifact, &artifact_dst).map_err(|e| ContextError::CopyFile {
        path: artifact.to_path_buf(),
        source: e,
    })?;

    write_containerfile(&dir, containerfile)?;

    tracing::debug!(dir = %dir.display(), file_count, "staged site context");
    Ok(StagedContext { dir, file_count })
}

/// Copies `from` (at `relative` below the source root) into `to`,
/// skipping excluded entries and the staging directory.
fn copy_tree(
    source: &SourceTree,
    from: &Path,
    relative: &Path,
    to: &Path,
) -> Result<usize, ContextError> {
    let mut entries = std::fs::read_dir(from)
        .map_err(|e| ContextError::ReadDir {
            path: from.to_path_buf(),
            source: e,
        })?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ContextError::ReadDir {
            path: from.to_path_buf(),
            source: e,
        })?;
    entries.sort_by_key(|e| e.file_name());

    let mut copied = 0;
    for entry in entries {
        let rel = relative.join(entry.file_name());
        if rel == Path::new(STAGING_DIR) || source.is_excluded(&rel) {
            tracing::trace!(path = %rel.display(), "excluded from context");
            continue;
        }

        let src = entry.path();
        let meta = std::fs::symlink_metadata(&src).map_err(|e| ContextError::CopyFile {
            path: src.clone(),
            source: e,
        })?;
        let dst = to.join(entry.file_name());

        if meta.file_type().is_symlink() {
            // Kept as a link, the way the engine's COPY treats it.
            copy_symlink(&src, &dst)?;
            copied += 1;
        } else if meta.is_dir() {
            create_dir(&dst)?;
            copied += copy_tree(source, &src, &rel, &dst)?;
        } else {
            std::fs::copy(&src, &dst).map_err(|e| ContextError::CopyFile {
                path: src,
                source: e,
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), ContextError> {
    let target = std::fs::read_link(src).map_err(|e| ContextError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })?;
    std::os::unix::fs::symlink(&target, dst).map_err(|e| ContextError::CopyFile {
        path: src.to_path_buf(),
        source: e,
    })
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, _dst: &Path) -> Result<(), ContextError> {
    tracing::warn!(path = %src.display(), "skipping symlink");
    Ok(())
}

fn recreate_dir(dir: &Path) -> Result<(), ContextError> {
    // Clean previous context
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| ContextError::Cleanup {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|e| ContextError::Create {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn create_dir(dir: &Path) -> Result<(), ContextError> {
    std::fs::create_dir_all(dir).map_err(|e| ContextError::Create {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn write_containerfile(dir: &Path, content: &str) -> Result<(), ContextError> {
    let path = dir.join(CONTAINERFILE);
    std::fs::write(&path, content).map_err(|e| ContextError::WriteContainerfile { path, source: e })
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to clean up context directory {path}")]
    Cleanup {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {path}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read directory {path}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to copy file {path}")]
    CopyFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write Containerfile at {path}")]
    WriteContainerfile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("toolchain artifact missing at {0}; was the toolchain fetched?")]
    MissingArtifact(PathBuf),
}
