mod build;
mod doctor;
mod publish;
mod render;
mod run;

use std::path::Path;

use blogship_core::{BlogshipConfig, SourceTree};

pub use build::{build, prod};
pub use doctor::doctor;
pub use publish::publish;
pub use render::{RenderTarget, render};
pub use run::run;

/// Open the blog sources at `dir` and load their blogship.toml.
pub(crate) fn load(dir: &Path) -> anyhow::Result<(SourceTree, BlogshipConfig)> {
    let source = SourceTree::open(dir)?;
    let config = BlogshipConfig::load(source.root())?;
    Ok((source, config))
}
