use std::path::PathBuf;

use blogship_build::containerfile::ContainerfileGenerator;
use blogship_build::{context, recipe};
use blogship_core::SourceTree;
use blogship_core::constants::{HUGO_BUILD_TAGS, HUGO_MODULE, TOOLCHAIN_BINARY_PATH};
use blogship_engine::EngineExecutor;

use crate::error::PipelineError;
use crate::orchestrator::Orchestrator;

/// The Hugo binary compiled by the toolchain image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainArtifact {
    pub module: String,
    pub version: String,
    pub platform: Option<String>,
    pub build_tags: Vec<String>,
    /// Host path of the extracted executable.
    pub path: PathBuf,
}

impl ToolchainArtifact {
    /// `module@version`, as passed to `go install`.
    pub fn module_ref(&self) -> String {
        format!("{}@{}", self.module, self.version)
    }
}

impl<E: EngineExecutor> Orchestrator<E> {
    /// Compile Hugo (extended) in an ephemeral image and copy the binary out.
    ///
    /// No retries and no fallback version: an unknown tag or a compile error
    /// fails the whole pipeline.
    pub async fn fetch_toolchain(
        &self,
        source: &SourceTree,
    ) -> Result<ToolchainArtifact, PipelineError> {
        let toolchain = &self.config().toolchain;
        let spec = recipe::toolchain_spec(&toolchain.version);
        let artifact = ToolchainArtifact {
            module: HUGO_MODULE.to_owned(),
            version: toolchain.version.clone(),
            platform: toolchain.platform.clone(),
            build_tags: vec![HUGO_BUILD_TAGS.to_owned()],
            path: context::artifact_path(source),
        };
        tracing::info!(module = %artifact.module_ref(), "fetching toolchain");

        let ctx = context::stage_toolchain(source, &ContainerfileGenerator::new(&spec).render())
            .map_err(|e| PipelineError::Stage { source: e })?;

        let tag = &self.config().images.toolchain_tag;
        self.engine()
            .build_image(
                &ctx.dir,
                &ctx.containerfile(),
                tag,
                artifact.platform.as_deref(),
            )
            .await
            .map_err(|e| PipelineError::Toolchain {
                module: artifact.module_ref(),
                source: e,
            })?;

        self.engine()
            .extract_file(tag, TOOLCHAIN_BINARY_PATH, &artifact.path)
            .await
            .map_err(|e| PipelineError::ToolchainExtract { source: e })?;

        tracing::debug!(path = %artifact.path.display(), "toolchain artifact ready");
        Ok(artifact)
    }
}
