use blogship_build::containerfile::ContainerfileGenerator;
use blogship_build::{context, recipe};
use blogship_core::constants::{HUGO_PORT, IMAGE_REFERENCE};
use blogship_core::{BlogshipConfig, Credential, ImageSpec, SourceTree};
use blogship_engine::{EngineClient, EngineExecutor, RealExecutor, ServiceHandle};

use crate::error::PipelineError;

/// A locally built image and the spec it was rendered from.
#[derive(Debug, Clone)]
pub struct BuiltImage {
    pub tag: String,
    pub spec: ImageSpec,
}

/// Runs the blog's image pipeline against a container engine.
pub struct Orchestrator<E: EngineExecutor = RealExecutor> {
    engine: EngineClient<E>,
    config: BlogshipConfig,
}

impl Orchestrator<RealExecutor> {
    pub fn new(config: BlogshipConfig) -> Self {
        Self {
            engine: EngineClient::new(&config.engine.program),
            config,
        }
    }
}

impl<E: EngineExecutor> Orchestrator<E> {
    pub fn with_engine(engine: EngineClient<E>, config: BlogshipConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &EngineClient<E> {
        &self.engine
    }

    pub fn config(&self) -> &BlogshipConfig {
        &self.config
    }

    /// Build the debug-ready site image.
    pub async fn build(&self, source: &SourceTree) -> Result<BuiltImage, PipelineError> {
        let spec = recipe::build_spec(source);
        self.materialize(source, spec, &self.config.images.build_tag)
            .await
    }

    /// Build the production image with the server command frozen in.
    pub async fn prod(&self, source: &SourceTree) -> Result<BuiltImage, PipelineError> {
        let spec = recipe::prod_spec(source, self.config.serve.profile);
        self.materialize(source, spec, &self.config.images.prod_tag)
            .await
    }

    /// Build the debug image and start the preview server in it.
    ///
    /// Returns as soon as the container is scheduled; use
    /// [`supervise`](Self::supervise) and [`teardown`](Self::teardown)
    /// to follow or end it.
    pub async fn run(&self, source: &SourceTree) -> Result<ServiceHandle, PipelineError> {
        let image = self.build(source).await?;
        let command = recipe::preview_server_command();

        self.engine
            .start_service(&image.tag, &command, self.config.serve.host_port, HUGO_PORT)
            .await
            .map_err(|e| PipelineError::Service { source: e })
    }

    /// Stream the service's logs until it exits. A service that exits on
    /// its own has crashed; this never returns `Ok`.
    pub async fn supervise(&self, service: &ServiceHandle) -> Result<(), PipelineError> {
        self.engine
            .follow_logs(service)
            .await
            .map_err(|e| PipelineError::Service { source: e })?;

        let code = self
            .engine
            .wait_service(service)
            .await
            .map_err(|e| PipelineError::Service { source: e })?;

        Err(PipelineError::ServiceExited { code })
    }

    pub async fn teardown(&self, service: &ServiceHandle) -> Result<(), PipelineError> {
        self.engine
            .stop_service(service)
            .await
            .map_err(|e| PipelineError::Service { source: e })
    }

    /// Build the production image and push it to the blog's registry.
    ///
    /// Returns the pushed `repository@sha256:...` reference.
    pub async fn publish(
        &self,
        source: &SourceTree,
        credential: &Credential,
    ) -> Result<String, PipelineError> {
        let image = self.prod(source).await?;

        let digest = self
            .engine
            .publish(&image.tag, IMAGE_REFERENCE, credential)
            .await
            .map_err(|e| PipelineError::Publish { source: e })?;

        tracing::info!(%digest, "published");
        Ok(digest)
    }

    /// Fetch the toolchain, stage the site context, and build `spec` as `tag`.
    ///
    /// The toolchain is fetched first so a bad version tag fails before any
    /// source files are copied.
    async fn materialize(
        &self,
        source: &SourceTree,
        spec: ImageSpec,
        tag: &str,
    ) -> Result<BuiltImage, PipelineError> {
        let artifact = self.fetch_toolchain(source).await?;

        let containerfile = ContainerfileGenerator::new(&spec).render();
        let ctx = context::stage_site(source, &artifact.path, &containerfile)
            .map_err(|e| PipelineError::Stage { source: e })?;
        tracing::info!(files = ctx.file_count, dir = %ctx.dir.display(), "staged site context");

        self.engine
            .build_image(
                &ctx.dir,
                &ctx.containerfile(),
                tag,
                self.config.toolchain.platform.as_deref(),
            )
            .await
            .map_err(|e| PipelineError::Build { source: e })?;

        Ok(BuiltImage {
            tag: tag.to_owned(),
            spec,
        })
    }
}
