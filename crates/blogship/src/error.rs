use blogship_build::ContextError;
use blogship_engine::{BuildError, ExtractError, PublishError, ServiceError};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to build hugo toolchain ({module})")]
    Toolchain { module: String, source: BuildError },

    #[error("failed to extract hugo from toolchain image")]
    ToolchainExtract { source: ExtractError },

    #[error("failed to stage build context")]
    Stage { source: ContextError },

    #[error("failed to build site image")]
    Build { source: BuildError },

    #[error("preview service failed")]
    Service { source: ServiceError },

    #[error("preview service exited with status {code}")]
    ServiceExited { code: i64 },

    #[error("failed to publish image")]
    Publish { source: PublishError },
}
