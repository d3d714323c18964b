//! Build, serve, and publish the blog's container image.
//!
//! [`Orchestrator`] exposes the four pipeline operations, layered leaves-first:
//!
//! | Operation | Depends on | Result |
//! |-----------|------------|--------|
//! | [`build`](Orchestrator::build) | toolchain fetch | debug image ([`BuiltImage`]) |
//! | [`prod`](Orchestrator::prod) | `build` recipe | image with a frozen entry point |
//! | [`run`](Orchestrator::run) | `build` | detached preview server ([`ServiceHandle`]) |
//! | [`publish`](Orchestrator::publish) | `prod` | pushed `repository@sha256:...` |
//!
//! Every stage is fatal on failure: no retries, no partial images.
//!
//! ```rust,no_run
//! use blogship::{BlogshipConfig, Orchestrator, SourceTree};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceTree::open(".")?;
//! let config = BlogshipConfig::load(source.root())?;
//! let orchestrator = Orchestrator::new(config);
//! let image = orchestrator.build(&source).await?;
//! println!("built {}", image.tag);
//! # Ok(())
//! # }
//! ```

mod error;
mod orchestrator;
mod toolchain;

pub use blogship_core::{BlogshipConfig, Credential, ImageSpec, ServeProfile, SourceTree};
pub use blogship_engine::ServiceHandle;
pub use error::PipelineError;
pub use orchestrator::{BuiltImage, Orchestrator};
pub use toolchain::ToolchainArtifact;

/// Image recipes, Containerfile rendering, and context staging.
///
/// See [`blogship-build`](blogship_build) for details.
pub mod build {
    pub use blogship_build::*;
}

/// Container engine operations.
///
/// See [`blogship-engine`](blogship_engine) for details.
pub mod engine {
    pub use blogship_engine::*;
}
