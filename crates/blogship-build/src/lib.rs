//! Image recipes, Containerfile rendering, and build-context staging for blogship.
//!
//! # Pipeline
//!
//! ```text
//! blogship build
//!   1. Toolchain  ── recipe::toolchain_spec() → .blogship/toolchain/Containerfile
//!                    engine build + extract /root/go/bin/hugo → .blogship/artifacts/hugo
//!   2. Context    ── copy sources (minus exclusions) → .blogship/context/site/
//!                    copy artifact → .blogship/context/hugo
//!   3. Containerfile ── ContainerfileGenerator::render(recipe::build_spec())
//!   4. Image      ── engine build .blogship/context
//! ```
//!
//! Everything in this crate is free of engine calls: recipes are plain
//! [`ImageSpec`](blogship_core::ImageSpec) values and staging only touches
//! the local filesystem.

pub mod containerfile;
pub mod context;
pub mod recipe;

pub use containerfile::ContainerfileGenerator;
pub use context::{CONTAINERFILE, ContextError, StagedContext};
