//! Core types and configuration for blogship.
//!
//! This crate defines the declarative image model ([`ImageSpec`]), the site
//! sources handed to a build ([`SourceTree`]), registry authentication
//! material ([`Credential`]), the `blogship.toml` schema ([`BlogshipConfig`]),
//! and shared error types.
//!
//! The fixed parameters of the blog pipeline (base image, packages,
//! exclusions, registry coordinates) live in [`constants`].

pub mod config;
pub mod constants;
pub mod credential;
pub mod error;
pub mod image;
pub mod source;

pub use config::{
    BlogshipConfig, EngineConfig, ImagesConfig, PublishConfig, ServeConfig, ServeProfile,
    ToolchainConfig,
};
pub use credential::Credential;
pub use error::{Error, Result};
pub use image::{ImageSpec, Instruction};
pub use source::SourceTree;
