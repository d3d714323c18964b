//! Container engine operations for blogship.
//!
//! All engine access goes through [`EngineExecutor`], which shells out to a
//! Docker-compatible CLI in production ([`RealExecutor`]) and is mocked in
//! tests. [`EngineClient`] turns executor calls into typed operations:
//! build, extract, run/wait/stop, and login + push.

pub mod client;
pub mod engine;
pub mod executor;

pub use client::{
    BuildError, CheckResult, DoctorReport, EngineClient, ExtractError, PublishError,
    ServiceError, ServiceHandle,
};
pub use engine::EngineError;
pub use executor::{EngineExecutor, RealExecutor};
