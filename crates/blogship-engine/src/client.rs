use crate::engine::EngineError;
use crate::executor::{EngineExecutor, RealExecutor};
use blogship_core::Credential;
use secrecy::ExposeSecret;
use std::fmt;
use std::path::{Path, PathBuf};

/// Container engine client, parameterized over the executor for testability.
pub struct EngineClient<E: EngineExecutor = RealExecutor> {
    executor: E,
}

impl EngineClient<RealExecutor> {
    pub fn new(program: &str) -> Self {
        Self {
            executor: RealExecutor::new(program),
        }
    }
}

impl Default for EngineClient<RealExecutor> {
    fn default() -> Self {
        Self {
            executor: RealExecutor::default(),
        }
    }
}

impl<E: EngineExecutor> EngineClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Images ──

    /// Build `context` with the given Containerfile and tag the result.
    /// Build output is streamed to the terminal.
    pub async fn build_image(
        &self,
        context: &Path,
        containerfile: &Path,
        tag: &str,
        platform: Option<&str>,
    ) -> Result<(), BuildError> {
        let context_str = context.to_str().ok_or_else(|| BuildError::InvalidPath(context.into()))?;
        let file_str =
            containerfile.to_str().ok_or_else(|| BuildError::InvalidPath(containerfile.into()))?;

        let mut build_args = args(["build", "--tag", tag, "--file", file_str]);
        if let Some(platform) = platform {
            build_args.extend(args(["--platform", platform]));
        }
        build_args.push(context_str.to_owned());

        tracing::info!(tag, "building image");
        self.executor
            .exec_streaming(&build_args)
            .await
            .map_err(|e| BuildError::Build {
                tag: tag.to_owned(),
                source: e,
            })
    }

    /// Copy a single file out of `image` to `dest` on the host.
    ///
    /// The temporary container is removed even when the copy fails.
    pub async fn extract_file(
        &self,
        image: &str,
        path: &str,
        dest: &Path,
    ) -> Result<(), ExtractError> {
        let dest_str = dest.to_str().ok_or_else(|| ExtractError::InvalidPath(dest.into()))?;

        let id = self
            .executor
            .exec(&args(["create", image]))
            .await
            .map_err(|e| ExtractError::Create { source: e })?;
        let id = id.trim();

        let copied = self
            .executor
            .exec(&args(["cp", &format!("{id}:{path}"), dest_str]))
            .await;
        let removed = self.executor.exec(&args(["rm", "--force", id])).await;

        copied.map_err(|e| ExtractError::Copy {
            path: path.to_owned(),
            source: e,
        })?;
        removed.map_err(|e| ExtractError::Remove { source: e })?;

        tracing::debug!(image, path, dest = %dest.display(), "extracted file from image");
        Ok(())
    }

    /// Tag a local image with an additional reference.
    pub async fn tag_image(&self, image: &str, reference: &str) -> Result<(), PublishError> {
        self.executor
            .exec(&args(["tag", image, reference]))
            .await
            .map_err(|e| PublishError::Tag { source: e })?;
        Ok(())
    }

    // ── Services ──

    /// Start `image` detached, running `command` with `container_port`
    /// published on `host_port`. Returns as soon as the container exists.
    pub async fn start_service(
        &self,
        image: &str,
        command: &[String],
        host_port: u16,
        container_port: u16,
    ) -> Result<ServiceHandle, ServiceError> {
        let (entrypoint, rest) = command.split_first().ok_or(ServiceError::EmptyCommand)?;
        let publish = format!("{host_port}:{container_port}");

        let mut run_args = args([
            "run",
            "--detach",
            "--publish",
            &publish,
            "--entrypoint",
            entrypoint,
            image,
        ]);
        run_args.extend(rest.iter().cloned());

        let output = self
            .executor
            .exec(&run_args)
            .await
            .map_err(|e| ServiceError::Start { source: e })?;

        // `run --detach` may print pull progress before the id.
        let id = output
            .lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .ok_or(ServiceError::MissingContainerId)?;

        tracing::info!(container = id, host_port, "service started");
        Ok(ServiceHandle {
            id: id.to_owned(),
            image: image.to_owned(),
            host_port,
            container_port,
        })
    }

    /// Stream the service's output until its process exits.
    pub async fn follow_logs(&self, service: &ServiceHandle) -> Result<(), ServiceError> {
        self.executor
            .exec_streaming(&args(["logs", "--follow", &service.id]))
            .await
            .map_err(|e| ServiceError::Logs { source: e })
    }

    /// Block until the service's process exits, remove the container, and
    /// return the exit code.
    pub async fn wait_service(&self, service: &ServiceHandle) -> Result<i64, ServiceError> {
        let output = self
            .executor
            .exec(&args(["wait", &service.id]))
            .await
            .map_err(|e| ServiceError::Wait { source: e })?;

        let code = output
            .trim()
            .parse::<i64>()
            .map_err(|e| ServiceError::InvalidExitCode {
                output: output.trim().to_owned(),
                source: e,
            })?;

        self.executor
            .exec(&args(["rm", "--force", &service.id]))
            .await
            .map_err(|e| ServiceError::Stop { source: e })?;

        tracing::warn!(container = %service.id, code, "service exited");
        Ok(code)
    }

    /// Tear the service down (kill and remove its container).
    pub async fn stop_service(&self, service: &ServiceHandle) -> Result<(), ServiceError> {
        self.executor
            .exec(&args(["rm", "--force", &service.id]))
            .await
            .map_err(|e| ServiceError::Stop { source: e })?;

        tracing::info!(container = %service.id, "service stopped");
        Ok(())
    }

    // ── Registry ──

    /// Log in with `credential`, tag `image` as `reference`, push it, and
    /// return the pushed `repository@sha256:...` digest.
    ///
    /// Login state goes to a throwaway engine config directory that is
    /// deleted afterwards, so the secret never lands in the user's config.
    pub async fn publish(
        &self,
        image: &str,
        reference: &str,
        credential: &Credential,
    ) -> Result<String, PublishError> {
        let config_dir = tempfile::TempDir::new().map_err(|e| PublishError::ConfigDir { source: e })?;
        let config = config_dir
            .path()
            .to_str()
            .ok_or_else(|| PublishError::InvalidPath(config_dir.path().into()))?
            .to_owned();

        tracing::info!(
            registry = credential.registry(),
            username = credential.username(),
            "logging in to registry"
        );
        self.executor
            .exec_with_stdin(
                &args([
                    "--config",
                    &config,
                    "login",
                    credential.registry(),
                    "--username",
                    credential.username(),
                    "--password-stdin",
                ]),
                credential.secret().expose_secret().as_bytes(),
            )
            .await
            .map_err(|e| PublishError::Login { source: e })?;

        self.tag_image(image, reference).await?;

        tracing::info!(reference, "pushing image");
        self.executor
            .exec_streaming(&args(["--config", &config, "push", reference]))
            .await
            .map_err(|e| PublishError::Push { source: e })?;

        let digest = self.repo_digest(reference).await?;

        config_dir
            .close()
            .map_err(|e| PublishError::ConfigDir { source: e })?;

        Ok(digest)
    }

    async fn repo_digest(&self, reference: &str) -> Result<String, PublishError> {
        let output = self
            .executor
            .exec(&args([
                "image",
                "inspect",
                "--format",
                "{{json .RepoDigests}}",
                reference,
            ]))
            .await
            .map_err(|e| PublishError::Digest { source: e })?;

        let digests: Vec<String> = serde_json::from_str(output.trim())
            .map_err(|e| PublishError::DigestParse { source: e })?;

        let prefix = format!("{}@", repository_of(reference));
        digests
            .into_iter()
            .find(|d| d.starts_with(&prefix))
            .ok_or_else(|| PublishError::MissingDigest(reference.to_owned()))
    }

    // ── Doctor ──

    /// Run all engine checks without early return.
    pub async fn doctor(&self) -> DoctorReport {
        let mut report = DoctorReport::default();

        match self
            .executor
            .exec(&args(["version", "--format", "{{.Client.Version}}"]))
            .await
        {
            Ok(v) => report.engine = CheckResult::ok(v.trim()),
            Err(e) => report.engine = CheckResult::fail(&e.to_string()),
        }

        match self
            .executor
            .exec(&args(["info", "--format", "{{.ServerVersion}}"]))
            .await
        {
            Ok(v) if !v.trim().is_empty() => report.daemon = CheckResult::ok(v.trim()),
            Ok(_) => report.daemon = CheckResult::fail("daemon did not report a version"),
            Err(e) => {
                report.daemon = CheckResult::fail(&format!("daemon not reachable: {e}"))
            }
        }

        report
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

/// Strip a trailing `:tag` from an image reference, leaving registry ports alone.
fn repository_of(reference: &str) -> &str {
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].find(':') {
        Some(i) => &reference[..name_start + i],
        None => reference,
    }
}

// ── Service handle ──

/// A started, long-running container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub id: String,
    pub image: String,
    pub host_port: u16,
    pub container_port: u16,
}

impl ServiceHandle {
    pub fn url(&self) -> String {
        format!("http://localhost:{}/", self.host_port)
    }
}

// ── Doctor types ──

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub engine: CheckResult,
    pub daemon: CheckResult,
    pub source_dir: CheckResult,
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.engine.passed && self.daemon.passed && self.source_dir.passed && self.config_file.passed
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Engine CLI", &self.engine),
            ("Engine daemon", &self.daemon),
            ("Source directory", &self.source_dir),
            ("blogship.toml", &self.config_file),
        ];
        for (label, check) in rows {
            writeln!(f, "[{}] {label:<18} {}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("image build failed for {tag}")]
    Build { tag: String, source: EngineError },
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("destination path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("failed to create container for extraction")]
    Create { source: EngineError },

    #[error("failed to copy {path} out of container")]
    Copy { path: String, source: EngineError },

    #[error("failed to remove extraction container")]
    Remove { source: EngineError },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service command is empty")]
    EmptyCommand,

    #[error("failed to start service")]
    Start { source: EngineError },

    #[error("engine did not report a container id")]
    MissingContainerId,

    #[error("failed to follow service logs")]
    Logs { source: EngineError },

    #[error("failed to wait for service")]
    Wait { source: EngineError },

    #[error("engine reported an unreadable exit code: {output:?}")]
    InvalidExitCode {
        output: String,
        source: std::num::ParseIntError,
    },

    #[error("failed to remove service container")]
    Stop { source: EngineError },
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to create temporary engine config directory")]
    ConfigDir { source: std::io::Error },

    #[error("path is not valid UTF-8: {0}")]
    InvalidPath(PathBuf),

    #[error("registry login failed")]
    Login { source: EngineError },

    #[error("failed to tag image")]
    Tag { source: EngineError },

    #[error("image push failed")]
    Push { source: EngineError },

    #[error("failed to read pushed image digest")]
    Digest { source: EngineError },

    #[error("engine returned malformed digest list")]
    DigestParse { source: serde_json::Error },

    #[error("no registry digest recorded for {0}")]
    MissingDigest(String),
}
