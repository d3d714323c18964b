use crate::engine::EngineError;

/// Abstraction over container engine CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait EngineExecutor: Send + Sync {
    /// Execute an engine command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, EngineError>;

    /// Execute an engine command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), EngineError>;

    /// Execute an engine command with data piped to stdin.
    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, EngineError>;
}

/// Real Docker-compatible CLI executor.
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        tracing::debug!(program = %self.program, ?args, "running engine command");
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> EngineError {
        EngineError::NotFound {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl EngineExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, EngineError> {
        use std::process::Stdio;

        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| EngineError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(EngineError::CommandFailed {
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), EngineError> {
        use std::process::Stdio;

        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(EngineError::CommandFailed {
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, EngineError> {
        use std::process::Stdio;
        use tokio::io::AsyncWriteExt;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_data)
                .await
                .map_err(|e| EngineError::StdinWrite { source: e })?;
            stdin
                .shutdown()
                .await
                .map_err(|e| EngineError::StdinWrite { source: e })?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.not_found(e))?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| EngineError::InvalidUtf8 { source: e })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(EngineError::CommandFailed {
                args: args.to_vec(),
                stderr,
            })
        }
    }
}
