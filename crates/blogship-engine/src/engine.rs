#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("container engine `{program}` not found; install Docker: https://docs.docker.com/get-docker/")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("engine command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("engine output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },

    #[error("failed to write to engine stdin")]
    StdinWrite { source: std::io::Error },
}
