use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("source directory {0} does not exist or is not a directory")]
    SourceNotFound(PathBuf),

    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("registry token in {0} is empty")]
    EmptyToken(String),

    #[error("failed to read env file {path}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error(
        "registry token {var} comes from {path}, which is inside the site sources and would be copied into the image; export {var} or move the file"
    )]
    TokenInSource { var: String, path: PathBuf },
}
