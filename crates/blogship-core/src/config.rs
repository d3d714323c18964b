use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_FILE, HUGO_PORT, LATEST, PRODUCTION_BASE_URL};

/// blogship.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogshipConfig {
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub serve: ServeConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    /// Hugo release tag passed to `go install` (defaults to "latest")
    #[serde(default = "default_toolchain_version")]
    pub version: String,
    /// Target platform for engine builds, e.g. "linux/amd64".
    /// When None, the engine's native platform is used.
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Local tag of the debug image produced by `build`
    #[serde(default = "default_build_tag")]
    pub build_tag: String,
    /// Local tag of the frozen image produced by `prod`
    #[serde(default = "default_prod_tag")]
    pub prod_tag: String,
    /// Local tag of the ephemeral toolchain image
    #[serde(default = "default_toolchain_tag")]
    pub toolchain_tag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Deployment profile used when freezing the production entry point
    #[serde(default)]
    pub profile: ServeProfile,
    /// Host port mapped onto the container's Hugo port by `run`
    #[serde(default = "default_host_port")]
    pub host_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Docker-compatible CLI used to build, run, and push images
    #[serde(default = "default_engine_program")]
    pub program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Environment variable holding the registry token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

/// Named deployment profile for the frozen server command line.
///
/// The two differ only in whether Hugo is told its public base URL or
/// falls back to the `baseURL` in the site configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeProfile {
    #[default]
    Production,
    Default,
}

impl ServeProfile {
    /// Base URL passed as `--baseURL`, if the profile pins one.
    pub fn base_url(self) -> Option<&'static str> {
        match self {
            Self::Production => Some(PRODUCTION_BASE_URL),
            Self::Default => None,
        }
    }
}

impl fmt::Display for ServeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Default => f.write_str("default"),
        }
    }
}

impl std::str::FromStr for ServeProfile {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "production" => Ok(Self::Production),
            "default" => Ok(Self::Default),
            _ => Err(crate::Error::InvalidConfig {
                field: "serve.profile",
                reason: "expected \"production\" or \"default\"",
            }),
        }
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            version: default_toolchain_version(),
            platform: None,
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            build_tag: default_build_tag(),
            prod_tag: default_prod_tag(),
            toolchain_tag: default_toolchain_tag(),
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            profile: ServeProfile::default(),
            host_port: default_host_port(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            token_env: default_token_env(),
        }
    }
}

impl BlogshipConfig {
    /// Load from blogship.toml in the given directory, or return defaults if not found.
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load(source_dir: &Path) -> crate::Result<Self> {
        let config_path = source_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path.clone(),
                source: e,
            })?
        } else {
            Self::default()
        };

        tracing::debug!(path = %config_path.display(), ?config, "loaded configuration");
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.toolchain.version.trim().is_empty() {
            return Err(crate::Error::InvalidConfig {
                field: "toolchain.version",
                reason: "must not be empty",
            });
        }
        if self
            .toolchain
            .platform
            .as_deref()
            .is_some_and(|p| p.trim().is_empty())
        {
            return Err(crate::Error::InvalidConfig {
                field: "toolchain.platform",
                reason: "must not be empty; omit it to use the engine's platform",
            });
        }
        let tags = [
            ("images.build_tag", &self.images.build_tag),
            ("images.prod_tag", &self.images.prod_tag),
            ("images.toolchain_tag", &self.images.toolchain_tag),
        ];
        for (field, tag) in tags {
            if tag.trim().is_empty() {
                return Err(crate::Error::InvalidConfig {
                    field,
                    reason: "must not be empty",
                });
            }
        }
        if self.serve.host_port == 0 {
            return Err(crate::Error::InvalidConfig {
                field: "serve.host_port",
                reason: "must be a non-zero port",
            });
        }
        if self.engine.program.trim().is_empty() {
            return Err(crate::Error::InvalidConfig {
                field: "engine.program",
                reason: "must not be empty",
            });
        }
        Ok(())
    }
}

fn default_toolchain_version() -> String {
    LATEST.to_owned()
}

fn default_build_tag() -> String {
    "blog.kgb33.dev:build".to_owned()
}

fn default_prod_tag() -> String {
    "blog.kgb33.dev:prod".to_owned()
}

fn default_toolchain_tag() -> String {
    "blog.kgb33.dev-hugo:toolchain".to_owned()
}

fn default_host_port() -> u16 {
    HUGO_PORT
}

fn default_engine_program() -> String {
    "docker".to_owned()
}

fn default_token_env() -> String {
    "GHCR_TOKEN".to_owned()
}
