use std::fmt;
use std::path::Path;

use secrecy::SecretString;

use crate::constants::{REGISTRY_HOST, REGISTRY_USER};

/// Registry authentication material.
///
/// The secret is wrapped in [`SecretString`] and redacted from `Debug`
/// output; it is only exposed when handed to the engine's stdin.
#[derive(Clone)]
pub struct Credential {
    registry: String,
    username: String,
    secret: SecretString,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl Credential {
    pub fn new(
        registry: impl Into<String>,
        username: impl Into<String>,
        secret: SecretString,
    ) -> Self {
        Self {
            registry: registry.into(),
            username: username.into(),
            secret,
        }
    }

    /// Credential for the blog's fixed registry account.
    pub fn for_blog_registry(secret: SecretString) -> Self {
        Self::new(REGISTRY_HOST, REGISTRY_USER, secret)
    }

    /// Read the registry token from `var`, falling back to the nearest `.env`.
    ///
    /// A token that only exists in a `.env` under `source_root` is refused:
    /// that file is staged with the site and would end up in the image.
    pub fn from_env(var: &str, source_root: &Path) -> crate::Result<Self> {
        if let Ok(token) = std::env::var(var) {
            return Self::from_token(var, token);
        }

        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(dotenv = %path.display(), var, "loading registry token");
                Self::from_env_file(var, &path, source_root)
            }
            Err(e) => {
                tracing::debug!(error = %e, var, "no .env loaded");
                Err(crate::Error::MissingEnvVar(var.to_owned()))
            }
        }
    }

    /// Read the registry token from `var` in the dotenv file at `path`.
    pub fn from_env_file(var: &str, path: &Path, source_root: &Path) -> crate::Result<Self> {
        let env_file_err = |e| crate::Error::EnvFile {
            path: path.to_path_buf(),
            source: e,
        };

        let mut token = None;
        for item in dotenvy::from_path_iter(path).map_err(env_file_err)? {
            let (key, value) = item.map_err(env_file_err)?;
            if key == var {
                token = Some(value);
            }
        }
        let token = token.ok_or_else(|| crate::Error::MissingEnvVar(var.to_owned()))?;

        if is_within(path, source_root) {
            return Err(crate::Error::TokenInSource {
                var: var.to_owned(),
                path: path.to_path_buf(),
            });
        }
        Self::from_token(var, token)
    }

    fn from_token(var: &str, token: String) -> crate::Result<Self> {
        if token.trim().is_empty() {
            return Err(crate::Error::EmptyToken(var.to_owned()));
        }
        Ok(Self::for_blog_registry(SecretString::from(token)))
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

fn is_within(path: &Path, root: &Path) -> bool {
    match (path.canonicalize(), root.canonicalize()) {
        (Ok(path), Ok(root)) => path.starts_with(root),
        _ => path.starts_with(root),
    }
}
