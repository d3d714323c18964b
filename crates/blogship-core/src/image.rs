//! Declarative container image description.
//!
//! An [`ImageSpec`] is built up by chaining `with_*` methods, each of which
//! consumes the spec and returns a refined copy. Nothing touches a container
//! engine until the spec is rendered and built elsewhere.
//!
//! ```
//! use blogship_core::ImageSpec;
//!
//! let spec = ImageSpec::from_base("cgr.dev/chainguard/wolfi-base")
//!     .with_packages(["go", "git"])
//!     .with_workdir("/blog")
//!     .with_exec(["hugo", "mod", "get"])
//!     .with_exposed_port(1313);
//!
//! assert_eq!(spec.packages(), vec!["go", "git"]);
//! assert_eq!(spec.workdir(), Some("/blog"));
//! ```

use std::collections::{BTreeMap, BTreeSet};

/// A filesystem-affecting step, applied in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Install distribution packages.
    Packages(Vec<String>),
    /// Set an environment variable for later steps and the running image.
    Env { key: String, value: String },
    /// Copy a single file from the build context to `dest`.
    File { source: String, dest: String },
    /// Copy a directory from the build context to `dest`.
    ///
    /// `exclude` lists context-relative entries that must not be copied.
    Directory {
        source: String,
        dest: String,
        exclude: Vec<String>,
    },
    /// Change the working directory for later steps.
    Workdir(String),
    /// Run a command (exec form).
    Exec(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    base: String,
    instructions: Vec<Instruction>,
    exposed_ports: BTreeSet<u16>,
    labels: BTreeMap<String, String>,
    entrypoint: Option<Vec<String>>,
    /// `None` inherits the base image's default arguments,
    /// `Some(vec![])` clears them.
    default_args: Option<Vec<String>>,
}

impl ImageSpec {
    pub fn from_base(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            instructions: Vec::new(),
            exposed_ports: BTreeSet::new(),
            labels: BTreeMap::new(),
            entrypoint: None,
            default_args: None,
        }
    }

    // ── Filesystem layers ──

    pub fn with_packages<I, S>(self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let packages = packages.into_iter().map(Into::into).collect();
        self.push(Instruction::Packages(packages))
    }

    pub fn with_package(self, package: impl Into<String>) -> Self {
        self.with_packages([package])
    }

    pub fn with_env_variable(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Instruction::Env {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn with_file(self, dest: impl Into<String>, source: impl Into<String>) -> Self {
        self.push(Instruction::File {
            source: source.into(),
            dest: dest.into(),
        })
    }

    pub fn with_directory<I, S>(
        self,
        dest: impl Into<String>,
        source: impl Into<String>,
        exclude: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::Directory {
            source: source.into(),
            dest: dest.into(),
            exclude: exclude.into_iter().map(Into::into).collect(),
        })
    }

    pub fn with_workdir(self, path: impl Into<String>) -> Self {
        self.push(Instruction::Workdir(path.into()))
    }

    pub fn with_exec<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Instruction::Exec(args.into_iter().map(Into::into).collect()))
    }

    // ── Metadata ──

    pub fn with_exposed_port(mut self, port: u16) -> Self {
        self.exposed_ports.insert(port);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_entrypoint<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoint = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_default_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Clear default arguments so the entry point runs exactly as declared.
    pub fn without_default_args(mut self) -> Self {
        self.default_args = Some(Vec::new());
        self
    }

    fn push(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self
    }

    // ── Accessors ──

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// All installed packages, in install order.
    pub fn packages(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Packages(p) => Some(p.iter().map(String::as_str)),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Destination paths of file and directory overlays, in order.
    pub fn overlay_paths(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::File { dest, .. } | Instruction::Directory { dest, .. } => {
                    Some(dest.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Exclusions of the directory overlay at `dest`, if there is one.
    pub fn exclusions_for(&self, dest: &str) -> Option<&[String]> {
        self.instructions.iter().find_map(|i| match i {
            Instruction::Directory {
                dest: d, exclude, ..
            } if d == dest => Some(exclude.as_slice()),
            _ => None,
        })
    }

    /// Effective working directory (the last one set).
    pub fn workdir(&self) -> Option<&str> {
        self.instructions.iter().rev().find_map(|i| match i {
            Instruction::Workdir(w) => Some(w.as_str()),
            _ => None,
        })
    }

    /// Effective environment; later assignments override earlier ones.
    pub fn env(&self) -> BTreeMap<&str, &str> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Env { key, value } => Some((key.as_str(), value.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn execs(&self) -> Vec<&[String]> {
        self.instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Exec(args) => Some(args.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn exposed_ports(&self) -> &BTreeSet<u16> {
        &self.exposed_ports
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn entrypoint(&self) -> Option<&[String]> {
        self.entrypoint.as_deref()
    }

    pub fn default_args(&self) -> Option<&[String]> {
        self.default_args.as_deref()
    }
}
