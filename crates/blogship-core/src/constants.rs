//! Fixed parameters of the blog image pipeline.
//!
//! These are deliberately not part of `blogship.toml`: changing any of them
//! changes what the published image is.

/// Minimal base image used for both the toolchain and the site image.
pub const BASE_IMAGE: &str = "cgr.dev/chainguard/wolfi-base";

/// Packages installed into the site image, in install order.
pub const SITE_PACKAGES: [&str; 4] = ["go", "git", "npm", "nodejs"];

/// Package providing the Go toolchain in the ephemeral toolchain image.
pub const TOOLCHAIN_PACKAGE: &str = "go";

/// Go module path of the static-site generator.
pub const HUGO_MODULE: &str = "github.com/gohugoio/hugo";

/// Build tags passed to `go install` for the generator.
pub const HUGO_BUILD_TAGS: &str = "extended";

/// Version tag meaning "newest release".
pub const LATEST: &str = "latest";

/// Where `go install` leaves the binary inside the toolchain image.
pub const TOOLCHAIN_BINARY_PATH: &str = "/root/go/bin/hugo";

/// Executable path of the generator inside the site image.
pub const HUGO_PATH: &str = "/bin/hugo";

/// Working directory holding the site sources inside the image.
pub const SITE_ROOT: &str = "/blog";

/// Source entries never copied into the image: generated output, module
/// caches, theme submodules, and local environment overrides.
pub const SOURCE_EXCLUDES: [&str; 6] = [
    "node_modules",
    "public",
    "build.cue",
    "cue.mod",
    "themes",
    ".envrc",
];

/// Commands run against the sources after they are copied in.
pub const SITE_BUILD_COMMANDS: [&[&str]; 3] = [
    &["hugo", "mod", "get"],
    &["hugo", "mod", "npm", "pack"],
    &["npm", "install"],
];

/// Port the Hugo development server listens on.
pub const HUGO_PORT: u16 = 1313;

/// OCI label recording where the image was built from.
pub const SOURCE_LABEL_KEY: &str = "org.opencontainers.image.source";
pub const SOURCE_REPOSITORY: &str = "https://github.com/kgb33/blog.kgb33.dev";

/// Public base URL used by the `production` serve profile.
pub const PRODUCTION_BASE_URL: &str = "https://blog.kgb33.dev/";

pub const REGISTRY_HOST: &str = "ghcr.io";
pub const REGISTRY_USER: &str = "KGB33";
pub const IMAGE_REFERENCE: &str = "ghcr.io/kgb33/blog.kgb33.dev";

/// Scratch directory created under the source root. Never copied into images.
pub const STAGING_DIR: &str = ".blogship";

/// Name of the optional configuration file at the source root.
pub const CONFIG_FILE: &str = "blogship.toml";
