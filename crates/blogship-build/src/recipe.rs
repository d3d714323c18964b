//! The blog's image recipes.
//!
//! Each function returns a fresh [`ImageSpec`]; `prod_spec` is `build_spec`
//! plus a frozen entry point, so the two can never drift apart.

use blogship_core::constants::{
    BASE_IMAGE, HUGO_BUILD_TAGS, HUGO_MODULE, HUGO_PATH, HUGO_PORT, SITE_BUILD_COMMANDS,
    SITE_PACKAGES, SITE_ROOT, SOURCE_LABEL_KEY, SOURCE_REPOSITORY, TOOLCHAIN_PACKAGE,
};
use blogship_core::{ImageSpec, ServeProfile, SourceTree};

/// Context-relative path of the generator binary in the site build context.
pub const ARTIFACT_CONTEXT_PATH: &str = "hugo";

/// Context-relative directory holding the copied site sources.
pub const SITE_CONTEXT_PATH: &str = "site";

/// Ephemeral image that compiles Hugo (extended) from source.
pub fn toolchain_spec(version: &str) -> ImageSpec {
    ImageSpec::from_base(BASE_IMAGE)
        .with_package(TOOLCHAIN_PACKAGE)
        .with_env_variable("CGO_ENABLED", "1")
        .with_exec([
            "go".to_owned(),
            "install".to_owned(),
            "-tags".to_owned(),
            HUGO_BUILD_TAGS.to_owned(),
            format!("{HUGO_MODULE}@{version}"),
        ])
}

/// Debug-ready site image: toolchain, sources, and installed modules.
///
/// Package installation precedes the overlays so the generator binary and
/// the sources are not masked by package contents.
pub fn build_spec(source: &SourceTree) -> ImageSpec {
    let spec = ImageSpec::from_base(BASE_IMAGE)
        .with_packages(SITE_PACKAGES)
        .with_file(HUGO_PATH, ARTIFACT_CONTEXT_PATH)
        .with_directory(SITE_ROOT, SITE_CONTEXT_PATH, source.exclusions().to_vec())
        .with_workdir(SITE_ROOT);

    SITE_BUILD_COMMANDS
        .iter()
        .fold(spec, |spec, cmd| spec.with_exec(cmd.iter().copied()))
        .with_exposed_port(HUGO_PORT)
        .with_label(SOURCE_LABEL_KEY, SOURCE_REPOSITORY)
}

/// Production image: [`build_spec`] with the server command frozen in.
pub fn prod_spec(source: &SourceTree, profile: ServeProfile) -> ImageSpec {
    build_spec(source)
        .with_entrypoint(frozen_server_command(profile))
        .without_default_args()
}

/// Server command line baked into the production image.
pub fn frozen_server_command(profile: ServeProfile) -> Vec<String> {
    let mut cmd = preview_server_command();
    if let Some(url) = profile.base_url() {
        cmd.push(format!("--baseURL={url}"));
    }
    cmd.push("--appendPort=false".to_owned());
    cmd.push("--disableLiveReload=true".to_owned());
    cmd
}

/// Server command used by `run`; live reload stays on.
pub fn preview_server_command() -> Vec<String> {
    vec![
        HUGO_PATH.to_owned(),
        "server".to_owned(),
        "--bind=0.0.0.0".to_owned(),
    ]
}
