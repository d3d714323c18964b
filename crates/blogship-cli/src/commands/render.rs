use std::path::Path;

use blogship::ServeProfile;
use blogship_build::ContainerfileGenerator;
use blogship_build::recipe;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RenderTarget {
    Toolchain,
    Build,
    Prod,
}

pub fn render(
    target: RenderTarget,
    dir: &Path,
    profile: Option<ServeProfile>,
) -> anyhow::Result<()> {
    let (source, config) = super::load(dir)?;
    // arch-lint: allow(no-silent-result-drop) reason="Option fallback to the configured serve profile; no error is discarded"
    let profile = profile.unwrap_or(config.serve.profile);

    let spec = match target {
        RenderTarget::Toolchain => recipe::toolchain_spec(&config.toolchain.version),
        RenderTarget::Build => recipe::build_spec(&source),
        RenderTarget::Prod => recipe::prod_spec(&source, profile),
    };

    print!("{}", ContainerfileGenerator::new(&spec).render());
    Ok(())
}
