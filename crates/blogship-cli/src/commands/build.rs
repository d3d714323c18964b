use std::path::Path;

use blogship::{Orchestrator, ServeProfile};

pub async fn build(dir: &Path) -> anyhow::Result<()> {
    let (source, config) = super::load(dir)?;
    let orchestrator = Orchestrator::new(config);

    println!("Building site image...");
    let image = orchestrator.build(&source).await?;

    println!();
    println!("Built: {}", image.tag);
    Ok(())
}

pub async fn prod(dir: &Path, profile: Option<ServeProfile>) -> anyhow::Result<()> {
    let (source, mut config) = super::load(dir)?;
    if let Some(profile) = profile {
        config.serve.profile = profile;
    }
    let orchestrator = Orchestrator::new(config);

    println!(
        "Building production image ({} profile)...",
        orchestrator.config().serve.profile
    );
    let image = orchestrator.prod(&source).await?;

    println!();
    println!("Built: {}", image.tag);
    Ok(())
}
