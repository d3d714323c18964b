use std::path::Path;

use blogship::{Credential, Orchestrator, ServeProfile};

pub async fn publish(
    dir: &Path,
    token_env: Option<&str>,
    profile: Option<ServeProfile>,
) -> anyhow::Result<()> {
    let (source, mut config) = super::load(dir)?;
    if let Some(profile) = profile {
        config.serve.profile = profile;
    }
    if let Some(var) = token_env {
        config.publish.token_env = var.to_owned();
    }

    // Resolve the token before any build work so a missing one fails fast.
    let credential = Credential::from_env(&config.publish.token_env, source.root())?;
    let orchestrator = Orchestrator::new(config);

    println!("Publishing to {}...", credential.registry());
    let digest = orchestrator.publish(&source, &credential).await?;

    println!();
    println!("Published: {digest}");
    Ok(())
}
