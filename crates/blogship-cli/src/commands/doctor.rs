use std::path::Path;

use blogship_core::BlogshipConfig;
use blogship_core::constants::CONFIG_FILE;
use blogship_engine::{CheckResult, EngineClient};

pub async fn doctor(dir: &Path) -> anyhow::Result<()> {
    let config = BlogshipConfig::load(dir);
    let program = match &config {
        Ok(c) => c.engine.program.clone(),
        Err(e) => {
            tracing::debug!(error = %e, "config unusable, checking the default engine");
            BlogshipConfig::default().engine.program
        }
    };

    let client = EngineClient::new(&program);
    let mut report = client.doctor().await;

    report.source_dir = if dir.is_dir() {
        CheckResult::ok(&dir.display().to_string())
    } else {
        CheckResult::fail("Not found")
    };

    // A missing blogship.toml is fine; defaults apply.
    report.config_file = match (&config, dir.join(CONFIG_FILE).is_file()) {
        (Ok(_), true) => CheckResult::ok("Found"),
        (Ok(_), false) => CheckResult::ok("Not found, using defaults"),
        (Err(e), _) => CheckResult::fail(&e.to_string()),
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed; see above for details");
    }

    Ok(())
}
