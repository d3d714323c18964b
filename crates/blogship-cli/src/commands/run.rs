use std::future::Future;
use std::path::Path;

use blogship::{Orchestrator, PipelineError};

/// Serve the debug image until Ctrl-C. The server exiting on its own is
/// reported as a failure.
pub async fn run(dir: &Path, port: Option<u16>) -> anyhow::Result<()> {
    let (source, mut config) = super::load(dir)?;
    if let Some(port) = port {
        config.serve.host_port = port;
    }
    let orchestrator = Orchestrator::new(config);

    let service = orchestrator.run(&source).await?;
    println!("Serving {} at {}", service.image, service.url());
    println!("Press Ctrl-C to stop.");

    match race(orchestrator.supervise(&service), tokio::signal::ctrl_c()).await? {
        Outcome::Interrupted => {
            println!();
            println!("Stopping preview server...");
            orchestrator.teardown(&service).await?;
            Ok(())
        }
        // wait already removed the container
        Outcome::Ended(Err(e @ PipelineError::ServiceExited { .. })) => Err(e.into()),
        Outcome::Ended(Err(e)) => {
            orchestrator.teardown(&service).await?;
            Err(e.into())
        }
        Outcome::Ended(Ok(())) => Ok(()),
    }
}

#[derive(Debug)]
enum Outcome {
    Interrupted,
    Ended(Result<(), PipelineError>),
}

/// Ctrl-C also reaches the `logs --follow` child, so both futures can be
/// ready together; the interrupt is checked first.
async fn race<S, I>(supervise: S, interrupt: I) -> std::io::Result<Outcome>
where
    S: Future<Output = Result<(), PipelineError>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        biased;
        signal = interrupt => {
            signal?;
            Ok(Outcome::Interrupted)
        }
        result = supervise => Ok(Outcome::Ended(result)),
    }
}
