mod commands;

use std::path::PathBuf;

use blogship_core::ServeProfile;
use clap::{Parser, Subcommand};

use commands::RenderTarget;

#[derive(Parser)]
#[command(
    name = "blogship",
    about = "Build, preview, and publish the blog.kgb33.dev container image"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the debug-ready site image
    Build {
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Build the production image with the server command frozen in
    Prod {
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Serve profile (production or default)
        #[arg(long)]
        profile: Option<ServeProfile>,
    },
    /// Build the site image and serve a live preview until Ctrl-C
    Run {
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Host port for the preview server
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build the production image and push it to ghcr.io
    Publish {
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Environment variable holding the registry token
        #[arg(long)]
        token_env: Option<String>,
        /// Serve profile (production or default)
        #[arg(long)]
        profile: Option<ServeProfile>,
    },
    /// Print a generated Containerfile without touching the engine
    Render {
        /// Which image to render
        #[arg(value_enum)]
        target: RenderTarget,
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Serve profile (production or default)
        #[arg(long)]
        profile: Option<ServeProfile>,
    },
    /// Check the container engine and local setup
    Doctor {
        /// Blog source directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="unset or invalid RUST_LOG falls back to the default info filter"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { dir } => commands::build(&dir).await?,
        Commands::Prod { dir, profile } => commands::prod(&dir, profile).await?,
        Commands::Run { dir, port } => commands::run(&dir, port).await?,
        Commands::Publish {
            dir,
            token_env,
            profile,
        } => commands::publish(&dir, token_env.as_deref(), profile).await?,
        Commands::Render {
            target,
            dir,
            profile,
        } => commands::render(target, &dir, profile)?,
        Commands::Doctor { dir } => commands::doctor(&dir).await?,
    }

    Ok(())
}
