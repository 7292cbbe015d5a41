use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mockup_worker::{
    CancellationToken, Customizations, DirStore, FsImageSource, JobOutcome, JobRunner,
    MockupGenerator, RoutingImageSource, TracingReporter, WorkerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "mockup-worker", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a local logo onto a local template.
    Render(RenderArgs),
    /// Run a job payload through the full job lifecycle.
    Job(JobArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Logo image path.
    #[arg(long)]
    logo: PathBuf,

    /// Template image path.
    #[arg(long)]
    template: PathBuf,

    /// Customizations JSON file (camelCase keys).
    #[arg(long)]
    customizations: Option<PathBuf>,

    /// Directory receiving the render and thumbnail.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Job payload JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving the render and thumbnail.
    #[arg(long)]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mockup_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = WorkerConfig::from_env()?;
    match cli.cmd {
        Command::Render(args) => cmd_render(&config, args).await,
        Command::Job(args) => cmd_job(&config, args).await,
    }
}

async fn cmd_render(config: &WorkerConfig, args: RenderArgs) -> anyhow::Result<ExitCode> {
    let customizations = match &args.customizations {
        Some(path) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("read customizations '{}'", path.display()))?;
            let value: serde_json::Value = serde_json::from_slice(&raw)
                .with_context(|| format!("parse customizations '{}'", path.display()))?;
            Customizations::from_json_value(value)?
        }
        None => Customizations::default(),
    };

    let generator = MockupGenerator::new(
        config,
        Arc::new(FsImageSource),
        Arc::new(DirStore::new(&args.out_dir)),
    );
    let urls = generator
        .generate_mockup(
            &args.logo.to_string_lossy(),
            &args.template.to_string_lossy(),
            &customizations,
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&urls)?);
    Ok(ExitCode::SUCCESS)
}

async fn cmd_job(config: &WorkerConfig, args: JobArgs) -> anyhow::Result<ExitCode> {
    let payload = std::fs::read(&args.in_path)
        .with_context(|| format!("read job '{}'", args.in_path.display()))?;

    let generator = MockupGenerator::new(
        config,
        Arc::new(RoutingImageSource::new(config.fetch_timeout())?),
        Arc::new(DirStore::new(&args.out_dir)),
    );
    let runner = JobRunner::new(generator, Arc::new(TracingReporter), config.job_budget())
        .with_retry_policy(config.retry);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling job");
            on_signal.cancel();
        }
    });

    let outcome = runner.run_job_json(&payload, &cancel).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(match outcome {
        JobOutcome::Completed { .. } => ExitCode::SUCCESS,
        JobOutcome::Failed { .. } | JobOutcome::Cancelled => ExitCode::FAILURE,
    })
}
