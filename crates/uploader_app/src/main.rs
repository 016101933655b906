mod platform;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use uploader_core::JobPhase;
use uploader_logging::{uploader_error, uploader_info, LogDestination};

use platform::{load_config, RunOptions};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Upload data files (or fetch registry datasets) and follow their processing jobs.
#[derive(Parser, Debug)]
#[command(name = "uploader", version)]
struct Cli {
    /// Files to upload, as if dropped on the page together.
    files: Vec<PathBuf>,

    /// Registry download link to fetch instead of a local file. Repeatable.
    #[arg(long = "registry")]
    registry: Vec<String>,

    #[arg(long, default_value = platform::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Overrides `base_url` from the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Address the page is loaded at; `?modal-id` opens that modal.
    #[arg(long)]
    page_url: Option<String>,

    /// Publisher filter text.
    #[arg(long)]
    filter: Option<String>,

    /// Click "Cancel fetching file" after this many seconds.
    #[arg(long)]
    cancel_after: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogTarget::Terminal)]
    log: LogTarget,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    uploader_logging::initialize(cli.log.into(), level);

    let mut config = load_config(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    uploader_info!("Using server {}", config.base_url);

    let options = RunOptions {
        files: cli.files,
        registry_links: cli.registry,
        page_url: cli.page_url,
        filter: cli.filter,
        cancel_after: cli.cancel_after.map(Duration::from_secs),
    };
    let summary = platform::run(options, &config)?;

    if !summary.open_modals.is_empty() {
        println!("open: {}", summary.open_modals.join(", "));
    }
    for name in &summary.visible_publishers {
        println!("publisher: {name}");
    }
    for job in &summary.jobs {
        println!(
            "{}\t{}\t{:?}",
            job.source,
            job.job_id.as_deref().unwrap_or("-"),
            job.phase
        );
    }
    if let Some(message) = &summary.message {
        println!("{message}");
    }
    if let Some(url) = &summary.results_url {
        println!("results: {url}");
    }

    let failed = summary.jobs.iter().any(|job| {
        matches!(
            job.phase,
            JobPhase::NotFound | JobPhase::ProcessingError | JobPhase::Failed
        )
    });
    if failed {
        uploader_error!("At least one job did not complete");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
