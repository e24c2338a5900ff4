use anyhow::Result;
use clap::{ArgGroup, Parser};
use sparkindex::checkpoint::JsonFileStore;
use sparkindex::credentials::credentials_from_env;
use sparkindex::driver::SubmissionDriver;
use sparkindex::indexing::GoogleIndexingClient;
use sparkindex::sources::{write_sitemap, SupabaseSource, UrlEnumerator};
use sparkindex::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "sparkindex")]
#[command(about = "Submit new SparkLocal URLs to the Google Indexing API, up to the daily quota")]
#[command(group(ArgGroup::new("mode").args(["dry_run", "reset", "status", "export_sitemap"])))]
struct Args {
    /// Show which URLs would be submitted, without submitting or saving
    #[arg(long)]
    dry_run: bool,

    /// Clear the submission history and exit
    #[arg(long)]
    reset: bool,

    /// Print submission counts from the history and exit
    #[arg(long)]
    status: bool,

    /// Write every candidate URL to a sitemap.xml at PATH and exit
    #[arg(long, value_name = "PATH")]
    export_sitemap: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = Config::load()?;
    log::debug!("Checkpoint: {}", config.checkpoint_path().display());

    let store = JsonFileStore::new(config.checkpoint_path());
    let driver = SubmissionDriver::new(config.driver_settings(), store);

    if args.status {
        println!("{}", driver.status().await);
        return Ok(ExitCode::SUCCESS);
    }

    if args.reset {
        driver.reset().await?;
        println!("Submission history reset ({})", config.checkpoint_path().display());
        return Ok(ExitCode::SUCCESS);
    }

    if args.dry_run {
        let enumerator = build_enumerator(&config)?;
        let report = driver.dry_run(&enumerator).await?;
        println!("{}", report);
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(path) = args.export_sitemap {
        let urls = build_enumerator(&config)?.enumerate().await?;
        write_sitemap(&path, &urls)?;
        println!("Wrote {} URLs to {}", urls.len(), path.display());
        return Ok(ExitCode::SUCCESS);
    }

    // Submit mode: all configuration must be in place before any URL goes out
    let key = credentials_from_env(&config.indexing)?;
    let client = GoogleIndexingClient::new(key, &config.indexing.publish_endpoint)?;
    let enumerator = build_enumerator(&config)?;
    client.authorize().await?;

    let summary = driver.submit(&enumerator, &client).await?;

    if summary.has_failures() {
        log::warn!(
            "{} of {} submissions failed. Failed URLs are recorded and will not be retried automatically.",
            summary.failed,
            summary.attempted
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

/// URL enumerator backed by Supabase; fails fast when its env vars are missing
fn build_enumerator(config: &Config) -> Result<UrlEnumerator<SupabaseSource>> {
    let credentials = config.supabase_credentials()?;
    let source = SupabaseSource::new(credentials, &config.supabase)?;
    Ok(UrlEnumerator::new(source, config))
}
