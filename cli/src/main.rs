mod analyze;
mod scrape;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use persistence::OutputDirs;
use thiserror::Error;
use vacancy_analyzer::VacancyTable;
use vacancy_scraper::hh::{self, Fetcher};
use vacancy_scraper::{Config, ConfigError, OutputConfig, VacancyApi};

const DEFAULT_CONFIG: &str = "config/config.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect vacancies from hh.ru and chart the results", long_about = None)]
struct Cli {
    /// Path of the TOML configuration file
    #[arg(short, long, env = "VACANCY_CONFIG", default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to prepare output directories: {0}")]
    Output(#[from] persistence::Error),
    #[error("Failed to build http client: {0}")]
    Client(#[from] hh::Error),
}

async fn pipeline<A: VacancyApi>(
    fetcher: &Fetcher<A>,
    dirs: &OutputDirs,
    output: &OutputConfig,
) -> Option<VacancyTable> {
    let vacancies = scrape::scrape(fetcher).await;
    analyze::analyze(&vacancies, dirs, output)
}

async fn run(config: Config) -> Result<(), Error> {
    let dirs = OutputDirs::prepare(&config.output.processed_dir, &config.output.figures_dir)?;
    let fetcher = scrape::fetcher(&config.api)?;
    log::info!(
        "searching '{}' in area {} over the last {} days",
        config.api.query,
        config.api.area,
        config.api.period
    );
    if pipeline(&fetcher, &dirs, &config.output).await.is_some() {
        log::info!("done");
    }
    Ok(())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match tokio::spawn(run(config)).await {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) if e.is_panic() => {
            log::error!("unexpected error: {}", panic_message(&*e.into_panic()));
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("pipeline task did not finish: {}", e);
            ExitCode::FAILURE
        }
    }
}
