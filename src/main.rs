use clap::Parser;
use serde::Serialize;
use site_scout::{ScraperConfig, ScraperService};
use std::process::ExitCode;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    }
    .with_env_overrides();
    if let Some(store_dir) = args.store_dir {
        config.store_dir = store_dir;
    }

    let service = ScraperService::from_config(&config)?;

    match args.command {
        Command::Scrape {
            url,
            user,
            category,
        } => {
            ::log::info!(
                "Scraping requires a WebDriver server; using {} (set WEBDRIVER_URL to change)",
                config.webdriver_url
            );

            let start_time = std::time::Instant::now();
            let site = service.scrape_website(&url, &user, &category).await?;
            ::log::info!(
                "Scraped {} pages from {} in {:.2} seconds",
                site.pages.len(),
                url,
                start_time.elapsed().as_secs_f64()
            );
            print_json(&site)?;
        }
        Command::List { user } => print_json(&service.scrape_all(&user).await?)?,
        Command::MarkLive { url } => {
            let updated = service.mark_live(&url).await?;
            println!("{updated} record(s) marked live");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
