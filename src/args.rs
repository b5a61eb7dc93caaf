use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-scout")]
#[command(about = "Scrapes business profiles (contacts, socials, team, page text) from websites")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of the JSON document store (overrides the config file)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl a website and store the scraped record
    Scrape {
        /// Seed URL to crawl
        url: String,

        /// Id of the user the record is attributed to
        #[arg(short, long)]
        user: String,

        /// Business category of the site
        #[arg(long)]
        category: String,
    },

    /// List every stored record for a user
    List {
        #[arg(short, long)]
        user: String,
    },

    /// Mark the records for a URL as live
    MarkLive { url: String },
}
