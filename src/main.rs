mod client;
mod export;
mod parser;
mod pipeline;
mod report;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use client::HttpClient;
use pipeline::Pipeline;
use report::RunReport;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "oncodb-stagewise",
    about = "Stage-wise gene expression scraper for OncoDB"
)]
struct Cli {
    /// Settings file (toml, json or yaml); ONCODB_* env vars override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, harvest profile tables and export them (default)
    Run {
        /// Max profile pages to harvest
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output file; `.csv` writes CSV, anything else xlsx
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Print the profile links the search returns
    Links {
        /// Max links to print
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the expression rows of a single profile link
    Profile {
        /// Profile URL, absolute or server-relative
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Commands::Run {
        limit: None,
        output: None,
        report: None,
    });

    match command {
        Commands::Run {
            limit,
            output,
            report,
        } => {
            if let Some(n) = limit {
                settings.max_profiles = n;
            }
            if let Some(path) = output {
                settings.output = path;
            }
            let output = settings.output.clone();

            let pipeline = Pipeline::new(HttpClient::new(&settings.user_agent)?, settings);
            let harvest = pipeline
                .run_and_export(&output)
                .await
                .with_context(|| format!("Failed to export to {:?}", output))?;
            println!("Wrote {} records to {}", harvest.records.len(), output.display());
            harvest.report.print();

            if let Some(path) = report {
                harvest.report.write_json(&path)?;
            }
        }
        Commands::Links { limit } => {
            if let Some(n) = limit {
                settings.max_profiles = n;
            }
            let pipeline = Pipeline::new(HttpClient::new(&settings.user_agent)?, settings);
            let mut report = RunReport::new(&pipeline.settings().search_url());
            let links = pipeline.discover(&mut report).await;
            if !report.search_ok {
                anyhow::bail!("Search request failed");
            }
            for link in &links {
                println!("{}", link);
            }
            println!(
                "\n{} of {} profile links shown",
                links.len(),
                report.links_discovered
            );
        }
        Commands::Profile { url } => {
            let pipeline = Pipeline::new(HttpClient::new(&settings.user_agent)?, settings);
            let records = pipeline
                .harvest_profile(&url)
                .await
                .with_context(|| format!("Failed to fetch profile {}", url))?;
            if records.is_empty() {
                println!("No stage-wise expression table found.");
            } else {
                println!("{}", parser::table::COLUMNS.join("\t"));
                for r in &records {
                    println!("{}", r.fields().join("\t"));
                }
            }
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}
