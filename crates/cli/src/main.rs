use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use search_client::{backend_from_config, selected_backend, Dispatcher, SearchState};
use search_types::{SearchConfig, SearchCriteria, SearchResult, Sort};

/// Debug / scripting CLI for the plugindex search client.
#[derive(Parser, Debug)]
#[command(name = "plugindex", version, about = "Plugin registry search client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a search against the configured backend.
    Search {
        /// Free-text query.
        query: String,
        /// Restrict to a category (repeatable).
        #[arg(short, long = "category")]
        categories: Vec<String>,
        /// Restrict to a label (repeatable).
        #[arg(short, long = "label")]
        labels: Vec<String>,
        /// Sort order.
        #[arg(short, long, value_enum)]
        sort: Option<SortArg>,
        /// Page number, 1-based.
        #[arg(short, long)]
        page: Option<u32>,
        /// Print the raw result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Report which backend the current configuration selects.
    Backend {},
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortArg {
    Relevance,
    Installed,
    Trend,
    Updated,
    Title,
}

impl From<SortArg> for Sort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => Sort::Relevance,
            SortArg::Installed => Sort::Installed,
            SortArg::Trend => Sort::Trend,
            SortArg::Updated => Sort::Updated,
            SortArg::Title => Sort::Title,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::from_env();

    match cli.command {
        Commands::Search {
            query,
            categories,
            labels,
            sort,
            page,
            json,
        } => {
            let mut criteria = SearchCriteria::new(query)
                .with_categories(categories)
                .with_labels(labels);
            if let Some(sort) = sort {
                criteria = criteria.with_sort(sort.into());
            }
            if let Some(page) = page {
                criteria = criteria.with_page(page);
            }
            run_search(&config, criteria, json).await
        }
        Commands::Backend {} => {
            print_backend(&config);
            Ok(())
        }
    }
}

async fn run_search(config: &SearchConfig, criteria: SearchCriteria, json: bool) -> Result<()> {
    let backend = backend_from_config(config, reqwest::Client::new());
    let dispatcher = Dispatcher::new(backend);

    match dispatcher.dispatch_and_wait(criteria).await {
        SearchState::Resolved(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
            Ok(())
        }
        SearchState::Failed(failure) => Err(anyhow!("search failed: {}", failure.message)),
        other => Err(anyhow!("search ended in unexpected state {other:?}")),
    }
}

fn print_result(result: &SearchResult) {
    println!(
        "{} matches (page {} of {}, {} per page)",
        style(result.total).green().bold(),
        result.page,
        result.pages.max(1),
        result.limit
    );
    for hit in &result.plugins {
        let name = hit.display_name().unwrap_or("<unnamed>");
        match hit.stats.current_installs {
            Some(installs) => println!("  {}  {} installs", style(name).cyan(), installs),
            None => println!("  {}", style(name).cyan()),
        }
    }
}

fn print_backend(config: &SearchConfig) {
    let name = selected_backend(config);
    match config.hosted_credentials() {
        Some((app_id, _)) => println!("{} (app id {app_id})", style(name).cyan()),
        None => println!("{} (base {})", style(name).cyan(), config.rest_base()),
    }
}
