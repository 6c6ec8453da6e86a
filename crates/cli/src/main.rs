mod display;

use anyhow::{Context, Result, bail};
use archive::ArchiveStore;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use fetcher::{BrowseConfig, PageFetcher, SqliteSource};
use query::{ALL_CATEGORIES, Featured, FilterState, SortDirection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Blog Archive - browse archived game-development blog posts
#[derive(Parser)]
#[command(name = "blog-archive")]
#[command(about = "Search and page through an archive of game-development blog posts", long_about = None)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the SQLite archive (overrides the configuration)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Rows per page (overrides the configuration)
    #[arg(long)]
    page_size: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the archive and print matching posts
    Search {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of pages to print
        #[arg(long, default_value = "1")]
        pages: usize,

        /// Show thumbnail URLs
        #[arg(long)]
        thumbnails: bool,
    },

    /// Import a JSON-lines export of scraped posts into the archive
    Import {
        /// Export file to load
        export: PathBuf,
    },

    /// List the categories present in the archive
    Categories,

    /// Page through an entire result set and report fetch latency
    Scan {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive text matched against title, summary and authors
    #[arg(short, long, default_value = "")]
    text: String,

    /// Category name, or "All"
    #[arg(long, default_value = ALL_CATEGORIES)]
    category: String,

    /// Earliest date (YYYY, YYYY-MM or YYYY-MM-DD), inclusive
    #[arg(long, default_value = "")]
    from: String,

    /// Latest date (YYYY, YYYY-MM or YYYY-MM-DD), inclusive
    #[arg(long, default_value = "")]
    to: String,

    /// all, featured or not_featured
    #[arg(long, default_value = "all", value_parser = parse_featured)]
    featured: Featured,

    /// Column to sort by
    #[arg(long)]
    sort: Option<String>,

    /// asc or desc
    #[arg(long, value_parser = parse_direction)]
    direction: Option<SortDirection>,
}

fn parse_featured(s: &str) -> std::result::Result<Featured, query::QueryError> {
    s.parse()
}

fn parse_direction(s: &str) -> std::result::Result<SortDirection, query::QueryError> {
    s.parse()
}

impl FilterArgs {
    fn into_filter(self, config: &BrowseConfig) -> Result<FilterState> {
        let (default_column, default_direction) = config.default_sort()?;
        Ok(FilterState::default()
            .with_text(self.text)
            .with_category(self.category)
            .with_date_range(self.from, self.to)
            .with_featured(self.featured)
            .with_sort(
                self.sort.unwrap_or(default_column),
                self.direction.unwrap_or(default_direction),
            ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = BrowseConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config.validate().context("Invalid configuration")?;
    debug!("Using configuration: {:?}", config);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Search {
            filter,
            pages,
            thumbnails,
        } => {
            let filter = filter.into_filter(&config)?;
            let fetcher = open_fetcher(&config)?;
            handle_search(&fetcher, filter, pages, thumbnails).await?
        }
        Commands::Import { export } => handle_import(config.database, export).await?,
        Commands::Categories => handle_categories(&open_fetcher(&config)?).await?,
        Commands::Scan { filter } => {
            let filter = filter.into_filter(&config)?;
            handle_scan(&open_fetcher(&config)?, filter).await?
        }
    }

    Ok(())
}

fn open_fetcher(config: &BrowseConfig) -> Result<PageFetcher> {
    let path: &Path = &config.database;
    if !path.exists() {
        bail!(
            "Archive not found at {} (run `blog-archive import <export>` first)",
            path.display()
        );
    }
    let source = SqliteSource::open_read_only(path)
        .with_context(|| format!("Failed to open archive {}", path.display()))?;
    Ok(PageFetcher::from_config(Arc::new(source), config)?)
}

/// Handle the 'search' command
async fn handle_search(fetcher: &PageFetcher, filter: FilterState, pages: usize, thumbnails: bool) -> Result<()> {
    let needle = filter.text.clone();

    let mut header = format!("Search results for '{}'", needle);
    if filter.has_category() {
        header.push_str(&format!(" in {}", filter.category));
    }
    println!("{}", header.bold().blue());
    if let Some(label) = display::date_range_label(&filter.date_from, &filter.date_to) {
        println!("{}", label.dimmed());
    }

    let mut page = fetcher.reset(filter).await.context("Search failed")?;
    let mut shown = 0;
    let mut fetched = 1;
    loop {
        for post in page.posts() {
            shown += 1;
            display::print_post(shown, post, &needle, thumbnails);
        }
        if page.is_last() || fetched >= pages {
            break;
        }
        page = fetcher.more().await.context("Failed to fetch next page")?;
        fetched += 1;
    }

    if shown == 0 {
        println!("No posts found.");
    } else if !page.is_last() {
        println!(
            "{}",
            format!("Showing {} posts; pass --pages {} for more.", shown, pages + 1).dimmed()
        );
    }
    Ok(())
}

/// Handle the 'import' command
async fn handle_import(database: PathBuf, export: PathBuf) -> Result<()> {
    println!("Importing {} into {}...", export.display(), database.display());
    let start = Instant::now();

    let summary = tokio::task::spawn_blocking(move || ArchiveStore::load_from_file(&database, &export))
        .await
        .context("Import task panicked")?
        .context("Failed to import export file")?;

    println!(
        "{} Imported in {:?}: {} new, {} promoted to featured, {} unchanged",
        "✓".green(),
        start.elapsed(),
        summary.inserted,
        summary.promoted,
        summary.unchanged
    );
    println!("{summary}");
    Ok(())
}

/// Handle the 'categories' command
async fn handle_categories(fetcher: &PageFetcher) -> Result<()> {
    let categories = fetcher.categories().await.context("Failed to list categories")?;

    println!("{}", "Categories:".bold().blue());
    println!("{}{}", "• ".green(), ALL_CATEGORIES);
    for category in categories {
        println!("{}{}", "• ".green(), category);
    }
    Ok(())
}

/// Handle the 'scan' command
async fn handle_scan(fetcher: &PageFetcher, filter: FilterState) -> Result<()> {
    let overall = Instant::now();
    let mut timings = Vec::new();
    let mut rows = 0;

    let start = Instant::now();
    let mut page = fetcher.reset(filter).await.context("Search failed")?;
    timings.push(start.elapsed());
    loop {
        rows += page.len();
        if page.is_last() {
            break;
        }
        let start = Instant::now();
        page = fetcher.more().await.context("Failed to fetch next page")?;
        timings.push(start.elapsed());
    }
    let total_time = overall.elapsed();

    timings.sort();
    let fetch_time: Duration = timings.iter().sum();
    let avg_latency = fetch_time / timings.len().max(1) as u32;

    println!("{}", "Scan results:".bold().blue());
    println!("Pages fetched: {}", timings.len());
    println!("Rows: {}", rows);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!(
        "Throughput: {:.2} rows/second",
        rows as f64 / total_time.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}

/// Nearest-rank percentile of sorted timings.
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile() {
        let timings: Vec<_> = (1..=100).map(Duration::from_millis).collect();
        assert_eq!(percentile(&timings, 0.50), Duration::from_millis(51));
        assert_eq!(percentile(&timings, 0.99), Duration::from_millis(100));
        assert_eq!(percentile(&[], 0.95), Duration::ZERO);
    }

    #[test]
    fn test_filter_args_use_configured_sort() {
        let args = FilterArgs {
            text: "ai".to_string(),
            category: "Design".to_string(),
            from: "2020".to_string(),
            to: String::new(),
            featured: Featured::FeaturedOnly,
            sort: None,
            direction: Some(SortDirection::Ascending),
        };

        let filter = args.into_filter(&BrowseConfig::defaults()).unwrap();

        assert_eq!(filter.sort_column, "Date");
        assert_eq!(filter.sort_direction, SortDirection::Ascending);
        assert_eq!(filter.featured, Featured::FeaturedOnly);
        assert!(filter.has_category());
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::parse_from([
            "blog-archive",
            "--page-size",
            "5",
            "search",
            "--text",
            "shader",
            "--featured",
            "not_featured",
            "--direction",
            "asc",
            "--pages",
            "3",
        ]);

        assert_eq!(cli.page_size, Some(5));
        match cli.command {
            Commands::Search { filter, pages, .. } => {
                assert_eq!(filter.text, "shader");
                assert_eq!(filter.featured, Featured::NotFeatured);
                assert_eq!(filter.direction, Some(SortDirection::Ascending));
                assert_eq!(pages, 3);
            }
            _ => panic!("expected search"),
        }
    }
}
