use clap::Parser;
use filter_pipeline::{render_feed, render_summary, FilterPolicy, FilteredFeed};
use moltbook_client::{fetch_filtered, MoltbookClient, StaticSource};
use moltfilter_core::{AppConfig, CoreError, ErrorExt, ErrorReporter, FilterOptions, SortOrder};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Fetch a Moltbook feed and drop low-signal posts before reading it.
#[derive(Parser)]
#[command(name = "moltfilter")]
#[command(about = "Filter low-karma, intro and spam posts out of a Moltbook feed", long_about = None)]
struct Cli {
    /// Sort order requested from Moltbook (hot, top, new)
    #[arg(long, default_value = "hot")]
    sort: SortOrder,

    /// Number of posts to fetch before filtering
    #[arg(long, default_value_t = FilterOptions::DEFAULT_LIMIT)]
    limit: u32,

    /// Minimum karma (upvotes - downvotes); overrides the config file
    #[arg(long, allow_negative_numbers = true)]
    min_karma: Option<i64>,

    /// Only fetch posts from this submolt
    #[arg(long)]
    submolt: Option<String>,

    /// Keep introduction posts
    #[arg(long)]
    show_intros: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filter a saved /posts response instead of calling the API
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the filtered posts as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("moltfilter=info,moltbook_client=info,filter_pipeline=info")
        }))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            ErrorReporter::new().report_error(&error);
            eprintln!("{}", error.user_friendly_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CoreError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let policy = FilterPolicy::from_settings(&config.filter);
    let options = FilterOptions {
        sort: cli.sort,
        limit: cli.limit,
        min_karma: cli.min_karma.unwrap_or(config.filter.min_karma),
        submolt: cli.submolt,
        filter_intros: config.filter.filter_intros && !cli.show_intros,
    };

    tracing::info!(
        "Fetching {} {} posts (min karma {}, intros {})",
        options.limit,
        options.sort,
        options.min_karma,
        if options.filter_intros { "hidden" } else { "shown" }
    );

    let feed = match &cli.input {
        Some(path) => {
            let body = std::fs::read_to_string(path)?;
            let source = StaticSource::from_json(&body)?;
            fetch_filtered(&source, &options, &policy).await?
        }
        None => {
            let client = MoltbookClient::from_config(&config)?;
            fetch_filtered(&client, &options, &policy).await?
        }
    };

    print_feed(&feed, cli.json)
}

fn print_feed(feed: &FilteredFeed, json: bool) -> Result<(), CoreError> {
    if json {
        println!("{}", serde_json::to_string_pretty(feed)?);
        return Ok(());
    }

    print!("{}", render_feed(&feed.posts));
    println!();
    print!("{}", render_summary(feed));
    Ok(())
}
