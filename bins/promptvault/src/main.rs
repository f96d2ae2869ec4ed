//! PromptVault CLI
//!
//! Search, suggest and autocomplete prompts from an exported library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use promptvault_cli::output::{
    format_count, format_duration, print_search_result, print_suggestion, Status,
};
use promptvault_core::config::Config;
use promptvault_core::error::{exit_codes, Error};
use promptvault_core::library::Library;
use promptvault_search::{
    detect_slash_command, extract_tags, rank, suggest, suggest_tags, Record, SearchController,
    SearchOptions, SortBy,
};
use promptvault_telemetry::{metrics, timed_span, TelemetryConfig, TelemetryGuard, Timer};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Parser)]
#[command(name = "promptvault")]
#[command(about = "Search, suggest and autocomplete prompts from an exported PromptVault library")]
#[command(version)]
struct Cli {
    /// Exported library file (overrides [library] path)
    #[arg(short, long, global = true, env = "PROMPTVAULT_LIBRARY")]
    library: Option<PathBuf>,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank prompts against a query
    Search {
        /// Search query (empty lists every prompt)
        #[arg(default_value = "")]
        query: String,
        /// Only prompts with a tag containing this text (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Ordering: relevance, recent, usage, alphabetical
        #[arg(short, long)]
        sort: Option<String>,
        /// Maximum results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Match titles and tags only
        #[arg(long)]
        no_content: bool,
    },

    /// Suggest prompts by usage, recency and context
    Suggest {
        /// Text around the cursor
        #[arg(long)]
        context: Option<String>,
        /// Never suggest these prompt ids (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Maximum suggestions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// List every tag in the library
    Tags,

    /// Complete a partially typed tag
    #[command(name = "complete-tag")]
    CompleteTag {
        /// Partial tag
        #[arg(default_value = "")]
        partial: String,
        /// Maximum completions
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search with the slash command ending at the cursor
    Slash {
        /// Input text, e.g. "Please /rev"
        text: String,
        /// Cursor position in characters (defaults to end of text)
        #[arg(long)]
        cursor: Option<usize>,
    },

    /// Read queries from stdin, one per line, with debounced search
    Watch,

    /// Validate the library and configuration
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let exit_code = run(cli).await;
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report_error(&e, cli.json),
    };

    let _telemetry = init_telemetry(cli.verbose, &config);

    let library = match load_library(cli.library.as_ref(), &config) {
        Ok(library) => library,
        Err(e) => return report_error(&e, cli.json),
    };
    metrics().gauge("library_records", library.len() as u64);

    let exit_code = match cli.command {
        Commands::Search { query, tags, sort, limit, no_content } => {
            let mut options = config.schema.search.to_options().with_tags(tags);
            if let Some(sort) = sort {
                options = options.with_sort(SortBy::parse_lenient(&sort));
            }
            if let Some(limit) = limit {
                options = options.with_max_results(limit);
            }
            if no_content {
                options = options.with_content(false);
            }
            run_search(library.records(), &query, &options, cli.json)
        }
        Commands::Suggest { context, exclude, limit } => {
            let mut options = config.schema.suggestions.to_options().with_excluded(exclude);
            if let Some(context) = context {
                options = options.with_context(context);
            }
            if let Some(limit) = limit {
                options = options.with_max_suggestions(limit);
            }
            run_suggest(library.records(), &options, cli.json)
        }
        Commands::Tags => run_tags(library.records(), cli.json),
        Commands::CompleteTag { partial, limit } => {
            let limit = limit.unwrap_or(config.schema.tags.suggestion_limit);
            run_complete_tag(library.records(), &partial, limit, cli.json)
        }
        Commands::Slash { text, cursor } => {
            let cursor = cursor.unwrap_or_else(|| text.chars().count());
            run_slash(library.records(), &text, cursor, &config, cli.json)
        }
        Commands::Watch => match run_watch(library.into_records(), &config, cli.json).await {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                Status::error(&format!("{e:#}"));
                exit_codes::FAILURE
            }
        },
        Commands::Check => run_check(&library, &config, cli.json),
    };

    debug!(metrics = %metrics().export_json(), "Session metrics");
    exit_code
}

fn init_telemetry(verbose: u8, config: &Config) -> Option<TelemetryGuard> {
    let log_level = match verbose {
        0 => config.schema.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    let telemetry = TelemetryConfig {
        log_level,
        log_file: config.schema.logging.file.clone(),
        ..TelemetryConfig::default()
    };

    match promptvault_telemetry::init_with_config(telemetry) {
        Ok(guard) => Some(guard),
        Err(e) => {
            Status::warning(&format!("Logging disabled: {e}"));
            None
        }
    }
}

fn load_library(explicit: Option<&PathBuf>, config: &Config) -> promptvault_core::Result<Library> {
    let path = explicit
        .or(config.schema.library.path.as_ref())
        .ok_or_else(Error::library_not_found)?;
    Library::load(path)
}

fn report_error(err: &Error, json: bool) -> i32 {
    if json {
        match serde_json::to_string_pretty(&err.to_report()) {
            Ok(report) => eprintln!("{report}"),
            Err(_) => Status::error(&err.to_string()),
        }
    } else {
        Status::error(&err.to_string());
    }
    err.exit_code()
}

fn print_json<T: Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::error(&format!("Failed to serialize output: {e}"));
            exit_codes::FAILURE
        }
    }
}

fn run_search(records: &[Record], query: &str, options: &SearchOptions, json: bool) -> i32 {
    let timer = Timer::start("search_ms");
    let results = rank(records, query, options);
    let elapsed = timer.stop();
    metrics().increment("searches");

    if json {
        return print_json(&results);
    }

    if results.is_empty() {
        Status::info(&format!("No prompts match \"{query}\""));
        return exit_codes::SUCCESS;
    }

    Status::header(&format!(
        "{} for \"{query}\" ({})",
        format_count(results.len(), "result", "results"),
        options.sort_by
    ));
    for (index, result) in results.iter().enumerate() {
        print_search_result(index + 1, result);
    }
    Status::info(&format!(
        "Searched {} in {}",
        format_count(records.len(), "prompt", "prompts"),
        format_duration(elapsed)
    ));

    exit_codes::SUCCESS
}

fn run_suggest(
    records: &[Record],
    options: &promptvault_search::SuggestionOptions,
    json: bool,
) -> i32 {
    timed_span!("suggest_ms", excluded = options.exclude_ids.len());
    let suggestions = suggest(records, options);

    if json {
        return print_json(&suggestions);
    }

    if suggestions.is_empty() {
        Status::info("Nothing to suggest");
        return exit_codes::SUCCESS;
    }

    Status::header(&format_count(suggestions.len(), "suggestion", "suggestions"));
    for (index, suggestion) in suggestions.iter().enumerate() {
        print_suggestion(index + 1, suggestion);
    }

    exit_codes::SUCCESS
}

fn run_tags(records: &[Record], json: bool) -> i32 {
    let tags = extract_tags(records);

    if json {
        return print_json(&tags);
    }

    if tags.is_empty() {
        Status::info("No tags in library");
    } else {
        Status::header(&format_count(tags.len(), "tag", "tags"));
        for tag in &tags {
            println!("  {tag}");
        }
    }
    exit_codes::SUCCESS
}

fn run_complete_tag(records: &[Record], partial: &str, limit: usize, json: bool) -> i32 {
    let completions = suggest_tags(records, partial, limit);

    if json {
        return print_json(&completions);
    }

    for tag in &completions {
        println!("{tag}");
    }
    exit_codes::SUCCESS
}

fn run_slash(records: &[Record], text: &str, cursor: usize, config: &Config, json: bool) -> i32 {
    #[derive(Serialize)]
    struct SlashOutput<'a> {
        command: Option<promptvault_search::SlashCommand>,
        results: Vec<promptvault_search::SearchResult>,
        #[serde(skip)]
        text: &'a str,
    }

    let command = detect_slash_command(text, cursor);
    let results = command.as_ref().map_or_else(Vec::new, |command| {
        rank(records, &command.query, &config.schema.search.to_options())
    });
    let output = SlashOutput { command, results, text };

    if json {
        return print_json(&output);
    }

    match &output.command {
        Some(command) => {
            Status::header(&format!(
                "/{} ({})",
                command.query,
                format_count(output.results.len(), "match", "matches")
            ));
            for (index, result) in output.results.iter().enumerate() {
                print_search_result(index + 1, result);
            }
        }
        None => Status::info(&format!("No slash command at the cursor in \"{}\"", output.text)),
    }
    exit_codes::SUCCESS
}

async fn run_watch(records: Vec<Record>, config: &Config, json: bool) -> Result<()> {
    #[derive(Serialize)]
    struct WatchOutput {
        query: String,
        results: Vec<promptvault_search::SearchResult>,
    }

    let controller = Arc::new(
        SearchController::with_debounce(config.schema.search.debounce())
            .with_cache(config.schema.search.cache_config()),
    );
    let records = Arc::new(records);
    let options = Arc::new(config.schema.search.to_options());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut searches = JoinSet::new();

    while let Some(query) = lines.next_line().await.context("Reading queries from stdin")? {
        let controller = Arc::clone(&controller);
        let records = Arc::clone(&records);
        let options = Arc::clone(&options);

        searches.spawn(async move {
            let outcome = controller.search(&records, &query, &options).await;
            (query, outcome)
        });
    }

    while let Some(joined) = searches.join_next().await {
        let (query, outcome) = joined.context("Search task failed")?;
        let results = match outcome {
            Ok(results) => results,
            Err(e) if e.is_superseded() => {
                metrics().increment("searches_superseded");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        metrics().increment("searches");

        if json {
            let line = serde_json::to_string(&WatchOutput { query, results })?;
            println!("{line}");
        } else {
            Status::header(&format!(
                "{} for \"{query}\"",
                format_count(results.len(), "result", "results")
            ));
            for (index, result) in results.iter().enumerate() {
                print_search_result(index + 1, result);
            }
        }
    }

    debug!(stats = ?controller.cache_stats(), "Watch finished");
    Ok(())
}

fn run_check(library: &Library, config: &Config, json: bool) -> i32 {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct CheckOutput<'a> {
        prompts: usize,
        tags: usize,
        version: Option<&'a str>,
        config: Option<String>,
        warnings: &'a [promptvault_core::validation::ValidationError],
    }

    let output = CheckOutput {
        prompts: library.len(),
        tags: extract_tags(library.records()).len(),
        version: library.version(),
        config: config.path.as_ref().map(|p| p.display().to_string()),
        warnings: library.report().warnings(),
    };

    if json {
        return print_json(&output);
    }

    Status::success(&format!(
        "Loaded {} with {}",
        format_count(output.prompts, "prompt", "prompts"),
        format_count(output.tags, "tag", "tags")
    ));
    if let Some(version) = output.version {
        Status::info(&format!("Export format {version}"));
    }
    match &output.config {
        Some(path) => Status::info(&format!("Config {path}")),
        None => Status::info("Using built-in configuration defaults"),
    }
    for warning in output.warnings {
        Status::warning(&warning.to_string());
    }

    exit_codes::SUCCESS
}
