//! phonetica-resolver - batch phonetics lookup
//!
//! Reads one word or phrase per line (file or stdin), resolves US and UK
//! transcriptions and prints one JSON object per input line:
//!
//! ```text
//! {"word":"look after","us":"/lʊk ˈæftɚ/","uk":"/lʊk ˈɑːftə/"}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phonetica_common::config::{database_path, load_or_default, resolve_root_folder};
use phonetica_resolver::cache::{DurableSlot, SqliteSlot};
use phonetica_resolver::config::ResolverSettings;
use phonetica_resolver::dictionary::JsonFileSource;
use phonetica_resolver::normalize::{TokenizePolicy, Tokenizer};
use phonetica_resolver::{
    BatchCoordinator, BatchItem, Phonetic, ResolutionContext, ResolutionEngine,
};

/// Command-line arguments for phonetica-resolver
#[derive(Parser, Debug)]
#[command(name = "phonetica-resolver")]
#[command(about = "Resolve US/UK phonetic transcriptions for a word list")]
#[command(version)]
struct Args {
    /// Word list, one entry per line (stdin when omitted)
    input: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "PHONETICA_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the cache database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// US dictionary JSON (overrides config)
    #[arg(long)]
    us_dict: Option<PathBuf>,

    /// UK dictionary JSON (overrides config)
    #[arg(long)]
    uk_dict: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long)]
    no_persist: bool,

    /// Look up common idioms ("look after", "a lot") as whole phrases
    #[arg(long)]
    idioms: bool,
}

#[derive(Serialize)]
struct OutputRow<'a> {
    word: &'a str,
    us: &'a Phonetic,
    uk: &'a Phonetic,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries the results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting phonetica-resolver {}", env!("CARGO_PKG_VERSION"));

    let mut settings = ResolverSettings::resolve(&toml_config);
    if let Some(path) = args.us_dict {
        settings.us_dictionary = path;
    }
    if let Some(path) = args.uk_dict {
        settings.uk_dictionary = path;
    }
    if args.no_persist {
        settings.persist_cache = false;
    }
    if args.idioms {
        settings.tokenize_policy = TokenizePolicy::default_idioms();
    }

    let slot: Option<Arc<dyn DurableSlot>> = if settings.persist_cache {
        let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
        let db_path = database_path(&root_folder);
        info!("Cache database: {}", db_path.display());

        match phonetica_common::db::init_database_pool(&db_path).await {
            Ok(pool) => Some(Arc::new(SqliteSlot::new(pool)) as Arc<dyn DurableSlot>),
            Err(e) => {
                tracing::warn!(error = %e, "Cache database unavailable, continuing without persistence");
                None
            }
        }
    } else {
        None
    };

    let context = ResolutionContext::new(
        Arc::new(JsonFileSource::new(
            &settings.us_dictionary,
            &settings.uk_dictionary,
        )),
        settings.cache(slot),
    );

    let remote = settings
        .remote_resolver()
        .context("Failed to create remote resolver")?;
    let engine = ResolutionEngine::new(
        Tokenizer::new(settings.tokenize_policy.clone()),
        Arc::new(remote),
    );
    let coordinator = BatchCoordinator::new(engine);

    let input = read_input(args.input.as_ref()).await?;
    let mut items: Vec<BatchItem> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(BatchItem::new)
        .collect();

    coordinator
        .resolve_items(&context, &mut items, |done, total| {
            info!(done, total, "Progress {}/{}", done, total);
        })
        .await
        .context("Batch lookup failed")?;

    for item in &items {
        if let Some(result) = &item.result {
            let row = OutputRow {
                word: &item.word,
                us: &result.us,
                uk: &result.uk,
            };
            println!("{}", serde_json::to_string(&row)?);
        }
    }

    Ok(())
}

async fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
