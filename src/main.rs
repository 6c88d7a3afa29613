//! Agente - article feed client
//!
//! Command-line front end over the feed session: list and search the
//! feed, toggle bookmarks and show counts.

use agente::{
    articles::{Article, FetchFilter, Source},
    config::AgenteConfig,
    feed::{EmptyState, FeedSession},
    remote::{MemoryGateway, RemoteGateway, RestGateway},
};
use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agente")]
#[command(version)]
#[command(about = "Article feed client with optimistic bookmarks")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AGENTE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Use a built-in in-memory feed instead of the remote store
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List articles, newest first
    List {
        /// Only saved articles
        #[arg(long)]
        saved: bool,

        /// Case-insensitive search over title, source and summary
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Save or unsave an article
    Toggle {
        /// Article ID
        id: String,
    },

    /// Show article counts
    Stats {
        /// Only saved articles
        #[arg(long)]
        saved: bool,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("agente={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config_path = cli
        .config
        .or_else(|| AgenteConfig::default_path().filter(|p| p.exists()));
    let config = AgenteConfig::load(config_path.as_deref())?;

    if let Commands::Config { default } = cli.command {
        return show_config(if default { None } else { Some(&config) });
    }

    let gateway: Arc<dyn RemoteGateway> = if cli.offline {
        Arc::new(MemoryGateway::with_articles(demo_articles()))
    } else {
        Arc::new(RestGateway::new(&config.remote)?)
    };
    let session = FeedSession::new(gateway, &config);

    match cli.command {
        Commands::List { saved, query } => {
            session.request_fetch(filter_for(saved)).await?;
            if let Some(query) = query {
                session.set_query(query).await;
            }
            print_feed(&session).await;
        }
        Commands::Toggle { id } => {
            session.refresh().await?;
            let outcome = session.request_toggle(&id).await?;
            for notification in session.notifications().list().await {
                println!("[{}] {}", notification.kind, notification.message);
            }
            if let Some(article) = session.store().get(&outcome.id).await {
                println!("{} -> {}", article.title, saved_label(article.is_saved));
            }
        }
        Commands::Stats { saved } => {
            session.request_fetch(filter_for(saved)).await?;
            let stats = session.stats().await;
            println!("Total articles: {}", stats.total);
            println!("Saved:          {}", stats.saved);
            println!("Active sources: {}", stats.sources);
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn filter_for(saved: bool) -> FetchFilter {
    if saved {
        FetchFilter::SavedOnly
    } else {
        FetchFilter::All
    }
}

fn saved_label(saved: bool) -> &'static str {
    if saved {
        "saved"
    } else {
        "not saved"
    }
}

async fn print_feed(session: &FeedSession) {
    let view = session.view().await;
    let now = Utc::now();
    let config = session.config();

    if !view.query.is_empty() {
        println!(
            "{} result{} for \"{}\"",
            view.result_count,
            if view.result_count == 1 { "" } else { "s" },
            view.query
        );
    }

    match session.empty_state().await {
        Some(EmptyState::NoResults) => println!("No results found. Try other terms."),
        Some(EmptyState::NoSaved) => println!("You have not saved any articles yet."),
        Some(EmptyState::NoArticles) => println!("No articles found. Run the scraper first."),
        None => {}
    }

    for article in &view.articles {
        let marker = if article.is_saved { "*" } else { " " };
        let new = if article.is_new(now, config.new_article_hours) {
            " NEW"
        } else {
            ""
        };
        println!(
            "{} [{}] {}{}  ({}, {})",
            marker,
            Source::label_for(&article.source),
            article.title,
            new,
            article.published_at.format("%Y-%m-%d"),
            article.read_time(config.words_per_minute)
        );
        println!("    id={} {}", article.id, article.url);
    }

    println!();
    println!(
        "{} total · {} saved · {} sources",
        view.stats.total, view.stats.saved, view.stats.sources
    );
}

fn show_config(config: Option<&AgenteConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

fn demo_articles() -> Vec<Article> {
    let now = Utc::now();
    let entries = [
        ("hacker_news_ai", "Open-weight model tops coding benchmark", Some("Community benchmark results for a new open model."), true),
        ("bens_bites", "Agents that book your travel", Some("Scraped from Ben's Bites homepage."), false),
        ("ai_rundown", "The week in AI policy", None, false),
        ("reddit", "What is your local inference setup?", Some("Trending tech news."), false),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (source, title, summary, saved))| Article {
            id: (i + 1).to_string(),
            title: title.to_string(),
            source: source.to_string(),
            url: format!("https://example.com/articles/{}", i + 1),
            summary: summary.map(str::to_string),
            published_at: now - Duration::hours(i as i64 * 4),
            image_url: None,
            is_saved: saved,
        })
        .collect()
}
