//! Crawl and ingest command handlers.
//!
//! A failing source never aborts a run; only configuration problems and a
//! storage outage do.

use techfeed_core::{AppConfig, Organization, SourceConfig};
use techfeed_crawler::{
    CrawlReport, FeedClient, FeedProcessor, IngestRun, Orchestrator, SourceRegistry,
};
use techfeed_enrich::{
    HttpImageStore, OpenAiSummarizer, PersistPipeline, PersistReport, ThumbnailRelocator,
};

use crate::store::PgPostStore;

/// Load configured sources (file or built-in list) and apply the
/// organization filter.
///
/// A source without an explicit organization is matched by what the registry
/// detects for its feed URL.
pub(crate) fn load_sources_for_run(
    config: &AppConfig,
    registry: &SourceRegistry,
    org_filter: Option<Organization>,
) -> anyhow::Result<Vec<SourceConfig>> {
    let sources = match &config.sources_path {
        Some(path) => techfeed_core::load_sources(path)?.sources,
        None => techfeed_core::default_sources(),
    };
    Ok(filter_sources(sources, registry, org_filter))
}

pub(crate) fn filter_sources(
    sources: Vec<SourceConfig>,
    registry: &SourceRegistry,
    org_filter: Option<Organization>,
) -> Vec<SourceConfig> {
    let Some(wanted) = org_filter else {
        return sources;
    };
    sources
        .into_iter()
        .filter(|source| {
            let org = source.organization.or_else(|| {
                registry
                    .detect(&source.feed_url, None)
                    .map(techfeed_crawler::SourceType::organization)
            });
            org == Some(wanted)
        })
        .collect()
}

pub(crate) fn effective_max_posts(
    default_max_posts: usize,
    override_max: Option<usize>,
) -> anyhow::Result<usize> {
    match override_max {
        Some(0) => anyhow::bail!("--max-posts must be at least 1"),
        Some(n) => Ok(n),
        None => Ok(default_max_posts),
    }
}

async fn crawl(
    config: &AppConfig,
    max_posts: Option<usize>,
    org_filter: Option<Organization>,
) -> anyhow::Result<IngestRun> {
    let max_posts = effective_max_posts(config.default_max_posts, max_posts)?;
    let registry = SourceRegistry::builtin();
    let sources = load_sources_for_run(config, &registry, org_filter)?;
    if sources.is_empty() {
        tracing::warn!("no sources selected; nothing to crawl");
    }

    let client = FeedClient::new(config.http_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build feed client: {e}"))?;
    let orchestrator = Orchestrator::new(
        registry,
        FeedProcessor::new(client),
        config.max_concurrent_sources,
    );

    Ok(orchestrator.run(&sources, max_posts).await)
}

/// Crawl and print every normalized post without touching the database.
///
/// # Errors
///
/// Returns an error if sources cannot be loaded or the HTTP client cannot be
/// built.
pub(crate) async fn run_crawl(
    config: &AppConfig,
    max_posts: Option<usize>,
    org_filter: Option<Organization>,
) -> anyhow::Result<()> {
    let run = crawl(config, max_posts, org_filter).await?;

    for post in &run.posts {
        let estimated = if post.published_at_fallback() {
            " (estimated)"
        } else {
            ""
        };
        println!(
            "[{}] {} | {}{estimated}\n  {}\n  thumbnail: {}",
            post.source_name(),
            post.title(),
            post.published_at().to_rfc3339(),
            post.source_url(),
            post.thumbnail_url().unwrap_or("-"),
        );
    }
    print_crawl_report(&run.report);
    Ok(())
}

/// Crawl, enrich, and persist new posts in one transaction.
///
/// # Errors
///
/// Returns an error if configuration is incomplete (database URL, API key),
/// the database is unreachable, or storage fails mid-run.
pub(crate) async fn run_ingest(
    config: &AppConfig,
    max_posts: Option<usize>,
    org_filter: Option<Organization>,
) -> anyhow::Result<()> {
    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is required for the run command"))?;
    let summarizer = OpenAiSummarizer::new(
        api_key,
        &config.openai_model,
        config.openai_temperature,
        &config.openai_base_url,
        config.http_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build summarizer: {e}"))?;

    let relocator = match &config.image_upload {
        Some(upload) => {
            let image_store = HttpImageStore::new(upload.clone(), config.image_timeout_secs)?;
            Some(ThumbnailRelocator::new(
                Box::new(image_store),
                config.image_timeout_secs,
                config.image_max_retries,
                config.image_retry_backoff_ms,
            )?)
        }
        None => {
            tracing::info!("image upload not configured; storing original thumbnail URLs");
            None
        }
    };

    let pool = techfeed_db::connect_pool_from_config(config).await?;
    let store = PgPostStore::new(pool);

    let run = crawl(config, max_posts, org_filter).await?;
    print_crawl_report(&run.report);

    let pipeline = PersistPipeline::new(&store, &summarizer, relocator.as_ref());
    let report = pipeline.persist(run.posts).await?;
    tracing::info!(
        saved = report.saved,
        duplicates = report.duplicates,
        failed = report.failed,
        "ingest run complete"
    );
    print_persist_report(&report);
    Ok(())
}

fn print_crawl_report(report: &CrawlReport) {
    println!(
        "sources: {} configured, {} processed, {} unknown, {} failed",
        report.sources_configured,
        report.sources_processed,
        report.sources_unknown,
        report.sources_failed,
    );
    println!(
        "entries: {} posts, {} skipped, {} failed",
        report.posts_found, report.entries_skipped, report.entries_failed,
    );
}

fn print_persist_report(report: &PersistReport) {
    println!(
        "persist: {} saved, {} duplicates, {} failed",
        report.saved, report.duplicates, report.failed,
    );
}
