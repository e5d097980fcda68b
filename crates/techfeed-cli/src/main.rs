mod ingest;
mod store;

use clap::{Parser, Subcommand};
use techfeed_core::Organization;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "techfeed")]
#[command(about = "Collects posts from company tech blogs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl the configured feeds and print what was found, without storing it
    Crawl {
        /// Per-source post cap for sources that do not set their own
        #[arg(long)]
        max_posts: Option<usize>,
        /// Only crawl sources belonging to this organization
        #[arg(long)]
        org: Option<Organization>,
    },
    /// Crawl, summarize, and store new posts
    Run {
        #[arg(long)]
        max_posts: Option<usize>,
        #[arg(long)]
        org: Option<Organization>,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = techfeed_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Crawl { max_posts, org }) => {
            ingest::run_crawl(&config, max_posts, org).await?;
        }
        Some(Commands::Run { max_posts, org }) => {
            ingest::run_ingest(&config, max_posts, org).await?;
        }
        Some(Commands::Migrate) => {
            let pool = techfeed_db::connect_pool_from_config(&config).await?;
            let applied = techfeed_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
