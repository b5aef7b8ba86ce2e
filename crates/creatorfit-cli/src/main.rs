mod qualify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use creatorfit_core::Taxonomy;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "creatorfit-cli")]
#[command(about = "CreatorFit command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a qualification for one creator and persist the result
    Qualify {
        /// Creator public id (UUID)
        #[arg(long)]
        creator: String,

        /// Use the fixed demo signals instead of the latest stored snapshot
        #[arg(long)]
        demo: bool,
    },
    /// Classify a bio without touching the database
    Classify {
        #[arg(long, default_value = "")]
        bio: String,

        #[arg(long, default_value = "")]
        category: String,

        /// Fall back to the declared category when no keyword matches
        #[arg(long)]
        use_declared_category: bool,

        /// YAML taxonomy replacing the built-in tables
        #[arg(long, env = "CREATORFIT_TAXONOMY_PATH")]
        taxonomy: Option<PathBuf>,
    },
    /// List creators with their latest score
    Creators {
        /// Filter by lifecycle status
        #[arg(long)]
        status: Option<String>,

        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

fn load_taxonomy(path: Option<&std::path::Path>) -> anyhow::Result<Taxonomy> {
    match path {
        Some(path) => Ok(creatorfit_core::load_taxonomy(path)?),
        None => Ok(Taxonomy::builtin()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => {
            let pool = creatorfit_db::connect_pool_from_env().await?;
            match command {
                DbCommands::Ping => {
                    creatorfit_db::ping(&pool).await?;
                    println!("database reachable");
                }
                DbCommands::Migrate => {
                    let applied = creatorfit_db::run_migrations(&pool).await?;
                    println!("migrations up to date ({applied} applied)");
                }
            }
        }
        Some(Commands::Qualify { creator, demo }) => {
            let config = creatorfit_core::load_app_config()?;
            let pool_config = creatorfit_db::PoolConfig::from_app_config(&config);
            let pool = creatorfit_db::connect_pool(&config.database_url, pool_config).await?;
            let taxonomy = load_taxonomy(config.taxonomy_path.as_deref())?;
            qualify::run_qualify(&pool, &config, &taxonomy, &creator, demo).await?;
        }
        Some(Commands::Classify {
            bio,
            category,
            use_declared_category,
            taxonomy,
        }) => {
            let taxonomy = load_taxonomy(taxonomy.as_deref())?;
            qualify::run_classify(&taxonomy, &bio, &category, use_declared_category);
        }
        Some(Commands::Creators { status, limit }) => {
            let pool = creatorfit_db::connect_pool_from_env().await?;
            qualify::run_creators_list(&pool, status.as_deref(), limit).await?;
        }
        None => {
            println!("creatorfit-cli: run with --help for available commands");
        }
    }

    Ok(())
}
