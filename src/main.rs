//! Nutrilog
//!
//! An MCP server for a nutrition diary: ingredients, recipes and meals.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrilog::build_info;
use nutrilog::config::{Config, DEFAULT_LOG_DIRECTIVE};
use nutrilog::context::AppContext;
use nutrilog::db;
use nutrilog::mcp::NutrilogService;

/// NUTRILOG_LOG wins over RUST_LOG; both fall back to nutrilog=info
fn env_filter(config: &Config) -> Result<EnvFilter, Box<dyn std::error::Error>> {
    match &config.log_directive {
        Some(directive) => Ok(EnvFilter::try_new(directive)?),
        None => Ok(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Logging goes to stderr so it doesn't interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config)?)
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner(&config);
    eprintln!("Starting MCP server on stdio...");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::open_migrated(&config.database_path)?;
    let version = database.with_conn(db::migrations::get_schema_version)?;
    eprintln!("Database schema version: {}", version);

    let service = NutrilogService::new(AppContext::new(database, config));

    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
