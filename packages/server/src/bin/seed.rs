use anyhow::Context;
use tracing::info;

use blog_server::config::AppConfig;
use blog_server::database::init_db;
use blog_server::seed::seed_sample_posts;
use blog_server::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load config")?;
    let _log_guard = telemetry::init_tracing(&config.log).context("Failed to open log file")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;

    let inserted = seed_sample_posts(&db)
        .await
        .context("Failed to seed database")?;

    info!(inserted, "Database seeding completed");
    Ok(())
}
