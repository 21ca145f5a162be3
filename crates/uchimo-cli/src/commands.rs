//! Command implementations

use std::path::Path;

use tracing::{info, warn};
use uchimo_common::{AppConfig, AppError, AppResult, ErrorResponse};
use uchimo_core::PostId;
use uchimo_db::{create_pool, run_migrations, PgPool, PoolConfig, MIGRATIONS_DIR};
use uchimo_service::{MaintenanceService, ServiceContextBuilder, ThreadService};

use crate::cli::Command;

/// Connect to PostgreSQL using the configured pool settings
pub async fn connect(config: &AppConfig) -> AppResult<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");
    Ok(pool)
}

/// Run one command against the configured database
pub async fn run(config: AppConfig, command: Command) -> AppResult<()> {
    let pool = connect(&config).await?;

    match command {
        Command::Migrate { dir } => {
            let dir = dir.unwrap_or_else(|| Path::new(MIGRATIONS_DIR).to_path_buf());
            run_migrations(&pool, &dir)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!(dir = %dir.display(), "Migrations applied");
        }
        Command::Seed => {
            let ctx = ServiceContextBuilder::new()
                .config(&config)
                .postgres(&pool)
                .build()?;
            let report = ThreadService::new(&ctx).seed_defaults().await?;
            for slug in &report.created {
                println!("created {slug}");
            }
            println!(
                "{} created, {} already present",
                report.created.len(),
                report.skipped
            );
        }
        Command::Recount { post_ids } => {
            let ids = post_ids
                .into_iter()
                .map(PostId::parse)
                .collect::<Result<Vec<_>, _>>()
                .map_err(AppError::validation)?;

            let ctx = ServiceContextBuilder::new()
                .config(&config)
                .postgres(&pool)
                .build()?;
            let maintenance = MaintenanceService::new(&ctx);

            for id in &ids {
                let drift = maintenance.recount_post(id).await?;
                if !drift.is_consistent() {
                    warn!(post_id = %id, "Counters were out of step with records");
                }
                let json = serde_json::to_string(&drift).map_err(AppError::internal)?;
                println!("{json}");
            }
        }
    }

    pool.close().await;
    Ok(())
}

/// JSON error line written to stderr when a command fails
pub fn error_report(err: &AppError) -> String {
    serde_json::to_string(&ErrorResponse::from(err))
        .unwrap_or_else(|_| format!(r#"{{"code":"{}"}}"#, err.error_code()))
}
