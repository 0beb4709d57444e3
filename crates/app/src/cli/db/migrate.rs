use bakery_app::{config::DatabaseConfig, database};
use clap::Args;
use tracing::info;

use crate::cli::open;

#[derive(Debug, Args)]
pub(crate) struct MigrateArgs {
    #[command(flatten)]
    database: DatabaseConfig,
}

pub(crate) async fn run(args: MigrateArgs) -> Result<(), String> {
    let db = open(&args.database).await?;

    database::migrate(db.pool())
        .await
        .map_err(|error| format!("failed to apply migrations: {error}"))?;

    info!("database schema is up to date");

    Ok(())
}
