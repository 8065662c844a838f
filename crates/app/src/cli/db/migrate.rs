use stockroom_app::database;
use tracing::info;

use crate::cli::Global;

pub(crate) async fn run(global: &Global) -> Result<(), String> {
    let pool = database::connect(global.database_url())
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    info!("migrations applied");
    println!("migrations applied");

    Ok(())
}
