use std::time::Duration;

use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pos={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let db = match connect_database(&settings.database).await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!("failed to initialize database: {err}");
            return Err(err);
        }
    };

    let mut builder = engine::Engine::builder().database(db);
    if settings.server.operation_timeout_secs > 0 {
        builder = builder.operation_timeout(Duration::from_secs(
            settings.server.operation_timeout_secs,
        ));
    }
    let engine = builder.build().await?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return Err(err.into());
        }
    };

    server::run_with_listener(engine, &settings.server.cors_origins, listener).await?;
    tracing::info!("server stopped");

    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!(driver = ?config.driver, "connecting to database");
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
