use std::{sync::Arc, time::Duration};

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "medledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = Arc::new(engine::Engine::builder().database(db.clone()).build().await?);

    let mut tasks = tokio::task::JoinSet::new();

    {
        let engine = engine.clone();
        let db = db.clone();
        let bind = settings
            .server
            .bind
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = settings.server.port;
        tasks.spawn(async move {
            let addr = format!("{bind}:{port}");
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, db, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    {
        let engine = engine.clone();
        let interval_secs = settings
            .outbox
            .map(|outbox| outbox.interval_secs)
            .unwrap_or(5);
        tasks.spawn(async move {
            publish_outbox(engine, Duration::from_secs(interval_secs)).await;
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

/// Drains the transactional outbox, best-effort.
///
/// Publishing here means logging the event for downstream consumers; a
/// failed pass leaves the rows unpublished and the next tick retries them.
/// Nothing in this loop can affect the writes the events describe.
async fn publish_outbox(engine: Arc<engine::Engine>, every: Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;

        let events = match engine.pending_events(50).await {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!("failed to load pending events: {err}");
                continue;
            }
        };

        for event in events {
            tracing::info!(
                entity = event.entity.as_str(),
                action = event.action.as_str(),
                user_id = %event.user_id,
                payload = %event.payload,
                "domain event"
            );
            if let Err(err) = engine.mark_event_published(event.id, Utc::now()).await {
                tracing::warn!("failed to mark event {} published: {err}", event.id);
                break;
            }
        }
    }
}
