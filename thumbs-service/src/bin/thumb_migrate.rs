use blob_store::{ObjectLocation, S3ObjectStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;
use std::sync::Arc;
use std::time::Duration;
use thumbs_service::config::Config;
use thumbs_service::layout::ThumbLayoutEngine;
use thumbs_service::repo::{PgAssetRepository, PgPolicyRepository};
use tokio::time::sleep;
use tracing::{error, info};

/// Thumbnail layout backfill tool.
///
/// Walks the images table in batches and runs the idempotent layout
/// migration for every asset, converting legacy-layout thumbnails to the
/// canonical layout ahead of read traffic. Safe to re-run and to run while
/// the service is live: assets already carrying a canonical manifest are
/// skipped cheaply.
///
/// Env vars reused from thumbs-service:
/// DATABASE_URL, THUMBS_BUCKET, AWS_REGION, AWS_ACCESS_KEY_ID,
/// AWS_SECRET_ACCESS_KEY, S3_ENDPOINT (optional).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    let store = Arc::new(S3ObjectStore::from_env().await);
    let assets = Arc::new(PgAssetRepository::new(pool.clone()));
    let policies = Arc::new(PgPolicyRepository::new(pool.clone()));
    let engine = ThumbLayoutEngine::new(store, assets, policies);

    // Keyset pagination keeps batches cheap on large tables.
    const BATCH_SIZE: i64 = 100;
    let mut cursor: Option<(i32, i32, String)> = None;
    let mut migrated = 0u64;
    let mut failed = 0u64;

    loop {
        let (customer, space, name) = match &cursor {
            Some((c, s, n)) => (*c, *s, n.clone()),
            None => (i32::MIN, i32::MIN, String::new()),
        };
        let rows = sqlx::query(
            r#"
            SELECT customer, space, name
            FROM images
            WHERE (customer, space, name) > ($1, $2, $3)
            ORDER BY customer, space, name
            LIMIT $4
            "#,
        )
        .bind(customer)
        .bind(space)
        .bind(&name)
        .bind(BATCH_SIZE)
        .fetch_all(&pool)
        .await?;

        if rows.is_empty() {
            break;
        }

        for row in rows {
            let customer: i32 = row.get("customer");
            let space: i32 = row.get("space");
            let name: String = row.get("name");
            cursor = Some((customer, space, name.clone()));

            let root = ObjectLocation::new(
                config.storage.thumbs_bucket.clone(),
                format!("{}/{}/{}/", customer, space, name),
            );
            match engine.ensure_canonical_layout(&root).await {
                Ok(()) => migrated += 1,
                Err(e) => {
                    failed += 1;
                    error!(root = %root, error = %e, "Migration failed; will heal on next run");
                }
            }

            // Small pause to avoid S3 throttling burst.
            sleep(Duration::from_millis(50)).await;
        }

        info!(migrated, failed, "Batch complete");
    }

    info!(migrated, failed, "Backfill finished");
    Ok(())
}
