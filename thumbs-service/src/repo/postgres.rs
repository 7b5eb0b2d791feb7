//! Postgres-backed asset and policy repositories

use crate::error::Result;
use crate::model::{Asset, AssetId, ThumbnailPolicy};
use crate::repo::{AssetRepository, PolicyRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::{FromRow, PgPool};
use tracing::warn;

/// Raw asset row as stored; mapped into the typed [`Asset`] explicitly.
#[derive(Debug, FromRow)]
struct AssetRow {
    width: i32,
    height: i32,
    max_unauthorised: i32,
    roles: Option<String>,
    thumbnail_policy: String,
}

/// Asset lookup over the ingestion pipeline's `images` table.
#[derive(Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        let row: Option<AssetRow> = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT width, height, max_unauthorised, roles, thumbnail_policy
            FROM images
            WHERE customer = $1 AND space = $2 AND name = $3
            "#,
        )
        .bind(id.customer)
        .bind(id.space)
        .bind(&id.name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Asset {
            id: id.clone(),
            width: row.width.max(0) as u32,
            height: row.height.max(0) as u32,
            max_unauthorised: row.max_unauthorised,
            roles: split_csv(row.roles.as_deref()),
            thumbnail_policy: row.thumbnail_policy,
        }))
    }
}

#[derive(Debug, FromRow)]
struct PolicyRow {
    id: String,
    sizes: String,
}

/// Policy lookup over the `thumbnail_policies` table.
///
/// Policies are immutable, so rows are cached by id for the life of the
/// process.
#[derive(Clone)]
pub struct PgPolicyRepository {
    pool: PgPool,
    cache: std::sync::Arc<DashMap<String, ThumbnailPolicy>>,
}

impl PgPolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: std::sync::Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl PolicyRepository for PgPolicyRepository {
    async fn get_thumbnail_policy(&self, policy_id: &str) -> Result<Option<ThumbnailPolicy>> {
        if let Some(cached) = self.cache.get(policy_id) {
            return Ok(Some(cached.clone()));
        }

        let row: Option<PolicyRow> = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, sizes
            FROM thumbnail_policies
            WHERE id = $1
            "#,
        )
        .bind(policy_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut sizes = Vec::new();
        for part in row.sizes.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.parse::<u32>() {
                Ok(edge) if edge > 0 => sizes.push(edge),
                _ => {
                    warn!(policy_id = %row.id, edge = %part, "Skipping unparseable policy edge");
                }
            }
        }

        let policy = ThumbnailPolicy { id: row.id, sizes };
        self.cache.insert(policy_id.to_string(), policy.clone());
        Ok(Some(policy))
    }
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
