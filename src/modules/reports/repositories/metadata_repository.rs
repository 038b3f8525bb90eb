use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{ReportMetadata, ReportStatus, ReportType};

/// Persistence for the report metadata audit trail
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    /// Record a freshly generated report. Called exactly once per record.
    async fn insert(&self, metadata: &ReportMetadata) -> Result<()>;

    /// Most recent records, newest first
    async fn list_recent(&self, limit: i64) -> Result<Vec<ReportMetadata>>;

    /// Flip generated records whose expiry passed to expired.
    /// Returns the number of records transitioned.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64>;
}

pub struct SqliteMetadataRepository {
    pool: SqlitePool,
}

impl SqliteMetadataRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; SQLite has no decimal or enum types, so amounts and
/// enums travel as TEXT and are parsed on the way out.
#[derive(sqlx::FromRow)]
struct MetadataRow {
    id: String,
    report_type: String,
    format: String,
    title: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    parameters: String,
    row_count: i64,
    total_amount: String,
    status: String,
    generated_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    file_name: Option<String>,
    file_size: Option<i64>,
}

impl TryFrom<MetadataRow> for ReportMetadata {
    type Error = AppError;

    fn try_from(row: MetadataRow) -> Result<Self> {
        Ok(ReportMetadata {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| AppError::internal(format!("Corrupt metadata id: {}", e)))?,
            report_type: ReportType::from_str(&row.report_type).map_err(AppError::internal)?,
            format: row.format,
            title: row.title,
            start_date: row.start_date,
            end_date: row.end_date,
            parameters: row.parameters,
            row_count: row.row_count,
            total_amount: Decimal::from_str(&row.total_amount).unwrap_or(Decimal::ZERO),
            status: ReportStatus::from_str(&row.status).map_err(AppError::internal)?,
            generated_at: row.generated_at,
            expires_at: row.expires_at,
            file_name: row.file_name,
            file_size: row.file_size,
        })
    }
}

#[async_trait]
impl MetadataRepository for SqliteMetadataRepository {
    async fn insert(&self, metadata: &ReportMetadata) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO report_metadata (
                id, report_type, format, title, start_date, end_date,
                parameters, row_count, total_amount, status,
                generated_at, expires_at, file_name, file_size
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(metadata.id.to_string())
        .bind(metadata.report_type.to_string())
        .bind(&metadata.format)
        .bind(&metadata.title)
        .bind(metadata.start_date)
        .bind(metadata.end_date)
        .bind(&metadata.parameters)
        .bind(metadata.row_count)
        .bind(metadata.total_amount.to_string())
        .bind(metadata.status.to_string())
        .bind(metadata.generated_at)
        .bind(metadata.expires_at)
        .bind(&metadata.file_name)
        .bind(metadata.file_size)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<ReportMetadata>> {
        let rows = sqlx::query_as::<_, MetadataRow>(
            r#"
            SELECT id, report_type, format, title, start_date, end_date,
                   parameters, row_count, total_amount, status,
                   generated_at, expires_at, file_name, file_size
            FROM report_metadata
            ORDER BY generated_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ReportMetadata::try_from).collect()
    }

    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE report_metadata
            SET status = 'expired'
            WHERE status = 'generated' AND expires_at IS NOT NULL AND expires_at < ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
