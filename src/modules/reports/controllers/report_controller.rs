use std::sync::Arc;

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::modules::export::{CsvExporter, ExcelExporter, PdfExporter};
use crate::modules::reports::models::{
    Report, ReportFormat, ReportMetadata, ReportRequest, ReportStatus, ReportType,
};
use crate::modules::reports::repositories::MetadataRepository;
use crate::modules::reports::services::ReportService;

/// Shared handler state for the report endpoints
#[derive(Clone)]
pub struct ReportContext {
    pub service: Arc<ReportService>,
    pub metadata: Arc<dyn MetadataRepository>,
    pub retention_days: u32,
}

/// JSON envelope around the canonical report
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: Report,
}

/// Wire shape of one history entry; amounts travel as strings
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub report_type: ReportType,
    pub format: String,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub row_count: i64,
    pub total_amount: String,
    pub status: ReportStatus,
    pub generated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

impl From<ReportMetadata> for HistoryEntry {
    fn from(meta: ReportMetadata) -> Self {
        HistoryEntry {
            id: meta.id,
            report_type: meta.report_type,
            format: meta.format,
            title: meta.title,
            start_date: meta.start_date,
            end_date: meta.end_date,
            row_count: meta.row_count,
            total_amount: meta.total_amount.to_string(),
            status: meta.status,
            generated_at: meta.generated_at,
            expires_at: meta.expires_at,
            file_name: meta.file_name,
            file_size: meta.file_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Generate a report
/// POST /reports/{report_type}
/// Returns the JSON view, or a file download when `format` is set
pub async fn generate_report(
    ctx: web::Data<ReportContext>,
    path: web::Path<String>,
    body: web::Json<ReportRequest>,
) -> Result<HttpResponse, AppError> {
    let report_type: ReportType = path
        .into_inner()
        .parse()
        .map_err(AppError::validation)?;
    let request = body.into_inner();
    let format = request.parse_format()?;

    let report = ctx.service.generate(report_type, &request).await?;

    let parameters = serde_json::to_string(&request)?;
    let response = match format {
        None => {
            record_metadata(&ctx, &report, "json", parameters, None, None).await;
            HttpResponse::Ok().json(ReportResponse {
                title: report.title(),
                generated_at: Utc::now(),
                report,
            })
        }
        Some(format) => {
            let bytes = export(&report, format)?;
            let file_name = download_file_name(report_type, format, Utc::now().date_naive());
            info!(
                report_type = %report_type,
                format = %format,
                file_name = %file_name,
                size = bytes.len(),
                "Report exported"
            );
            record_metadata(
                &ctx,
                &report,
                &format.to_string(),
                parameters,
                Some(file_name.clone()),
                Some(bytes.len() as i64),
            )
            .await;

            HttpResponse::Ok()
                .content_type(format.mime_type())
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", file_name),
                ))
                .body(bytes)
        }
    };

    Ok(response)
}

/// List recently generated reports
/// GET /reports/history?limit=N
pub async fn report_history(
    ctx: web::Data<ReportContext>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let entries = ctx.metadata.list_recent(limit).await?;
    let entries: Vec<HistoryEntry> = entries.into_iter().map(HistoryEntry::from).collect();
    Ok(HttpResponse::Ok().json(entries))
}

fn export(report: &Report, format: ReportFormat) -> Result<Vec<u8>, AppError> {
    match format {
        ReportFormat::Pdf => PdfExporter::new().render(report),
        ReportFormat::Excel => ExcelExporter::new().render(report),
        ReportFormat::Csv => CsvExporter::new().render(report),
    }
}

fn download_file_name(report_type: ReportType, format: ReportFormat, today: NaiveDate) -> String {
    format!(
        "{}Report_{}.{}",
        report_type.display_name(),
        today.format("%Y%m%d"),
        format.extension()
    )
}

/// Persist the audit record. Failures are logged, never surfaced; the
/// report the caller asked for was already produced.
async fn record_metadata(
    ctx: &ReportContext,
    report: &Report,
    format: &str,
    parameters: String,
    file_name: Option<String>,
    file_size: Option<i64>,
) {
    let metadata = ReportMetadata::for_report(
        report,
        format,
        parameters,
        file_name,
        file_size,
        ctx.retention_days,
    );
    if let Err(e) = ctx.metadata.insert(&metadata).await {
        warn!(error = %e, report_type = %metadata.report_type, "Failed to record report metadata");
    }
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/history", web::get().to(report_history))
            .route("/{report_type}", web::post().to(generate_report)),
    );
}
