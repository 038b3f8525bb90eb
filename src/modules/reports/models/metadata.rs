// Audit-trail record kept per generated report. Mutable only at creation
// and on the expiry sweep (generated -> expired).

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::report::{Report, ReportType};

/// Lifecycle of a metadata record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Generated,
    Expired,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Generated => write!(f, "generated"),
            ReportStatus::Expired => write!(f, "expired"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "generated" => Ok(ReportStatus::Generated),
            "expired" => Ok(ReportStatus::Expired),
            _ => Err(format!("Invalid report status: {}", s)),
        }
    }
}

/// One generated report, as remembered after the response is gone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub id: Uuid,
    pub report_type: ReportType,
    /// "json" for the canonical view, otherwise the download format
    pub format: String,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Request parameters as submitted, serialized to JSON
    pub parameters: String,
    pub row_count: i64,
    pub total_amount: Decimal,
    pub status: ReportStatus,
    pub generated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

impl ReportMetadata {
    /// Build the record for a freshly generated report
    pub fn for_report(
        report: &Report,
        format: &str,
        parameters: String,
        file_name: Option<String>,
        file_size: Option<i64>,
        retention_days: u32,
    ) -> Self {
        let now = Utc::now();
        let (start_date, end_date) = match report.date_range() {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        ReportMetadata {
            id: Uuid::new_v4(),
            report_type: report.report_type(),
            format: format.to_string(),
            title: report.title(),
            start_date,
            end_date,
            parameters,
            row_count: report.row_count(),
            total_amount: report.total_amount(),
            status: ReportStatus::Generated,
            generated_at: now,
            expires_at: Some(now + Duration::days(i64::from(retention_days))),
            file_name,
            file_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::reports::models::report::{SalesReport, SalesSummary};
    use rust_decimal_macros::dec;

    #[test]
    fn test_metadata_captures_report_fields() {
        let report = Report::Sales(SalesReport {
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            summary: SalesSummary {
                total_sales: dec!(500.00),
                total_orders: 5,
                average_order_value: dec!(100.00),
            },
            daily_sales: vec![],
            top_products: vec![],
            top_customers: vec![],
        });

        let meta = ReportMetadata::for_report(
            &report,
            "pdf",
            "{}".to_string(),
            Some("SalesReport_20250630.pdf".to_string()),
            Some(1024),
            30,
        );

        assert_eq!(meta.report_type, ReportType::Sales);
        assert_eq!(meta.total_amount, dec!(500.00));
        assert_eq!(meta.status, ReportStatus::Generated);
        assert_eq!(meta.start_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(meta.expires_at.unwrap() > meta.generated_at);
    }
}
