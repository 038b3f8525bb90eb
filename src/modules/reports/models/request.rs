use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

use super::report::{ReportFilters, ReportFormat};

/// Request body accepted by every report endpoint.
/// Dates use `YYYY-MM-DD`; omitting `format` selects the JSON view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub include_details: Option<bool>,
    #[serde(default)]
    pub selected_categories: Option<Vec<i64>>,
    #[serde(default)]
    pub selected_products: Option<Vec<i64>>,
    #[serde(default)]
    pub selected_customers: Option<Vec<i64>>,
}

impl ReportRequest {
    /// Parse the requested download format; `None` means JSON
    pub fn parse_format(&self) -> Result<Option<ReportFormat>> {
        match self.format.as_deref() {
            None | Some("") | Some("json") => Ok(None),
            Some(raw) => raw
                .parse::<ReportFormat>()
                .map(Some)
                .map_err(AppError::validation),
        }
    }

    /// Resolve the date range for sales-shaped reports.
    /// Default: the trailing 30 days ending today. Rejected before any
    /// fetch when malformed or inverted.
    pub fn resolve_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let end = match self.end_date.as_deref() {
            Some(raw) => parse_date(raw, "end_date")?,
            None => today,
        };
        let start = match self.start_date.as_deref() {
            Some(raw) => parse_date(raw, "start_date")?,
            None => end - Duration::days(30),
        };

        if end < start {
            return Err(AppError::validation(format!(
                "end_date ({}) must not be before start_date ({})",
                end, start
            )));
        }

        Ok((start, end))
    }

    /// Resolve the target year for financial reports: the year of
    /// `start_date` when given, otherwise the current year.
    pub fn resolve_year(&self, today: NaiveDate) -> Result<i32> {
        use chrono::Datelike;

        match self.start_date.as_deref() {
            Some(raw) => Ok(parse_date(raw, "start_date")?.year()),
            None => Ok(today.year()),
        }
    }

    pub fn filters(&self) -> ReportFilters {
        ReportFilters {
            categories: self.selected_categories.clone().unwrap_or_default(),
            products: self.selected_products.clone().unwrap_or_default(),
            customers: self.selected_customers.clone().unwrap_or_default(),
        }
    }

    pub fn include_details(&self) -> bool {
        self.include_details.unwrap_or(true)
    }
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} '{}'. Expected YYYY-MM-DD",
            field, raw
        ))
    })
}
