//! Monthly KPI reports.

use pulse_core::entities::{MonthlyKpi, ReportSubject, parse_month};

use crate::{ApiError, PulseClient, http};

const REPORT_PATH: &str = "reports/monthly/";

impl PulseClient {
    /// `GET /reports/monthly/?format=json`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a month that is not `YYYY-MM`,
    /// otherwise any request failure.
    pub async fn monthly_report(&self, month: &str, subject: ReportSubject) -> Result<MonthlyKpi, ApiError> {
        let resp = self.report_request(month, subject, "json")?.send().await?;
        http::json(resp).await
    }

    /// `GET /reports/monthly/?format=csv`, returned as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a month that is not `YYYY-MM`,
    /// otherwise any request failure.
    pub async fn monthly_report_csv(&self, month: &str, subject: ReportSubject) -> Result<Vec<u8>, ApiError> {
        let resp = self.report_request(month, subject, "csv")?.send().await?;
        let resp = http::check_response(resp).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    fn report_request(
        &self,
        month: &str,
        subject: ReportSubject,
        format: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let month = parse_month(month)?;
        Ok(self.get(REPORT_PATH).query(&[
            ("month", month),
            ("user", subject.as_param()),
            ("format", format.to_string()),
        ]))
    }
}
