//! Export assembly: records + aggregates → rendered document.
//!
//! Filters are validated before any row is loaded, and the rendered file is
//! built completely in memory before anything is sent: an export either
//! fails up front or completes whole.

use crate::{
    DateRange, Document, ReportFormat, ResultEngine, report::expense_report,
    report::sales_report,
};

use super::{Engine, SaleScope};

impl Engine {
    /// Renders the sales report over all users' sales. Admin only.
    pub async fn export_sales(
        &self,
        user_id: &str,
        range: &DateRange,
        format: ReportFormat,
    ) -> ResultEngine<Document> {
        let (sales, summary) = self
            .sales_with_summary(user_id, SaleScope::All, range)
            .await?;
        let report = sales_report(&sales, &summary);
        report.to_document("sales_report", format)
    }

    /// Renders the expense ledger report. Admin only.
    pub async fn export_expenses(
        &self,
        user_id: &str,
        range: &DateRange,
        format: ReportFormat,
    ) -> ResultEngine<Document> {
        let ledger = self.expense_ledger(user_id, range).await?;
        let report = expense_report(&ledger);
        report.to_document("expense_report", format)
    }
}
