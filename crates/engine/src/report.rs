//! Format-agnostic report construction and serialization.
//!
//! A [`Report`] is built **once** per export from the records plus the
//! aggregation output; the CSV, XLSX, and PDF writers all consume that same
//! value. A serializer never recomputes a total, so the three formats can
//! never disagree.

use std::io::BufWriter;

use chrono::{DateTime, Utc};

use crate::{
    EngineError, ExpenseLedger, FieldErrors, Money, ResultEngine, Sale, SalesSummary,
};

/// Supported export document formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ReportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }

    /// MIME type sent with the attachment response.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Self::Pdf => "application/pdf",
        }
    }
}

impl TryFrom<&str> for ReportFormat {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "pdf" => Ok(Self::Pdf),
            other => Err(EngineError::Validation(FieldErrors::single(
                "format",
                format!("unknown report format: {other}"),
            ))),
        }
    }
}

/// One table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Money(Money),
    Count(i64),
    Empty,
}

impl Cell {
    /// Textual rendering shared by the CSV and PDF writers.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Money(amount) => amount.to_string(),
            Self::Count(count) => count.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// One table row; `bold` marks the emphasized totals row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub bold: bool,
}

impl Row {
    #[must_use]
    pub fn plain(cells: Vec<Cell>) -> Self {
        Self { cells, bold: false }
    }

    #[must_use]
    pub fn bold(cells: Vec<Cell>) -> Self {
        Self { cells, bold: true }
    }
}

/// A finished tabular document, independent of output format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub title: String,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
    pub footer: Vec<Row>,
}

/// A rendered export ready to be sent as a complete attachment.
#[derive(Clone, Debug)]
pub struct Document {
    pub filename: String,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
}

/// Report dates render as `DD/MM/YY`.
pub(crate) fn format_day(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%y").to_string()
}

const SALES_COLUMNS: &[&str] = &[
    "Date",
    "Recorded By",
    "Category",
    "Item",
    "Quantity",
    "Price (KES)",
    "Payment Method",
    "Payment Status",
    "Delivery Place",
];

const EXPENSE_COLUMNS: &[&str] = &[
    "Date",
    "Paid To",
    "Charged To",
    "Description",
    "Receipt No",
    "Sponsor",
    "Amount Injected",
    "Amount Paid",
    "Bank Charges",
    "Running Balance",
];

fn text_or_empty(value: &Option<String>) -> Cell {
    match value {
        Some(text) => Cell::Text(text.clone()),
        None => Cell::Empty,
    }
}

fn placeholder_row(message: &str, width: usize) -> Row {
    let mut cells = vec![Cell::Text(message.to_string())];
    cells.resize(width, Cell::Empty);
    Row::plain(cells)
}

/// Builds the sales report: header columns, one row per sale, and a single
/// emphasized totals row taken from the summary (never recomputed here).
#[must_use]
pub fn sales_report(sales: &[Sale], summary: &SalesSummary) -> Report {
    let columns = SALES_COLUMNS.to_vec();

    if summary.is_empty() {
        return Report {
            title: "Sales Report".to_string(),
            rows: vec![placeholder_row("no sales data available", columns.len())],
            footer: Vec::new(),
            columns,
        };
    }

    let rows = sales
        .iter()
        .map(|sale| {
            Row::plain(vec![
                Cell::Text(format_day(&sale.recorded_at)),
                Cell::Text(sale.owner.clone()),
                Cell::Text(sale.category.as_str().to_string()),
                Cell::Text(sale.item.clone()),
                Cell::Count(sale.quantity),
                Cell::Money(sale.price),
                Cell::Text(sale.payment_method.as_str().to_string()),
                Cell::Text(sale.payment_status.as_str().to_string()),
                text_or_empty(&sale.delivery_place),
            ])
        })
        .collect();

    let footer = vec![Row::bold(vec![
        Cell::Text("Totals".to_string()),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Count(summary.total_quantity),
        Cell::Money(summary.grand_total),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
    ])];

    Report {
        title: "Sales Report".to_string(),
        columns,
        rows,
        footer,
    }
}

/// Builds the expense report from the recomputed ledger: one row per
/// expense with its running balance, and a single emphasized totals row.
#[must_use]
pub fn expense_report(ledger: &ExpenseLedger) -> Report {
    let columns = EXPENSE_COLUMNS.to_vec();

    if ledger.is_empty() {
        return Report {
            title: "Expense Report".to_string(),
            rows: vec![placeholder_row("no expense data available", columns.len())],
            footer: Vec::new(),
            columns,
        };
    }

    let rows = ledger
        .lines
        .iter()
        .map(|line| {
            let expense = &line.expense;
            Row::plain(vec![
                Cell::Text(expense.date.label()),
                text_or_empty(&expense.paid_to),
                text_or_empty(&expense.charged_to),
                text_or_empty(&expense.description),
                text_or_empty(&expense.receipt_no),
                text_or_empty(&expense.sponsor),
                Cell::Money(expense.amount_injected.unwrap_or(Money::ZERO)),
                Cell::Money(expense.amount_paid.unwrap_or(Money::ZERO)),
                Cell::Money(expense.bank_charges.unwrap_or(Money::ZERO)),
                Cell::Money(line.running_balance),
            ])
        })
        .collect();

    let footer = vec![Row::bold(vec![
        Cell::Text("Totals".to_string()),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Money(ledger.totals.injected),
        Cell::Money(ledger.totals.paid),
        Cell::Money(ledger.totals.charges),
        Cell::Money(ledger.totals.closing_balance),
    ])];

    Report {
        title: "Expense Report".to_string(),
        columns,
        rows,
        footer,
    }
}

impl Report {
    fn body_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().chain(self.footer.iter())
    }

    /// Serializes into the requested format.
    pub fn render(&self, format: ReportFormat) -> ResultEngine<Vec<u8>> {
        match format {
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Xlsx => self.to_xlsx(),
            ReportFormat::Pdf => self.to_pdf(),
        }
    }

    /// Renders into a ready-to-send [`Document`].
    pub fn to_document(&self, stem: &str, format: ReportFormat) -> ResultEngine<Document> {
        Ok(Document {
            filename: format!("{stem}.{}", format.extension()),
            format,
            bytes: self.render(format)?,
        })
    }

    /// CSV: header record, one record per row, totals record(s) last.
    pub fn to_csv(&self) -> ResultEngine<Vec<u8>> {
        let export_err = |err: csv::Error| EngineError::Export(err.to_string());

        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .write_record(self.columns.iter().copied())
            .map_err(export_err)?;
        for row in self.body_rows() {
            writer
                .write_record(row.cells.iter().map(Cell::display))
                .map_err(export_err)?;
        }

        writer
            .into_inner()
            .map_err(|err| EngineError::Export(err.to_string()))
    }

    /// XLSX: bold header, numeric money cells with a two-decimal format,
    /// bold totals row.
    pub fn to_xlsx(&self) -> ResultEngine<Vec<u8>> {
        use rust_xlsxwriter::{Format, Workbook};

        let export_err = |err: rust_xlsxwriter::XlsxError| EngineError::Export(err.to_string());

        let header_format = Format::new().set_bold();
        let money_format = Format::new().set_num_format("0.00");
        let bold_format = Format::new().set_bold();
        let bold_money_format = Format::new().set_bold().set_num_format("0.00");

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.title).map_err(export_err)?;

        for (col, name) in self.columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *name, &header_format)
                .map_err(export_err)?;
        }

        for (index, row) in self.body_rows().enumerate() {
            let row_num = (index + 1) as u32;
            for (col, cell) in row.cells.iter().enumerate() {
                let col_num = col as u16;
                match cell {
                    Cell::Text(text) => {
                        if row.bold {
                            worksheet
                                .write_string_with_format(row_num, col_num, text, &bold_format)
                                .map_err(export_err)?;
                        } else {
                            worksheet
                                .write_string(row_num, col_num, text)
                                .map_err(export_err)?;
                        }
                    }
                    Cell::Money(amount) => {
                        let format = if row.bold {
                            &bold_money_format
                        } else {
                            &money_format
                        };
                        worksheet
                            .write_number_with_format(
                                row_num,
                                col_num,
                                amount.to_major_f64(),
                                format,
                            )
                            .map_err(export_err)?;
                    }
                    Cell::Count(count) => {
                        if row.bold {
                            worksheet
                                .write_number_with_format(
                                    row_num,
                                    col_num,
                                    *count as f64,
                                    &bold_format,
                                )
                                .map_err(export_err)?;
                        } else {
                            worksheet
                                .write_number(row_num, col_num, *count as f64)
                                .map_err(export_err)?;
                        }
                    }
                    Cell::Empty => {}
                }
            }
        }

        workbook.save_to_buffer().map_err(export_err)
    }

    /// PDF: paginated table in landscape A4, evenly spaced columns, header
    /// repeated per page, totals row in the bold face.
    pub fn to_pdf(&self) -> ResultEngine<Vec<u8>> {
        use printpdf::{BuiltinFont, Mm, PdfDocument};

        const PAGE_WIDTH: f64 = 297.0;
        const PAGE_HEIGHT: f64 = 210.0;
        const MARGIN: f64 = 14.0;
        const ROW_HEIGHT: f64 = 6.5;
        const FONT_SIZE: f64 = 8.0;
        const TITLE_SIZE: f64 = 12.0;

        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "table");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|err| EngineError::Export(err.to_string()))?;
        let bold_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|err| EngineError::Export(err.to_string()))?;

        let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / self.columns.len() as f64;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = PAGE_HEIGHT - MARGIN;

        layer.use_text(self.title.clone(), TITLE_SIZE as f32, Mm(MARGIN as f32), Mm(y as f32), &bold_font);
        y -= ROW_HEIGHT * 1.5;

        let draw_header = |layer: &printpdf::PdfLayerReference, y: f64| {
            for (col, name) in self.columns.iter().enumerate() {
                layer.use_text(
                    (*name).to_string(),
                    FONT_SIZE as f32,
                    Mm((MARGIN + column_width * col as f64) as f32),
                    Mm(y as f32),
                    &bold_font,
                );
            }
        };

        draw_header(&layer, y);
        y -= ROW_HEIGHT;

        for row in self.body_rows() {
            if y < MARGIN + ROW_HEIGHT {
                let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "table");
                layer = doc.get_page(page).get_layer(page_layer);
                y = PAGE_HEIGHT - MARGIN;
                draw_header(&layer, y);
                y -= ROW_HEIGHT;
            }

            let row_font = if row.bold { &bold_font } else { &font };
            for (col, cell) in row.cells.iter().enumerate() {
                let text = cell.display();
                if text.is_empty() {
                    continue;
                }
                layer.use_text(
                    text,
                    FONT_SIZE as f32,
                    Mm((MARGIN + column_width * col as f64) as f32),
                    Mm(y as f32),
                    row_font,
                );
            }
            y -= ROW_HEIGHT;
        }

        let mut bytes = Vec::new();
        doc.save(&mut BufWriter::new(&mut bytes))
            .map_err(|err| EngineError::Export(err.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        Category, Expense, ExpenseDate, PaymentMethod, PaymentStatus,
    };

    fn sample_sales() -> Vec<Sale> {
        vec![
            Sale {
                id: Uuid::new_v4(),
                owner: "alice".to_string(),
                category: Category::Water,
                item: "20L (Refill)".to_string(),
                quantity: 3,
                price: Money::from_major(750),
                payment_method: PaymentMethod::Cash,
                payment_status: PaymentStatus::Paid,
                delivery_place: None,
                recorded_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            },
            Sale {
                id: Uuid::new_v4(),
                owner: "bob".to_string(),
                category: Category::Gas,
                item: "6KG Gas (Refill)".to_string(),
                quantity: 1,
                price: Money::from_major(1200),
                payment_method: PaymentMethod::MPesa,
                payment_status: PaymentStatus::Delivery,
                delivery_place: Some("Umoja".to_string()),
                recorded_at: Utc.with_ymd_and_hms(2026, 3, 15, 17, 0, 0).unwrap(),
            },
        ]
    }

    fn sample_ledger() -> ExpenseLedger {
        ExpenseLedger::compute(vec![
            Expense {
                id: Uuid::new_v4(),
                owner: "admin".to_string(),
                date: ExpenseDate::Known(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()),
                paid_to: Some("Supplier".to_string()),
                charged_to: None,
                description: Some("stock".to_string()),
                receipt_no: Some("R-001".to_string()),
                sponsor: None,
                amount_injected: Some(Money::from_major(1000)),
                amount_paid: Some(Money::from_major(200)),
                bank_charges: Some(Money::from_major(20)),
            },
            Expense {
                id: Uuid::new_v4(),
                owner: "admin".to_string(),
                date: ExpenseDate::Known(NaiveDate::from_ymd_opt(2026, 1, 11).unwrap()),
                paid_to: None,
                charged_to: None,
                description: Some("transport".to_string()),
                receipt_no: None,
                sponsor: None,
                amount_injected: None,
                amount_paid: Some(Money::from_major(300)),
                bank_charges: Some(Money::from_major(10)),
            },
        ])
    }

    #[test]
    fn sales_report_has_one_row_per_record_plus_one_totals_row() {
        let sales = sample_sales();
        let summary = SalesSummary::compute(&sales);
        let report = sales_report(&sales, &summary);

        assert_eq!(report.rows.len(), sales.len());
        assert_eq!(report.footer.len(), 1);
        assert!(report.footer[0].bold);
        assert_eq!(
            report.footer[0].cells[5],
            Cell::Money(summary.grand_total)
        );
    }

    #[test]
    fn sales_rows_format_dates_as_dd_mm_yy() {
        let sales = sample_sales();
        let summary = SalesSummary::compute(&sales);
        let report = sales_report(&sales, &summary);
        assert_eq!(report.rows[0].cells[0], Cell::Text("14/03/26".to_string()));
    }

    #[test]
    fn empty_sales_report_is_header_plus_placeholder_only() {
        let report = sales_report(&[], &SalesSummary::compute(&[]));
        assert_eq!(report.rows.len(), 1);
        assert!(report.footer.is_empty());
        assert_eq!(
            report.rows[0].cells[0],
            Cell::Text("no sales data available".to_string())
        );

        let csv = report.to_csv().unwrap();
        let text = String::from_utf8(csv).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("no sales data available"));
    }

    #[test]
    fn expense_report_totals_come_from_the_ledger() {
        let ledger = sample_ledger();
        let report = expense_report(&ledger);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.footer.len(), 1);
        let totals = &report.footer[0].cells;
        assert_eq!(totals[6], Cell::Money(Money::from_major(1000)));
        assert_eq!(totals[7], Cell::Money(Money::from_major(500)));
        assert_eq!(totals[8], Cell::Money(Money::from_major(30)));
        assert_eq!(totals[9], Cell::Money(Money::from_major(470)));
    }

    #[test]
    fn csv_output_is_byte_identical_across_renders() {
        let sales = sample_sales();
        let summary = SalesSummary::compute(&sales);
        let report = sales_report(&sales, &summary);
        assert_eq!(report.to_csv().unwrap(), report.to_csv().unwrap());
    }

    #[test]
    fn csv_money_cells_render_two_decimals() {
        let report = expense_report(&sample_ledger());
        let text = String::from_utf8(report.to_csv().unwrap()).unwrap();
        assert!(text.contains("780.00"));
        assert!(text.contains("470.00"));
    }

    #[test]
    fn all_formats_render_the_same_report() {
        let sales = sample_sales();
        let summary = SalesSummary::compute(&sales);
        let report = sales_report(&sales, &summary);

        for format in [ReportFormat::Csv, ReportFormat::Xlsx, ReportFormat::Pdf] {
            let document = report.to_document("sales_report", format).unwrap();
            assert!(!document.bytes.is_empty());
            assert_eq!(
                document.filename,
                format!("sales_report.{}", format.extension())
            );
        }
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(ReportFormat::try_from("XLSX").unwrap(), ReportFormat::Xlsx);
        assert_eq!(ReportFormat::try_from("pdf").unwrap(), ReportFormat::Pdf);
        assert!(ReportFormat::try_from("doc").is_err());
    }

    #[test]
    fn mime_types_match_the_interface_contract() {
        assert_eq!(
            ReportFormat::Xlsx.mime(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(ReportFormat::Pdf.mime(), "application/pdf");
    }
}
