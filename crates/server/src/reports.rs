//! Report download endpoints.
//!
//! Documents are rendered completely in the engine and sent as one
//! attachment response with the format's MIME type; there is no partial
//! or incremental generation, so a failed export never streams rows.

use api_types::report::ReportQuery;
use axum::{
    Extension,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use engine::{DateRange, Document, ReportFormat, users};

use crate::{ServerError, server::ServerState};

fn parse_format(query: &ReportQuery) -> Result<ReportFormat, ServerError> {
    match query.format.as_deref() {
        None => Ok(ReportFormat::Xlsx),
        Some(raw) => Ok(ReportFormat::try_from(raw)?),
    }
}

fn attachment_response(document: Document) -> Response {
    (
        [
            (header::CONTENT_TYPE, document.format.mime().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", document.filename),
            ),
        ],
        document.bytes,
    )
        .into_response()
}

/// Downloads the sales report (admin only).
pub async fn sales_report(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ServerError> {
    let format = parse_format(&query)?;
    let range = DateRange::new(query.from, query.to)?;
    let document = state
        .engine
        .export_sales(&user.username, &range, format)
        .await?;
    Ok(attachment_response(document))
}

/// Downloads the expense ledger report (admin only).
pub async fn expenses_report(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ServerError> {
    let format = parse_format(&query)?;
    let range = DateRange::new(query.from, query.to)?;
    let document = state
        .engine
        .export_expenses(&user.username, &range, format)
        .await?;
    Ok(attachment_response(document))
}
