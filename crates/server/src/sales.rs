//! Sales API endpoints

use api_types::catalog::{CatalogCategory, CatalogItem, CatalogResponse};
use api_types::sale::{
    BulkDelete, BulkDeleteResponse, Category as ApiCategory, ClassTotalView,
    PaymentMethod as ApiPaymentMethod, PaymentStatus as ApiPaymentStatus, SaleCreated, SaleNew,
    SaleUpdate, SaleView, SalesQuery, SalesResponse, SalesSummaryView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{FixedOffset, Utc};
use engine::{
    ClassTotal, DateRange, NewSaleCmd, Sale, SaleScope, SalesSummary, UpdateSaleCmd, users,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn to_engine_category(category: ApiCategory) -> engine::Category {
    match category {
        ApiCategory::Water => engine::Category::Water,
        ApiCategory::Gas => engine::Category::Gas,
    }
}

fn from_engine_category(category: engine::Category) -> ApiCategory {
    match category {
        engine::Category::Water => ApiCategory::Water,
        engine::Category::Gas => ApiCategory::Gas,
    }
}

fn to_engine_method(method: ApiPaymentMethod) -> engine::PaymentMethod {
    match method {
        ApiPaymentMethod::Cash => engine::PaymentMethod::Cash,
        ApiPaymentMethod::MPesa => engine::PaymentMethod::MPesa,
    }
}

fn from_engine_method(method: engine::PaymentMethod) -> ApiPaymentMethod {
    match method {
        engine::PaymentMethod::Cash => ApiPaymentMethod::Cash,
        engine::PaymentMethod::MPesa => ApiPaymentMethod::MPesa,
    }
}

fn to_engine_status(status: ApiPaymentStatus) -> engine::PaymentStatus {
    match status {
        ApiPaymentStatus::Paid => engine::PaymentStatus::Paid,
        ApiPaymentStatus::Delivery => engine::PaymentStatus::Delivery,
        ApiPaymentStatus::NotPaid => engine::PaymentStatus::NotPaid,
    }
}

fn from_engine_status(status: engine::PaymentStatus) -> ApiPaymentStatus {
    match status {
        engine::PaymentStatus::Paid => ApiPaymentStatus::Paid,
        engine::PaymentStatus::Delivery => ApiPaymentStatus::Delivery,
        engine::PaymentStatus::NotPaid => ApiPaymentStatus::NotPaid,
    }
}

fn class_total_view(total: ClassTotal) -> ClassTotalView {
    ClassTotalView {
        total_cents: total.total.cents(),
        quantity: total.quantity,
    }
}

fn summary_view(summary: &SalesSummary) -> SalesSummaryView {
    SalesSummaryView {
        record_count: summary.record_count,
        total_quantity: summary.total_quantity,
        grand_total_cents: summary.grand_total.cents(),
        cash_total_cents: summary.cash_total.cents(),
        mpesa_total_cents: summary.mpesa_total.cents(),
        refill: class_total_view(summary.refill),
        delivery: class_total_view(summary.delivery),
        gas_bottle: class_total_view(summary.gas_bottle),
        no_records: summary.is_empty(),
    }
}

fn sale_view(sale: Sale, utc: FixedOffset) -> SaleView {
    SaleView {
        id: sale.id,
        owner: sale.owner,
        category: from_engine_category(sale.category),
        item: sale.item,
        quantity: sale.quantity,
        price_cents: sale.price.cents(),
        payment_method: from_engine_method(sale.payment_method),
        payment_status: from_engine_status(sale.payment_status),
        delivery_place: sale.delivery_place,
        recorded_at: sale.recorded_at.with_timezone(&utc),
    }
}

fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

/// Serves the price list for the order form.
pub async fn get_catalog(
    _: Extension<users::Model>,
    State(state): State<ServerState>,
) -> Json<CatalogResponse> {
    let catalog = state.engine.catalog();
    let categories = engine::Category::ALL
        .iter()
        .map(|&category| CatalogCategory {
            category: category.as_str().to_string(),
            items: catalog
                .items(category)
                .map(|(item, unit_price)| CatalogItem {
                    item: item.to_string(),
                    unit_price_cents: unit_price.cents(),
                })
                .collect(),
        })
        .collect();

    Json(CatalogResponse {
        currency: api_types::Currency::Kes,
        categories,
    })
}

/// Lists sales with their grouped totals.
pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<SalesQuery>,
) -> Result<Json<SalesResponse>, ServerError> {
    let range = DateRange::new(query.from, query.to)?;
    let scope = if query.all.unwrap_or(false) {
        SaleScope::All
    } else {
        SaleScope::Own
    };

    let (sales, summary) = state
        .engine
        .sales_with_summary(&user.username, scope, &range)
        .await?;

    let utc = utc_offset()?;
    Ok(Json(SalesResponse {
        sales: sales.into_iter().map(|sale| sale_view(sale, utc)).collect(),
        summary: summary_view(&summary),
    }))
}

/// Submits a new order.
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<(StatusCode, Json<SaleCreated>), ServerError> {
    let recorded_at = payload
        .recorded_at
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let mut cmd = NewSaleCmd::new(
        user.username.clone(),
        to_engine_category(payload.category),
        payload.item,
        payload.quantity,
        to_engine_method(payload.payment_method),
        to_engine_status(payload.payment_status),
        recorded_at,
    );
    cmd.owner = payload.owner;
    cmd.delivery_place = payload.delivery_place;

    let id = state.engine.record_sale(cmd).await?;
    Ok((StatusCode::CREATED, Json(SaleCreated { id })))
}

/// Replaces a sale's full field set.
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleUpdate>,
) -> Result<StatusCode, ServerError> {
    let mut cmd = UpdateSaleCmd::new(
        user.username.clone(),
        id,
        to_engine_category(payload.category),
        payload.item,
        payload.quantity,
        to_engine_method(payload.payment_method),
        to_engine_status(payload.payment_status),
        payload.recorded_at.with_timezone(&Utc),
    );
    cmd.delivery_place = payload.delivery_place;

    state.engine.update_sale(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a set of sales by id.
pub async fn bulk_delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BulkDelete>,
) -> Result<Json<BulkDeleteResponse>, ServerError> {
    let outcome = state
        .engine
        .delete_sales(&user.username, &payload.ids)
        .await?;

    Ok(Json(BulkDeleteResponse {
        deleted: outcome.deleted,
        warning: outcome.warning,
    }))
}
