use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Kes,
}

pub mod user {
    use super::*;

    /// Request body for creating an account.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterUser {
        pub username: String,
        pub password: String,
        pub confirm_password: String,
    }
}

pub mod catalog {
    use super::*;

    /// One purchasable item with its server-side unit price.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogItem {
        pub item: String,
        pub unit_price_cents: i64,
    }

    /// A category's portion of the price list.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogCategory {
        pub category: String,
        pub items: Vec<CatalogItem>,
    }

    /// The full price list shown on the order form.
    ///
    /// Prices are informational for display; the server re-resolves them
    /// on submission and never accepts a price from the client.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatalogResponse {
        pub currency: Currency,
        pub categories: Vec<CatalogCategory>,
    }
}

pub mod sale {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Category {
        Water,
        Gas,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash,
        MPesa,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentStatus {
        Paid,
        Delivery,
        NotPaid,
    }

    /// Request body for submitting an order.
    ///
    /// There is intentionally **no price field**: the total is resolved
    /// from the catalog on the server.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub category: Category,
        pub item: String,
        pub quantity: i64,
        pub payment_method: PaymentMethod,
        pub payment_status: PaymentStatus,
        pub delivery_place: Option<String>,
        /// Record the sale for this user (admin correction path).
        pub owner: Option<String>,
        /// RFC3339 timestamp; server time is used when absent.
        pub recorded_at: Option<DateTime<FixedOffset>>,
    }

    /// Request body for replacing a sale's full field set.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleUpdate {
        pub category: Category,
        pub item: String,
        pub quantity: i64,
        pub payment_method: PaymentMethod,
        pub payment_status: PaymentStatus,
        pub delivery_place: Option<String>,
        pub recorded_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleView {
        pub id: Uuid,
        pub owner: String,
        pub category: Category,
        pub item: String,
        pub quantity: i64,
        /// Line total in cents (unit price × quantity).
        pub price_cents: i64,
        pub payment_method: PaymentMethod,
        pub payment_status: PaymentStatus,
        pub delivery_place: Option<String>,
        pub recorded_at: DateTime<FixedOffset>,
    }

    /// Query string for sale listings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SalesQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        /// Admin only: list every user's sales.
        pub all: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClassTotalView {
        pub total_cents: i64,
        pub quantity: i64,
    }

    /// Grouped totals, mirrored from the engine's aggregation output.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalesSummaryView {
        pub record_count: usize,
        pub total_quantity: i64,
        pub grand_total_cents: i64,
        pub cash_total_cents: i64,
        pub mpesa_total_cents: i64,
        pub refill: ClassTotalView,
        pub delivery: ClassTotalView,
        pub gas_bottle: ClassTotalView,
        /// Explicit empty indicator ("no records"), not absence of output.
        pub no_records: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SalesResponse {
        pub sales: Vec<SaleView>,
        pub summary: SalesSummaryView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleCreated {
        pub id: Uuid,
    }

    /// Request body for bulk deletion by id set.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkDelete {
        pub ids: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BulkDeleteResponse {
        pub deleted: u64,
        pub warning: Option<String>,
    }
}

pub mod expense {
    use super::*;

    /// Request body for recording an expense (admin only).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub date: Option<NaiveDate>,
        pub paid_to: Option<String>,
        pub charged_to: Option<String>,
        pub description: Option<String>,
        pub receipt_no: Option<String>,
        pub sponsor: Option<String>,
        pub amount_injected_cents: Option<i64>,
        pub amount_paid_cents: Option<i64>,
        pub bank_charges_cents: Option<i64>,
    }

    /// Request body for replacing an expense's full field set.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub date: Option<NaiveDate>,
        pub paid_to: Option<String>,
        pub charged_to: Option<String>,
        pub description: Option<String>,
        pub receipt_no: Option<String>,
        pub sponsor: Option<String>,
        pub amount_injected_cents: Option<i64>,
        pub amount_paid_cents: Option<i64>,
        pub bank_charges_cents: Option<i64>,
    }

    /// One ledger line with its recomputed running balance.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        /// `DD/MM/YY`, or the raw stored text when it does not parse.
        pub date: String,
        pub paid_to: Option<String>,
        pub charged_to: Option<String>,
        pub description: Option<String>,
        pub receipt_no: Option<String>,
        pub sponsor: Option<String>,
        pub amount_injected_cents: i64,
        pub amount_paid_cents: i64,
        pub bank_charges_cents: i64,
        pub running_balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseTotalsView {
        pub injected_cents: i64,
        pub paid_cents: i64,
        pub charges_cents: i64,
        pub closing_balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        pub lines: Vec<ExpenseView>,
        pub totals: ExpenseTotalsView,
        pub no_records: bool,
    }

    /// Query string for the ledger listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }
}

pub mod report {
    use super::*;

    /// Query string for report downloads.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReportQuery {
        /// `csv`, `xlsx` (default) or `pdf`.
        pub format: Option<String>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }
}
