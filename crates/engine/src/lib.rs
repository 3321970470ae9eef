//! Core engine for the dukani record-keeping application.
//!
//! The engine owns the computation layer: price resolution against the
//! injected catalog, the Sale/Expense data model, grouped aggregation, and
//! format-agnostic report export. The HTTP surface and the process wiring
//! live in the sibling crates.

pub use aggregate::{
    CLASS_RULES, ClassRule, ClassTotal, DateRange, ExpenseLedger, ExpenseLine, ExpenseTotals,
    GAS_BOTTLE_RULE, REFILL_RULE, SalesSummary,
};
pub use catalog::{CatalogConfig, Category, PriceCatalog};
pub use commands::{NewExpenseCmd, NewSaleCmd, UpdateExpenseCmd, UpdateSaleCmd};
pub use currency::Currency;
pub use error::{EngineError, FieldError, FieldErrors};
pub use expenses::{Expense, ExpenseDate};
pub use money::Money;
pub use ops::{DeleteOutcome, Engine, EngineBuilder, SaleScope};
pub use pricing::resolve_price;
pub use report::{Cell, Document, Report, ReportFormat, Row, expense_report, sales_report};
pub use sales::{PaymentMethod, PaymentStatus, Sale};

mod aggregate;
mod catalog;
mod commands;
mod currency;
mod error;
pub mod expenses;
mod money;
mod ops;
mod pricing;
mod report;
pub mod sales;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
