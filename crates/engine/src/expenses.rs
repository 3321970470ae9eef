//! Expense primitives.
//!
//! An `Expense` is an admin-entered ledger row: money injected into the
//! business, money paid out, and bank charges. The running balance over the
//! date-ordered sequence is **derived**: it is recomputed on every read
//! (see `aggregate::ExpenseLedger`) and never persisted, since editing an
//! earlier row would invalidate every stored value after it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money};

/// Canonical storage format for expense dates.
const STORAGE_FORMAT: &str = "%Y-%m-%d";
/// Display format used by reports.
const REPORT_FORMAT: &str = "%d/%m/%y";

/// An expense date as found in storage.
///
/// Rows imported from the predecessor system can carry text the date parser
/// does not understand, or no date at all. Those rows still aggregate and
/// export; the raw text passes through unchanged rather than failing the
/// whole operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseDate {
    Known(NaiveDate),
    Unparsed(String),
    Missing,
}

impl ExpenseDate {
    /// Parses a stored date column value.
    ///
    /// Accepts the canonical `YYYY-MM-DD` plus the `DD/MM/YYYY` and
    /// `DD/MM/YY` forms the legacy data used. Anything else is carried as
    /// [`ExpenseDate::Unparsed`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        for format in [STORAGE_FORMAT, "%d/%m/%Y", REPORT_FORMAT] {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Self::Known(date);
            }
        }
        Self::Unparsed(trimmed.to_string())
    }

    /// The parsed day, when there is one.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(*date),
            Self::Unparsed(_) | Self::Missing => None,
        }
    }

    /// Report label: `DD/MM/YY` for known dates, the raw text for unparsed
    /// ones, empty for missing.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Known(date) => date.format(REPORT_FORMAT).to_string(),
            Self::Unparsed(raw) => raw.clone(),
            Self::Missing => String::new(),
        }
    }

    /// The value written back to the date column.
    #[must_use]
    pub fn storage(&self) -> Option<String> {
        match self {
            Self::Known(date) => Some(date.format(STORAGE_FORMAT).to_string()),
            Self::Unparsed(raw) => Some(raw.clone()),
            Self::Missing => None,
        }
    }
}

impl From<NaiveDate> for ExpenseDate {
    fn from(date: NaiveDate) -> Self {
        Self::Known(date)
    }
}

/// One persisted expense record. Admin-only.
///
/// The optional amounts are treated as zero by aggregation; legacy rows
/// frequently left them blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub owner: String,
    pub date: ExpenseDate,
    pub paid_to: Option<String>,
    pub charged_to: Option<String>,
    pub description: Option<String>,
    pub receipt_no: Option<String>,
    pub sponsor: Option<String>,
    pub amount_injected: Option<Money>,
    pub amount_paid: Option<Money>,
    pub bank_charges: Option<Money>,
}

impl Expense {
    /// Net effect of this row on the running balance
    /// (`injected - paid - charges`, blanks as zero).
    #[must_use]
    pub fn net(&self) -> Money {
        self.amount_injected.unwrap_or(Money::ZERO)
            - self.amount_paid.unwrap_or(Money::ZERO)
            - self.bank_charges.unwrap_or(Money::ZERO)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub date: Option<String>,
    pub paid_to: Option<String>,
    pub charged_to: Option<String>,
    pub description: Option<String>,
    pub receipt_no: Option<String>,
    pub sponsor: Option<String>,
    pub amount_injected_cents: Option<i64>,
    pub amount_paid_cents: Option<i64>,
    pub bank_charges_cents: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            owner: ActiveValue::Set(expense.owner.clone()),
            date: ActiveValue::Set(expense.date.storage()),
            paid_to: ActiveValue::Set(expense.paid_to.clone()),
            charged_to: ActiveValue::Set(expense.charged_to.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            receipt_no: ActiveValue::Set(expense.receipt_no.clone()),
            sponsor: ActiveValue::Set(expense.sponsor.clone()),
            amount_injected_cents: ActiveValue::Set(expense.amount_injected.map(Money::cents)),
            amount_paid_cents: ActiveValue::Set(expense.amount_paid.map(Money::cents)),
            bank_charges_cents: ActiveValue::Set(expense.bank_charges.map(Money::cents)),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            owner: model.owner,
            date: ExpenseDate::parse(model.date.as_deref()),
            paid_to: model.paid_to,
            charged_to: model.charged_to,
            description: model.description,
            receipt_no: model.receipt_no,
            sponsor: model.sponsor,
            amount_injected: model.amount_injected_cents.map(Money::new),
            amount_paid: model.amount_paid_cents.map(Money::new),
            bank_charges: model.bank_charges_cents.map(Money::new),
        })
    }
}
