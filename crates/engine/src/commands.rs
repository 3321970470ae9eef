//! Command structs for engine operations.
//!
//! These types group parameters for write operations (record/update sale,
//! record/update expense), keeping call sites readable and avoiding long
//! argument lists.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Category, Money, PaymentMethod, PaymentStatus};

/// Record a new sale.
///
/// There is deliberately **no price field**: the line total is resolved
/// from the catalog inside the engine.
#[derive(Clone, Debug)]
pub struct NewSaleCmd {
    /// Acting (authenticated) user.
    pub user_id: String,
    /// Record the sale for this user instead of the actor (admin only).
    pub owner: Option<String>,
    pub category: Category,
    pub item: String,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_place: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl NewSaleCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        category: Category,
        item: impl Into<String>,
        quantity: i64,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            owner: None,
            category,
            item: item.into(),
            quantity,
            payment_method,
            payment_status,
            delivery_place: None,
            recorded_at,
        }
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn delivery_place(mut self, place: impl Into<String>) -> Self {
        self.delivery_place = Some(place.into());
        self
    }
}

/// Replace the full field set of an existing sale.
///
/// Updates run through the same validation and price resolution as create;
/// there is no partial patch path for sales.
#[derive(Clone, Debug)]
pub struct UpdateSaleCmd {
    pub user_id: String,
    pub sale_id: Uuid,
    pub category: Category,
    pub item: String,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_place: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

impl UpdateSaleCmd {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        sale_id: Uuid,
        category: Category,
        item: impl Into<String>,
        quantity: i64,
        payment_method: PaymentMethod,
        payment_status: PaymentStatus,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            sale_id,
            category,
            item: item.into(),
            quantity,
            payment_method,
            payment_status,
            delivery_place: None,
            recorded_at,
        }
    }

    #[must_use]
    pub fn delivery_place(mut self, place: impl Into<String>) -> Self {
        self.delivery_place = Some(place.into());
        self
    }
}

/// Record a new expense (admin only).
#[derive(Clone, Debug)]
pub struct NewExpenseCmd {
    pub user_id: String,
    pub date: Option<NaiveDate>,
    pub paid_to: Option<String>,
    pub charged_to: Option<String>,
    pub description: Option<String>,
    pub receipt_no: Option<String>,
    pub sponsor: Option<String>,
    pub amount_injected: Option<Money>,
    pub amount_paid: Option<Money>,
    pub bank_charges: Option<Money>,
}

impl NewExpenseCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date: Some(date),
            paid_to: None,
            charged_to: None,
            description: None,
            receipt_no: None,
            sponsor: None,
            amount_injected: None,
            amount_paid: None,
            bank_charges: None,
        }
    }

    #[must_use]
    pub fn paid_to(mut self, value: impl Into<String>) -> Self {
        self.paid_to = Some(value.into());
        self
    }

    #[must_use]
    pub fn charged_to(mut self, value: impl Into<String>) -> Self {
        self.charged_to = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    #[must_use]
    pub fn receipt_no(mut self, value: impl Into<String>) -> Self {
        self.receipt_no = Some(value.into());
        self
    }

    #[must_use]
    pub fn sponsor(mut self, value: impl Into<String>) -> Self {
        self.sponsor = Some(value.into());
        self
    }

    #[must_use]
    pub fn amount_injected(mut self, value: Money) -> Self {
        self.amount_injected = Some(value);
        self
    }

    #[must_use]
    pub fn amount_paid(mut self, value: Money) -> Self {
        self.amount_paid = Some(value);
        self
    }

    #[must_use]
    pub fn bank_charges(mut self, value: Money) -> Self {
        self.bank_charges = Some(value);
        self
    }
}

/// Replace the full field set of an existing expense (admin only).
#[derive(Clone, Debug)]
pub struct UpdateExpenseCmd {
    pub user_id: String,
    pub expense_id: Uuid,
    pub date: Option<NaiveDate>,
    pub paid_to: Option<String>,
    pub charged_to: Option<String>,
    pub description: Option<String>,
    pub receipt_no: Option<String>,
    pub sponsor: Option<String>,
    pub amount_injected: Option<Money>,
    pub amount_paid: Option<Money>,
    pub bank_charges: Option<Money>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, expense_id: Uuid, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            expense_id,
            date: Some(date),
            paid_to: None,
            charged_to: None,
            description: None,
            receipt_no: None,
            sponsor: None,
            amount_injected: None,
            amount_paid: None,
            bank_charges: None,
        }
    }

    #[must_use]
    pub fn paid_to(mut self, value: impl Into<String>) -> Self {
        self.paid_to = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    #[must_use]
    pub fn amount_injected(mut self, value: Money) -> Self {
        self.amount_injected = Some(value);
        self
    }

    #[must_use]
    pub fn amount_paid(mut self, value: Money) -> Self {
        self.amount_paid = Some(value);
        self
    }

    #[must_use]
    pub fn bank_charges(mut self, value: Money) -> Self {
        self.bank_charges = Some(value);
        self
    }
}
