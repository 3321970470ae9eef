//! Sale primitives.
//!
//! A `Sale` is one customer order line: a catalog item, a quantity, and the
//! server-resolved line total.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError, FieldErrors, Money};

/// How the customer paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    MPesa,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::MPesa => "M-Pesa",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Cash" => Ok(Self::Cash),
            "M-Pesa" | "MPesa" => Ok(Self::MPesa),
            other => Err(EngineError::Validation(FieldErrors::single(
                "payment_method",
                format!("unknown payment method: {other}"),
            ))),
        }
    }
}

/// Settlement state of the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Delivery,
    NotPaid,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Delivery => "Delivery",
            Self::NotPaid => "Not Paid",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Paid" => Ok(Self::Paid),
            "Delivery" => Ok(Self::Delivery),
            "Not Paid" | "NotPaid" => Ok(Self::NotPaid),
            other => Err(EngineError::Validation(FieldErrors::single(
                "payment_status",
                format!("unknown payment status: {other}"),
            ))),
        }
    }
}

/// One persisted sale record.
///
/// Invariants enforced at the write boundary (see `ops::sales`):
/// - `price` is the **line total** (`unit_price * quantity`), resolved from
///   the catalog, never the unit price and never a caller-supplied value.
/// - `delivery_place` is populated iff `payment_status == Delivery`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub owner: String,
    pub category: Category,
    pub item: String,
    pub quantity: i64,
    pub price: Money,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_place: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner: String,
    pub category: String,
    pub item: String,
    pub quantity: i64,
    pub price_cents: i64,
    pub payment_method: String,
    pub payment_status: String,
    pub delivery_place: Option<String>,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(sale: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(sale.id.to_string()),
            owner: ActiveValue::Set(sale.owner.clone()),
            category: ActiveValue::Set(sale.category.as_str().to_string()),
            item: ActiveValue::Set(sale.item.clone()),
            quantity: ActiveValue::Set(sale.quantity),
            price_cents: ActiveValue::Set(sale.price.cents()),
            payment_method: ActiveValue::Set(sale.payment_method.as_str().to_string()),
            payment_status: ActiveValue::Set(sale.payment_status.as_str().to_string()),
            delivery_place: ActiveValue::Set(sale.delivery_place.clone()),
            recorded_at: ActiveValue::Set(sale.recorded_at),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("sale not exists".to_string()))?,
            owner: model.owner,
            category: Category::try_from(model.category.as_str())?,
            item: model.item,
            quantity: model.quantity,
            price: Money::new(model.price_cents),
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            delivery_place: model.delivery_place,
            recorded_at: model.recorded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_enums_round_trip_their_storage_strings() {
        for method in [PaymentMethod::Cash, PaymentMethod::MPesa] {
            assert_eq!(PaymentMethod::try_from(method.as_str()).unwrap(), method);
        }
        for status in [
            PaymentStatus::Paid,
            PaymentStatus::Delivery,
            PaymentStatus::NotPaid,
        ] {
            assert_eq!(PaymentStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(PaymentMethod::try_from("Cheque").is_err());
        assert!(PaymentStatus::try_from("Pending").is_err());
    }
}
