//! Sale operations: record, update, bulk delete, list, summarize.
//!
//! This is the single write boundary for sales. Every path resolves the
//! stored price from the injected catalog; the line total convention holds
//! because no call site does its own arithmetic.

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DateRange, EngineError, FieldErrors, NewSaleCmd, PaymentStatus, ResultEngine, Sale,
    SalesSummary, UpdateSaleCmd, pricing::resolve_price, sales,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

/// Which rows a listing covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaleScope {
    /// The caller's own sales.
    Own,
    /// Every user's sales (admin only).
    All,
}

/// Result of a bulk delete: how many rows went away, plus a warning when
/// the operation was a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: u64,
    pub warning: Option<String>,
}

struct SaleFields {
    item: String,
    delivery_place: Option<String>,
}

/// Shared create/update validation: item text and the
/// delivery-place-iff-delivery invariant. Quantity is left to the pricing
/// engine so the rejection reason is consistent everywhere.
fn validate_sale_fields(
    item: &str,
    payment_status: PaymentStatus,
    delivery_place: Option<&str>,
) -> ResultEngine<SaleFields> {
    let mut errors = FieldErrors::new();
    let item = normalize_required_text(item, "item", &mut errors);
    let delivery_place = normalize_optional_text(delivery_place);

    match (payment_status, &delivery_place) {
        (PaymentStatus::Delivery, None) => {
            errors.push(
                "delivery_place",
                "required when payment status is Delivery",
            );
        }
        (PaymentStatus::Paid | PaymentStatus::NotPaid, Some(_)) => {
            errors.push(
                "delivery_place",
                "must be empty unless payment status is Delivery",
            );
        }
        _ => {}
    }

    errors.into_result()?;
    Ok(SaleFields {
        item,
        delivery_place,
    })
}

impl Engine {
    /// Records a new sale and returns its id.
    ///
    /// The acting user becomes the owner unless an admin records the sale
    /// on behalf of another user (`cmd.owner`).
    pub async fn record_sale(&self, cmd: NewSaleCmd) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            let actor = self.require_user(&db_tx, &cmd.user_id).await?;
            let owner = match cmd.owner.as_deref() {
                Some(owner) if owner != actor.username => {
                    if !actor.is_admin {
                        return Err(EngineError::Forbidden(
                            "only an admin can record a sale for another user".to_string(),
                        ));
                    }
                    self.require_user(&db_tx, owner).await?.username
                }
                _ => actor.username,
            };

            let fields =
                validate_sale_fields(&cmd.item, cmd.payment_status, cmd.delivery_place.as_deref())?;
            let price = resolve_price(&self.catalog, cmd.category, &fields.item, cmd.quantity)?;

            let sale = Sale {
                id: Uuid::new_v4(),
                owner,
                category: cmd.category,
                item: fields.item,
                quantity: cmd.quantity,
                price,
                payment_method: cmd.payment_method,
                payment_status: cmd.payment_status,
                delivery_place: fields.delivery_place,
                recorded_at: cmd.recorded_at,
            };
            sales::ActiveModel::from(&sale).insert(&db_tx).await?;
            Ok(sale.id)
        })
    }

    /// Replaces the full field set of an existing sale.
    ///
    /// Runs the same validation as create and re-resolves the price, so an
    /// edit can never leave a stale or tampered total behind.
    pub async fn update_sale(&self, cmd: UpdateSaleCmd) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let actor = self.require_user(&db_tx, &cmd.user_id).await?;
            let model = sales::Entity::find_by_id(cmd.sale_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("sale not exists".to_string()))?;
            if model.owner != actor.username && !actor.is_admin {
                return Err(EngineError::KeyNotFound("sale not exists".to_string()));
            }

            let fields =
                validate_sale_fields(&cmd.item, cmd.payment_status, cmd.delivery_place.as_deref())?;
            let price = resolve_price(&self.catalog, cmd.category, &fields.item, cmd.quantity)?;

            let sale = Sale {
                id: cmd.sale_id,
                owner: model.owner,
                category: cmd.category,
                item: fields.item,
                quantity: cmd.quantity,
                price,
                payment_method: cmd.payment_method,
                payment_status: cmd.payment_status,
                delivery_place: fields.delivery_place,
                recorded_at: cmd.recorded_at,
            };
            sales::ActiveModel::from(&sale).update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes the given sale ids, skipping ids that do not exist or are
    /// not visible to the caller, and reports how many rows were removed.
    ///
    /// An empty id set is a no-op with a warning, not an error.
    pub async fn delete_sales(&self, user_id: &str, ids: &[Uuid]) -> ResultEngine<DeleteOutcome> {
        if ids.is_empty() {
            tracing::warn!("bulk sale delete called with no ids");
            return Ok(DeleteOutcome {
                deleted: 0,
                warning: Some("no ids given; nothing deleted".to_string()),
            });
        }

        with_tx!(self, |db_tx| {
            let actor = self.require_user(&db_tx, user_id).await?;
            let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();

            let mut delete = sales::Entity::delete_many()
                .filter(sales::Column::Id.is_in(id_strings));
            if !actor.is_admin {
                delete = delete.filter(sales::Column::Owner.eq(actor.username.clone()));
            }
            let result = delete.exec(&db_tx).await?;

            Ok(DeleteOutcome {
                deleted: result.rows_affected,
                warning: None,
            })
        })
    }

    /// Lists sales date-ascending, filtered by the inclusive date range.
    ///
    /// `SaleScope::All` requires admin.
    pub async fn list_sales(
        &self,
        user_id: &str,
        scope: SaleScope,
        range: &DateRange,
    ) -> ResultEngine<Vec<Sale>> {
        with_tx!(self, |db_tx| {
            let actor = match scope {
                SaleScope::Own => self.require_user(&db_tx, user_id).await?,
                SaleScope::All => self.require_admin(&db_tx, user_id).await?,
            };

            let mut query = sales::Entity::find()
                .order_by_asc(sales::Column::RecordedAt)
                .order_by_asc(sales::Column::Id);
            if scope == SaleScope::Own {
                query = query.filter(sales::Column::Owner.eq(actor.username.clone()));
            }
            let (start, end) = range.utc_bounds();
            if let Some(start) = start {
                query = query.filter(sales::Column::RecordedAt.gte(start));
            }
            if let Some(end) = end {
                query = query.filter(sales::Column::RecordedAt.lt(end));
            }

            let models: Vec<sales::Model> = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Sale::try_from(model)?);
            }
            Ok(out)
        })
    }

    /// Lists sales and computes their grouped totals in one call, so the
    /// dashboard and the exporters share identical numbers.
    pub async fn sales_with_summary(
        &self,
        user_id: &str,
        scope: SaleScope,
        range: &DateRange,
    ) -> ResultEngine<(Vec<Sale>, SalesSummary)> {
        let sales = self.list_sales(user_id, scope, range).await?;
        let summary = SalesSummary::compute(&sales);
        Ok((sales, summary))
    }
}
