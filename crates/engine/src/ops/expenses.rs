//! Expense operations (admin only): record, update, bulk delete, ledger.

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    DateRange, EngineError, Expense, ExpenseDate, ExpenseLedger, FieldErrors, Money,
    NewExpenseCmd, ResultEngine, UpdateExpenseCmd, aggregate::filter_expenses, expenses,
};

use super::{DeleteOutcome, Engine, normalize_optional_text, with_tx};

struct ExpenseFields {
    date: ExpenseDate,
    paid_to: Option<String>,
    charged_to: Option<String>,
    description: Option<String>,
    receipt_no: Option<String>,
    sponsor: Option<String>,
    amount_injected: Option<Money>,
    amount_paid: Option<Money>,
    bank_charges: Option<Money>,
}

fn check_amount(
    value: Option<Money>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<Money> {
    if let Some(amount) = value
        && amount.is_negative()
    {
        errors.push(field, "must not be negative");
    }
    value
}

/// Shared create/update validation. A date and a description are mandatory
/// for new rows; the amounts are optional and must be non-negative.
fn validate_expense_fields(
    date: Option<chrono::NaiveDate>,
    paid_to: Option<&str>,
    charged_to: Option<&str>,
    description: Option<&str>,
    receipt_no: Option<&str>,
    sponsor: Option<&str>,
    amount_injected: Option<Money>,
    amount_paid: Option<Money>,
    bank_charges: Option<Money>,
) -> ResultEngine<ExpenseFields> {
    let mut errors = FieldErrors::new();

    let date = match date {
        Some(date) => ExpenseDate::Known(date),
        None => {
            errors.push("date", "required");
            ExpenseDate::Missing
        }
    };
    let description = normalize_optional_text(description);
    if description.is_none() {
        errors.push("description", "must not be empty");
    }

    let amount_injected = check_amount(amount_injected, "amount_injected", &mut errors);
    let amount_paid = check_amount(amount_paid, "amount_paid", &mut errors);
    let bank_charges = check_amount(bank_charges, "bank_charges", &mut errors);

    errors.into_result()?;
    Ok(ExpenseFields {
        date,
        paid_to: normalize_optional_text(paid_to),
        charged_to: normalize_optional_text(charged_to),
        description,
        receipt_no: normalize_optional_text(receipt_no),
        sponsor: normalize_optional_text(sponsor),
        amount_injected,
        amount_paid,
        bank_charges,
    })
}

impl Engine {
    /// Records a new expense and returns its id. Admin only.
    pub async fn record_expense(&self, cmd: NewExpenseCmd) -> ResultEngine<Uuid> {
        with_tx!(self, |db_tx| {
            let admin = self.require_admin(&db_tx, &cmd.user_id).await?;

            let fields = validate_expense_fields(
                cmd.date,
                cmd.paid_to.as_deref(),
                cmd.charged_to.as_deref(),
                cmd.description.as_deref(),
                cmd.receipt_no.as_deref(),
                cmd.sponsor.as_deref(),
                cmd.amount_injected,
                cmd.amount_paid,
                cmd.bank_charges,
            )?;

            let expense = Expense {
                id: Uuid::new_v4(),
                owner: admin.username,
                date: fields.date,
                paid_to: fields.paid_to,
                charged_to: fields.charged_to,
                description: fields.description,
                receipt_no: fields.receipt_no,
                sponsor: fields.sponsor,
                amount_injected: fields.amount_injected,
                amount_paid: fields.amount_paid,
                bank_charges: fields.bank_charges,
            };
            expenses::ActiveModel::from(&expense).insert(&db_tx).await?;
            Ok(expense.id)
        })
    }

    /// Replaces the full field set of an existing expense. Admin only.
    pub async fn update_expense(&self, cmd: UpdateExpenseCmd) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, &cmd.user_id).await?;
            let model = expenses::Entity::find_by_id(cmd.expense_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;

            let fields = validate_expense_fields(
                cmd.date,
                cmd.paid_to.as_deref(),
                cmd.charged_to.as_deref(),
                cmd.description.as_deref(),
                cmd.receipt_no.as_deref(),
                cmd.sponsor.as_deref(),
                cmd.amount_injected,
                cmd.amount_paid,
                cmd.bank_charges,
            )?;

            let expense = Expense {
                id: cmd.expense_id,
                owner: model.owner,
                date: fields.date,
                paid_to: fields.paid_to,
                charged_to: fields.charged_to,
                description: fields.description,
                receipt_no: fields.receipt_no,
                sponsor: fields.sponsor,
                amount_injected: fields.amount_injected,
                amount_paid: fields.amount_paid,
                bank_charges: fields.bank_charges,
            };
            expenses::ActiveModel::from(&expense).update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes the given expense ids. Admin only; an empty id set is a
    /// no-op with a warning.
    pub async fn delete_expenses(
        &self,
        user_id: &str,
        ids: &[Uuid],
    ) -> ResultEngine<DeleteOutcome> {
        if ids.is_empty() {
            tracing::warn!("bulk expense delete called with no ids");
            return Ok(DeleteOutcome {
                deleted: 0,
                warning: Some("no ids given; nothing deleted".to_string()),
            });
        }

        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;
            let id_strings: Vec<String> = ids.iter().map(Uuid::to_string).collect();
            let result = expenses::Entity::delete_many()
                .filter(expenses::Column::Id.is_in(id_strings))
                .exec(&db_tx)
                .await?;
            Ok(DeleteOutcome {
                deleted: result.rows_affected,
                warning: None,
            })
        })
    }

    /// Loads the expense ledger with running balances recomputed from the
    /// date-ordered rows. Admin only.
    ///
    /// Balances are derived fresh on every call; stored data is never
    /// trusted for them.
    pub async fn expense_ledger(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> ResultEngine<ExpenseLedger> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, user_id).await?;

            let models: Vec<expenses::Model> = expenses::Entity::find().all(&db_tx).await?;
            let mut rows = Vec::with_capacity(models.len());
            for model in models {
                rows.push(Expense::try_from(model)?);
            }
            let rows = filter_expenses(rows, range);
            Ok(ExpenseLedger::compute(rows))
        })
    }
}
