//! Expense API endpoints (admin only, enforced by the engine operations)

use api_types::expense::{
    ExpenseCreated, ExpenseNew, ExpenseUpdate, ExpenseView, ExpenseTotalsView, LedgerQuery,
    LedgerResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    DateRange, ExpenseLedger, Money, NewExpenseCmd, UpdateExpenseCmd, users,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn ledger_response(ledger: ExpenseLedger) -> LedgerResponse {
    let no_records = ledger.is_empty();
    LedgerResponse {
        totals: ExpenseTotalsView {
            injected_cents: ledger.totals.injected.cents(),
            paid_cents: ledger.totals.paid.cents(),
            charges_cents: ledger.totals.charges.cents(),
            closing_balance_cents: ledger.totals.closing_balance.cents(),
        },
        lines: ledger
            .lines
            .into_iter()
            .map(|line| {
                let expense = line.expense;
                ExpenseView {
                    id: expense.id,
                    date: expense.date.label(),
                    paid_to: expense.paid_to,
                    charged_to: expense.charged_to,
                    description: expense.description,
                    receipt_no: expense.receipt_no,
                    sponsor: expense.sponsor,
                    amount_injected_cents: expense
                        .amount_injected
                        .unwrap_or(Money::ZERO)
                        .cents(),
                    amount_paid_cents: expense.amount_paid.unwrap_or(Money::ZERO).cents(),
                    bank_charges_cents: expense.bank_charges.unwrap_or(Money::ZERO).cents(),
                    running_balance_cents: line.running_balance.cents(),
                }
            })
            .collect(),
        no_records,
    }
}

/// Serves the expense ledger with freshly recomputed running balances.
pub async fn ledger(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let range = DateRange::new(query.from, query.to)?;
    let ledger = state.engine.expense_ledger(&user.username, &range).await?;
    Ok(Json(ledger_response(ledger)))
}

/// Records a new expense.
pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let cmd = NewExpenseCmd {
        user_id: user.username.clone(),
        date: payload.date,
        paid_to: payload.paid_to,
        charged_to: payload.charged_to,
        description: payload.description,
        receipt_no: payload.receipt_no,
        sponsor: payload.sponsor,
        amount_injected: payload.amount_injected_cents.map(Money::new),
        amount_paid: payload.amount_paid_cents.map(Money::new),
        bank_charges: payload.bank_charges_cents.map(Money::new),
    };

    let id = state.engine.record_expense(cmd).await?;
    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

/// Replaces an expense's full field set.
pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<StatusCode, ServerError> {
    let cmd = UpdateExpenseCmd {
        user_id: user.username.clone(),
        expense_id: id,
        date: payload.date,
        paid_to: payload.paid_to,
        charged_to: payload.charged_to,
        description: payload.description,
        receipt_no: payload.receipt_no,
        sponsor: payload.sponsor,
        amount_injected: payload.amount_injected_cents.map(Money::new),
        amount_paid: payload.amount_paid_cents.map(Money::new),
        bank_charges: payload.bank_charges_cents.map(Money::new),
    };

    state.engine.update_expense(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a set of expenses by id.
pub async fn bulk_delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<api_types::sale::BulkDelete>,
) -> Result<Json<api_types::sale::BulkDeleteResponse>, ServerError> {
    let outcome = state
        .engine
        .delete_expenses(&user.username, &payload.ids)
        .await?;

    Ok(Json(api_types::sale::BulkDeleteResponse {
        deleted: outcome.deleted,
        warning: outcome.warning,
    }))
}
