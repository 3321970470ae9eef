use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    DateRange, Engine, EngineError, Money, NewExpenseCmd, UpdateExpenseCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for (username, is_admin) in [("alice", false), ("boss", true)] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password, is_admin) VALUES (?, ?, ?)",
            vec![username.into(), "password".into(), is_admin.into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
}

#[tokio::test]
async fn expenses_are_admin_only() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .record_expense(NewExpenseCmd::new("alice", day(10)).description("stock"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .expense_ledger("alice", &DateRange::unbounded())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn ledger_recomputes_running_balances_in_date_order() {
    let (engine, _db) = engine_with_db().await;

    // Insert out of order on purpose; the ledger sorts by date.
    engine
        .record_expense(
            NewExpenseCmd::new("boss", day(11))
                .description("transport")
                .amount_paid(Money::from_major(300))
                .bank_charges(Money::from_major(10)),
        )
        .await
        .unwrap();
    engine
        .record_expense(
            NewExpenseCmd::new("boss", day(10))
                .description("stock")
                .paid_to("Supplier")
                .amount_injected(Money::from_major(1000))
                .amount_paid(Money::from_major(200))
                .bank_charges(Money::from_major(20)),
        )
        .await
        .unwrap();

    let ledger = engine
        .expense_ledger("boss", &DateRange::unbounded())
        .await
        .unwrap();

    let balances: Vec<Money> = ledger
        .lines
        .iter()
        .map(|line| line.running_balance)
        .collect();
    assert_eq!(
        balances,
        vec![Money::from_major(780), Money::from_major(470)]
    );
    assert_eq!(ledger.totals.injected, Money::from_major(1000));
    assert_eq!(ledger.totals.paid, Money::from_major(500));
    assert_eq!(ledger.totals.charges, Money::from_major(30));
    assert_eq!(ledger.totals.closing_balance, Money::from_major(470));
}

#[tokio::test]
async fn editing_an_earlier_row_shifts_every_later_balance() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .record_expense(
            NewExpenseCmd::new("boss", day(10))
                .description("stock")
                .amount_injected(Money::from_major(1000)),
        )
        .await
        .unwrap();
    engine
        .record_expense(
            NewExpenseCmd::new("boss", day(11))
                .description("transport")
                .amount_paid(Money::from_major(300)),
        )
        .await
        .unwrap();

    engine
        .update_expense(
            UpdateExpenseCmd::new("boss", first, day(10))
                .description("stock")
                .amount_injected(Money::from_major(2000)),
        )
        .await
        .unwrap();

    let ledger = engine
        .expense_ledger("boss", &DateRange::unbounded())
        .await
        .unwrap();
    // The stored rows never held a balance; the recomputation reflects the
    // edit everywhere downstream.
    assert_eq!(ledger.lines[0].running_balance, Money::from_major(2000));
    assert_eq!(ledger.lines[1].running_balance, Money::from_major(1700));
}

#[tokio::test]
async fn create_requires_date_and_description() {
    let (engine, _db) = engine_with_db().await;

    let mut cmd = NewExpenseCmd::new("boss", day(10));
    cmd.date = None;
    let err = engine.record_expense(cmd).await.unwrap_err();
    match err {
        EngineError::Validation(errors) => {
            let fields: Vec<&str> = errors.fields().iter().map(|e| e.field).collect();
            assert!(fields.contains(&"date"));
            assert!(fields.contains(&"description"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .record_expense(
            NewExpenseCmd::new("boss", day(10))
                .description("stock")
                .amount_paid(Money::from_major(-5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn update_of_missing_expense_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .update_expense(
            UpdateExpenseCmd::new("boss", Uuid::new_v4(), day(10)).description("stock"),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("expense not exists".to_string())
    );
}

#[tokio::test]
async fn bulk_delete_counts_rows_and_warns_on_empty_set() {
    let (engine, _db) = engine_with_db().await;

    let id = engine
        .record_expense(NewExpenseCmd::new("boss", day(10)).description("stock"))
        .await
        .unwrap();

    let outcome = engine.delete_expenses("boss", &[]).await.unwrap();
    assert_eq!(outcome.deleted, 0);
    assert!(outcome.warning.is_some());

    let outcome = engine
        .delete_expenses("boss", &[id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.warning, None);

    let ledger = engine
        .expense_ledger("boss", &DateRange::unbounded())
        .await
        .unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn ledger_date_range_is_inclusive() {
    let (engine, _db) = engine_with_db().await;

    for d in [10, 15, 20] {
        engine
            .record_expense(
                NewExpenseCmd::new("boss", day(d))
                    .description("stock")
                    .amount_paid(Money::from_major(100)),
            )
            .await
            .unwrap();
    }

    let range = DateRange::new(Some(day(10)), Some(day(15))).unwrap();
    let ledger = engine.expense_ledger("boss", &range).await.unwrap();
    assert_eq!(ledger.lines.len(), 2);
    assert_eq!(ledger.totals.paid, Money::from_major(200));
    assert_eq!(ledger.totals.closing_balance, Money::from_major(-200));
}

#[tokio::test]
async fn empty_ledger_reports_zero_totals() {
    let (engine, _db) = engine_with_db().await;

    let ledger = engine
        .expense_ledger("boss", &DateRange::unbounded())
        .await
        .unwrap();
    assert!(ledger.is_empty());
    assert_eq!(ledger.totals.closing_balance, Money::ZERO);
}
