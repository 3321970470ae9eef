//! Grouped totals and running balances over persisted records.
//!
//! Everything here is a pure function over already-loaded records, so the
//! dashboard handlers and every export format consume the **same** numbers.
//! The predecessor system computed groupings separately per export function
//! and the results drifted; the single rule table below closes that off.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Expense, FieldErrors, Money, PaymentMethod, PaymentStatus, ResultEngine, Sale,
};

/// Inclusive date-range filter `[from, to]`, applied before aggregation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a range, rejecting `from > to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ResultEngine<Self> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(EngineError::Validation(FieldErrors::single(
                "to",
                "must not be before from",
            )));
        }
        Ok(Self { from, to })
    }

    /// The unfiltered range.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a day falls inside the range (both ends inclusive).
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        if let Some(from) = self.from
            && day < from
        {
            return false;
        }
        if let Some(to) = self.to
            && day > to
        {
            return false;
        }
        true
    }

    /// UTC timestamp bounds for SQL filters over timestamp columns:
    /// `[from 00:00, to + 1 day 00:00)`.
    #[must_use]
    pub fn utc_bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let start = self
            .from
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        let end = self
            .to
            .and_then(|day| day.succ_opt())
            .map(|day| day.and_time(NaiveTime::MIN).and_utc());
        (start, end)
    }
}

/// One item-classification rule: case-insensitive substring markers over
/// the item name.
#[derive(Clone, Copy, Debug)]
pub struct ClassRule {
    pub name: &'static str,
    markers: &'static [&'static str],
}

impl ClassRule {
    #[must_use]
    pub fn matches(&self, item: &str) -> bool {
        let item = item.to_lowercase();
        self.markers.iter().any(|marker| item.contains(marker))
    }
}

/// Items that refill an existing container.
pub const REFILL_RULE: ClassRule = ClassRule {
    name: "refill",
    markers: &["refill"],
};

/// Gas items and new bottles/cylinders.
pub const GAS_BOTTLE_RULE: ClassRule = ClassRule {
    name: "gas_bottle",
    markers: &["gas", "bottle"],
};

/// The one rule table shared by summaries and every export format.
pub const CLASS_RULES: &[&ClassRule] = &[&REFILL_RULE, &GAS_BOTTLE_RULE];

/// Money and unit totals for one record class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTotal {
    pub total: Money,
    pub quantity: i64,
}

impl ClassTotal {
    fn add(&mut self, sale: &Sale) {
        self.total += sale.price;
        self.quantity += sale.quantity;
    }
}

/// Grouped totals over a set of sales.
///
/// An empty input produces a summary of zeros with `record_count == 0`;
/// callers surface "no records" explicitly instead of omitting output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub record_count: usize,
    pub total_quantity: i64,
    pub grand_total: Money,
    pub cash_total: Money,
    pub mpesa_total: Money,
    pub refill: ClassTotal,
    pub delivery: ClassTotal,
    pub gas_bottle: ClassTotal,
}

impl SalesSummary {
    #[must_use]
    pub fn compute(sales: &[Sale]) -> Self {
        let mut summary = Self::default();
        for sale in sales {
            summary.record_count += 1;
            summary.total_quantity += sale.quantity;
            summary.grand_total += sale.price;
            match sale.payment_method {
                PaymentMethod::Cash => summary.cash_total += sale.price,
                PaymentMethod::MPesa => summary.mpesa_total += sale.price,
            }
            if REFILL_RULE.matches(&sale.item) {
                summary.refill.add(sale);
            }
            if GAS_BOTTLE_RULE.matches(&sale.item) {
                summary.gas_bottle.add(sale);
            }
            if sale.payment_status == PaymentStatus::Delivery {
                summary.delivery.add(sale);
            }
        }
        summary
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// One expense with its recomputed running balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseLine {
    pub expense: Expense,
    pub running_balance: Money,
}

/// Column totals for the expense ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTotals {
    pub injected: Money,
    pub paid: Money,
    pub charges: Money,
    pub closing_balance: Money,
}

/// The full expense ledger: date-ordered rows with prefix-sum balances.
///
/// Balances are derived here on every call; storage is never trusted for
/// them, because an edit to an earlier row changes every balance after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseLedger {
    pub lines: Vec<ExpenseLine>,
    pub totals: ExpenseTotals,
}

impl ExpenseLedger {
    /// Sorts by (date, id), rows without a parseable date first, and
    /// folds `balance_i = balance_{i-1} + injected_i - paid_i - charges_i`.
    #[must_use]
    pub fn compute(mut expenses: Vec<Expense>) -> Self {
        expenses.sort_by(|a, b| (a.date.day(), a.id).cmp(&(b.date.day(), b.id)));

        let mut lines = Vec::with_capacity(expenses.len());
        let mut totals = ExpenseTotals::default();
        let mut balance = Money::ZERO;
        for expense in expenses {
            totals.injected += expense.amount_injected.unwrap_or(Money::ZERO);
            totals.paid += expense.amount_paid.unwrap_or(Money::ZERO);
            totals.charges += expense.bank_charges.unwrap_or(Money::ZERO);
            balance += expense.net();
            lines.push(ExpenseLine {
                expense,
                running_balance: balance,
            });
        }
        totals.closing_balance = balance;

        Self { lines, totals }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Applies a date-range filter to expenses before aggregation.
///
/// Rows without a parseable date only survive an unbounded range, since
/// their membership in a bounded window cannot be established.
#[must_use]
pub fn filter_expenses(expenses: Vec<Expense>, range: &DateRange) -> Vec<Expense> {
    if range.is_unbounded() {
        return expenses;
    }
    expenses
        .into_iter()
        .filter(|expense| expense.date.day().is_some_and(|day| range.contains(day)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::{Category, ExpenseDate};

    fn sale(
        item: &str,
        quantity: i64,
        price: Money,
        method: PaymentMethod,
        status: PaymentStatus,
    ) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            owner: "alice".to_string(),
            category: Category::Water,
            item: item.to_string(),
            quantity,
            price,
            payment_method: method,
            payment_status: status,
            delivery_place: (status == PaymentStatus::Delivery).then(|| "Umoja".to_string()),
            recorded_at: Utc::now(),
        }
    }

    fn expense(day: Option<(i32, u32, u32)>, injected: i64, paid: i64, charges: i64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            owner: "admin".to_string(),
            date: match day {
                Some((y, m, d)) => ExpenseDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
                None => ExpenseDate::Missing,
            },
            paid_to: None,
            charged_to: None,
            description: Some("supplies".to_string()),
            receipt_no: None,
            sponsor: None,
            amount_injected: (injected != 0).then(|| Money::from_major(injected)),
            amount_paid: (paid != 0).then(|| Money::from_major(paid)),
            bank_charges: (charges != 0).then(|| Money::from_major(charges)),
        }
    }

    #[test]
    fn payment_method_totals_partition_the_grand_total() {
        let sales = vec![
            sale(
                "20L (Refill)",
                3,
                Money::from_major(750),
                PaymentMethod::Cash,
                PaymentStatus::Paid,
            ),
            sale(
                "6KG Gas (Refill)",
                1,
                Money::from_major(1200),
                PaymentMethod::MPesa,
                PaymentStatus::Delivery,
            ),
            sale(
                "20L (New Bottle)",
                2,
                Money::from_major(1000),
                PaymentMethod::MPesa,
                PaymentStatus::NotPaid,
            ),
        ];
        let summary = SalesSummary::compute(&sales);

        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_quantity, 6);
        assert_eq!(summary.grand_total, Money::from_major(2950));
        assert_eq!(
            summary.cash_total + summary.mpesa_total,
            summary.grand_total
        );
    }

    #[test]
    fn class_rules_are_case_insensitive_substrings() {
        assert!(REFILL_RULE.matches("20L (Refill)"));
        assert!(REFILL_RULE.matches("20L (REFILL)"));
        assert!(!REFILL_RULE.matches("20L (New Bottle)"));
        assert!(GAS_BOTTLE_RULE.matches("6KG Gas (Refill)"));
        assert!(GAS_BOTTLE_RULE.matches("20L (New Bottle)"));
        assert!(!GAS_BOTTLE_RULE.matches("20L (Refill)"));
        assert_eq!(CLASS_RULES.len(), 2);
    }

    #[test]
    fn class_totals_track_both_money_and_quantity() {
        let sales = vec![
            sale(
                "20L (Refill)",
                3,
                Money::from_major(750),
                PaymentMethod::Cash,
                PaymentStatus::Paid,
            ),
            sale(
                "6KG Gas (Refill)",
                1,
                Money::from_major(1200),
                PaymentMethod::MPesa,
                PaymentStatus::Delivery,
            ),
        ];
        let summary = SalesSummary::compute(&sales);

        assert_eq!(summary.refill.total, Money::from_major(1950));
        assert_eq!(summary.refill.quantity, 4);
        assert_eq!(summary.gas_bottle.total, Money::from_major(1200));
        assert_eq!(summary.gas_bottle.quantity, 1);
        assert_eq!(summary.delivery.total, Money::from_major(1200));
        assert_eq!(summary.delivery.quantity, 1);
    }

    #[test]
    fn empty_sales_give_zero_totals_with_explicit_indicator() {
        let summary = SalesSummary::compute(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.grand_total, Money::ZERO);
        assert_eq!(summary.cash_total, Money::ZERO);
        assert_eq!(summary.refill, ClassTotal::default());
    }

    #[test]
    fn running_balance_is_prefix_sum_exact() {
        let ledger = ExpenseLedger::compute(vec![
            expense(Some((2026, 1, 10)), 1000, 200, 20),
            expense(Some((2026, 1, 11)), 0, 300, 10),
        ]);

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

    #[test]
    fn ledger_sorts_by_date_before_folding() {
        let ledger = ExpenseLedger::compute(vec![
            expense(Some((2026, 1, 11)), 0, 300, 10),
            expense(Some((2026, 1, 10)), 1000, 200, 20),
        ]);
        assert_eq!(
            ledger.lines[0].expense.date.day(),
            NaiveDate::from_ymd_opt(2026, 1, 10)
        );
        assert_eq!(ledger.lines[1].running_balance, Money::from_major(470));
    }

    #[test]
    fn missing_amounts_count_as_zero_and_undated_rows_sort_first() {
        let ledger = ExpenseLedger::compute(vec![
            expense(Some((2026, 1, 10)), 500, 0, 0),
            expense(None, 0, 0, 0),
        ]);
        assert_eq!(ledger.lines[0].expense.date.day(), None);
        assert_eq!(ledger.lines[0].running_balance, Money::ZERO);
        assert_eq!(ledger.lines[1].running_balance, Money::from_major(500));
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 1, 10),
            NaiveDate::from_ymd_opt(2026, 1, 20),
        )
        .unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2026, 1, 21).unwrap()));

        let (start, end) = range.utc_bounds();
        assert_eq!(start.unwrap().to_rfc3339(), "2026-01-10T00:00:00+00:00");
        assert_eq!(end.unwrap().to_rfc3339(), "2026-01-21T00:00:00+00:00");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 2, 1),
            NaiveDate::from_ymd_opt(2026, 1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn bounded_filter_drops_undated_expenses() {
        let rows = vec![expense(Some((2026, 1, 10)), 100, 0, 0), expense(None, 50, 0, 0)];
        let range = DateRange::new(NaiveDate::from_ymd_opt(2026, 1, 1), None).unwrap();
        let kept = filter_expenses(rows.clone(), &range);
        assert_eq!(kept.len(), 1);

        let kept = filter_expenses(rows, &DateRange::unbounded());
        assert_eq!(kept.len(), 2);
    }
}
