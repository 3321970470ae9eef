//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for dukani:
//!
//! - `users`: authentication and the admin capability flag
//! - `sales`: customer orders with the server-resolved line total
//! - `expenses`: admin ledger rows (running balance is derived, not stored)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    IsAdmin,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    Owner,
    Category,
    Item,
    Quantity,
    PriceCents,
    PaymentMethod,
    PaymentStatus,
    DeliveryPlace,
    RecordedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Owner,
    Date,
    PaidTo,
    ChargedTo,
    Description,
    ReceiptNo,
    Sponsor,
    AmountInjectedCents,
    AmountPaidCents,
    BankChargesCents,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::Owner).string().not_null())
                    .col(ColumnDef::new(Sales::Category).string().not_null())
                    .col(ColumnDef::new(Sales::Item).string().not_null())
                    .col(ColumnDef::new(Sales::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Sales::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Sales::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Sales::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Sales::DeliveryPlace).string())
                    .col(ColumnDef::new(Sales::RecordedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-owner")
                            .from(Sales::Table, Sales::Owner)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-owner")
                    .table(Sales::Table)
                    .col(Sales::Owner)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-recorded_at")
                    .table(Sales::Table)
                    .col(Sales::RecordedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Owner).string().not_null())
                    // Kept as text so legacy rows with malformed dates
                    // survive import; parsing happens at read time.
                    .col(ColumnDef::new(Expenses::Date).string())
                    .col(ColumnDef::new(Expenses::PaidTo).string())
                    .col(ColumnDef::new(Expenses::ChargedTo).string())
                    .col(ColumnDef::new(Expenses::Description).text())
                    .col(ColumnDef::new(Expenses::ReceiptNo).string())
                    .col(ColumnDef::new(Expenses::Sponsor).string())
                    .col(ColumnDef::new(Expenses::AmountInjectedCents).big_integer())
                    .col(ColumnDef::new(Expenses::AmountPaidCents).big_integer())
                    .col(ColumnDef::new(Expenses::BankChargesCents).big_integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-owner")
                            .from(Expenses::Table, Expenses::Owner)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-date")
                    .table(Expenses::Table)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
