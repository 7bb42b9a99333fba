//! Initial schema migration.
//!
//! It creates the complete schema for Dividi:
//!
//! - `groups`: people sharing expenses, with the finalized flag
//! - `people`: group members
//! - `events`: recorded expenses
//! - `event_participants`: weighted shares of an event
//! - `settlements`: header of the finalized settlement of a group
//! - `settlement_transactions`: ordered transfers of a settlement
//! - `settlement_balances`: balance snapshot of a settlement

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Groups {
    Table,
    Id,
    Name,
    Finalized,
}

#[derive(Iden)]
enum People {
    Table,
    Id,
    GroupId,
    Name,
    NameNorm,
}

#[derive(Iden)]
enum Events {
    Table,
    Id,
    GroupId,
    Title,
    AmountMinor,
    PayerId,
}

#[derive(Iden)]
enum EventParticipants {
    Table,
    Id,
    EventId,
    PersonId,
    WeightMicros,
}

#[derive(Iden)]
enum Settlements {
    Table,
    GroupId,
    SettlementId,
    FinalizedAt,
}

#[derive(Iden)]
enum SettlementTransactions {
    Table,
    GroupId,
    Position,
    FromPersonId,
    FromName,
    ToPersonId,
    ToName,
    AmountMinor,
}

#[derive(Iden)]
enum SettlementBalances {
    Table,
    GroupId,
    PersonId,
    Name,
    PaidMinor,
    OwedMinor,
    NetMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Groups
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groups::Name).string().not_null())
                    .col(
                        ColumnDef::new(Groups::Finalized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. People
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(People::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(People::GroupId).integer().not_null())
                    .col(ColumnDef::new(People::Name).string().not_null())
                    .col(ColumnDef::new(People::NameNorm).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-people-group_id")
                            .from(People::Table, People::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-people-group_id-name_norm-unique")
                    .table(People::Table)
                    .col(People::GroupId)
                    .col(People::NameNorm)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Events
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::GroupId).integer().not_null())
                    .col(ColumnDef::new(Events::Title).string().not_null())
                    .col(ColumnDef::new(Events::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Events::PayerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-group_id")
                            .from(Events::Table, Events::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-events-payer_id")
                            .from(Events::Table, Events::PayerId)
                            .to(People::Table, People::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-events-group_id")
                    .table(Events::Table)
                    .col(Events::GroupId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Event participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(EventParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventParticipants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventParticipants::EventId).integer().not_null())
                    .col(ColumnDef::new(EventParticipants::PersonId).integer().not_null())
                    .col(
                        ColumnDef::new(EventParticipants::WeightMicros)
                            .big_integer()
                            .not_null()
                            .default(1_000_000),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_participants-event_id")
                            .from(EventParticipants::Table, EventParticipants::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-event_participants-person_id")
                            .from(EventParticipants::Table, EventParticipants::PersonId)
                            .to(People::Table, People::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-event_participants-event_id-person_id-unique")
                    .table(EventParticipants::Table)
                    .col(EventParticipants::EventId)
                    .col(EventParticipants::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Settlements
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Settlements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settlements::GroupId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Settlements::SettlementId).uuid().not_null())
                    .col(
                        ColumnDef::new(Settlements::FinalizedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlements-group_id")
                            .from(Settlements::Table, Settlements::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SettlementTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SettlementTransactions::GroupId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SettlementTransactions::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SettlementTransactions::FromPersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SettlementTransactions::FromName).string().not_null())
                    .col(
                        ColumnDef::new(SettlementTransactions::ToPersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SettlementTransactions::ToName).string().not_null())
                    .col(
                        ColumnDef::new(SettlementTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SettlementTransactions::GroupId)
                            .col(SettlementTransactions::Position),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlement_transactions-group_id")
                            .from(SettlementTransactions::Table, SettlementTransactions::GroupId)
                            .to(Settlements::Table, Settlements::GroupId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SettlementBalances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SettlementBalances::GroupId).integer().not_null())
                    .col(ColumnDef::new(SettlementBalances::PersonId).integer().not_null())
                    .col(ColumnDef::new(SettlementBalances::Name).string().not_null())
                    .col(ColumnDef::new(SettlementBalances::PaidMinor).big_integer().not_null())
                    .col(ColumnDef::new(SettlementBalances::OwedMinor).big_integer().not_null())
                    .col(ColumnDef::new(SettlementBalances::NetMinor).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(SettlementBalances::GroupId)
                            .col(SettlementBalances::PersonId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-settlement_balances-group_id")
                            .from(SettlementBalances::Table, SettlementBalances::GroupId)
                            .to(Settlements::Table, Settlements::GroupId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SettlementBalances::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SettlementTransactions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Settlements::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventParticipants::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(People::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groups::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
