//! General journals and their lines.

use sea_orm_migration::prelude::*;

use super::amount_column;
use super::m20260301_000001_chart_of_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GeneralJournals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GeneralJournals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(GeneralJournals::TransactionDate).date().not_null())
                    .col(ColumnDef::new(GeneralJournals::Reference).string_len(100).unique_key())
                    .col(ColumnDef::new(GeneralJournals::Description).text())
                    .col(ColumnDef::new(GeneralJournals::CreatedBy).uuid())
                    .col(ColumnDef::new(GeneralJournals::ReversalOf).uuid())
                    .col(
                        ColumnDef::new(GeneralJournals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_general_journals_reversal_of")
                            .from(GeneralJournals::Table, GeneralJournals::ReversalOf)
                            .to(GeneralJournals::Table, GeneralJournals::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_general_journals_date")
                    .table(GeneralJournals::Table)
                    .col(GeneralJournals::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // A journal is reversed at most once; NULLs do not collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_general_journals_reversal_of")
                    .table(GeneralJournals::Table)
                    .col(GeneralJournals::ReversalOf)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntryLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntryLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntryLines::JournalId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntryLines::LineNo).integer().not_null())
                    .col(ColumnDef::new(JournalEntryLines::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntryLines::SubAccountId).uuid())
                    .col(
                        amount_column(manager, JournalEntryLines::Debit)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        amount_column(manager, JournalEntryLines::Credit)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(JournalEntryLines::Description).text())
                    .col(
                        ColumnDef::new(JournalEntryLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_journal")
                            .from(JournalEntryLines::Table, JournalEntryLines::JournalId)
                            .to(GeneralJournals::Table, GeneralJournals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_account")
                            .from(JournalEntryLines::Table, JournalEntryLines::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entry_lines_sub_account")
                            .from(JournalEntryLines::Table, JournalEntryLines::SubAccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entry_lines_journal")
                    .table(JournalEntryLines::Table)
                    .col(JournalEntryLines::JournalId)
                    .col(JournalEntryLines::LineNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entry_lines_account")
                    .table(JournalEntryLines::Table)
                    .col(JournalEntryLines::AccountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntryLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GeneralJournals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GeneralJournals {
    Table,
    Id,
    TransactionDate,
    Reference,
    Description,
    CreatedBy,
    ReversalOf,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalEntryLines {
    Table,
    Id,
    JournalId,
    LineNo,
    AccountId,
    SubAccountId,
    Debit,
    Credit,
    Description,
    CreatedAt,
}
