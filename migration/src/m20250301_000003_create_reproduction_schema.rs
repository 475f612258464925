use sea_orm_migration::prelude::*;

use crate::m20250301_000002_create_core_schema::Cows;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pregnancies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pregnancies::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Pregnancies::CowId).integer().not_null())
                    .col(ColumnDef::new(Pregnancies::StartDate).date().not_null())
                    .col(ColumnDef::new(Pregnancies::DateOfCalving).date().null())
                    .col(ColumnDef::new(Pregnancies::PregnancyStatus).string_len(11).not_null().default("Unconfirmed"))
                    .col(ColumnDef::new(Pregnancies::PregnancyNotes).text().null())
                    .col(ColumnDef::new(Pregnancies::CalvingNotes).text().null())
                    .col(ColumnDef::new(Pregnancies::PregnancyScanDate).date().null())
                    .col(ColumnDef::new(Pregnancies::PregnancyFailedDate).date().null())
                    .col(ColumnDef::new(Pregnancies::PregnancyOutcome).string_len(11).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pregnancies_cow_id")
                            .from(Pregnancies::Table, Pregnancies::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pregnancies_cow_id")
                    .table(Pregnancies::Table)
                    .col(Pregnancies::CowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Heats::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Heats::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Heats::CowId).integer().not_null())
                    .col(ColumnDef::new(Heats::ObservationTime).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_heats_cow_id")
                            .from(Heats::Table, Heats::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_heats_cow_id")
                    .table(Heats::Table)
                    .col(Heats::CowId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Heats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pregnancies::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Pregnancies {
    Table,
    Id,
    CowId,
    StartDate,
    DateOfCalving,
    PregnancyStatus,
    PregnancyNotes,
    CalvingNotes,
    PregnancyScanDate,
    PregnancyFailedDate,
    PregnancyOutcome,
}

#[derive(DeriveIden)]
enum Heats {
    Table,
    Id,
    CowId,
    ObservationTime,
}
