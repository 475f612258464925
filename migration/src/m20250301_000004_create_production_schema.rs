use sea_orm_migration::prelude::*;

use crate::m20250301_000002_create_core_schema::Cows;
use crate::m20250301_000003_create_reproduction_schema::Pregnancies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Lactations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Lactations::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Lactations::CowId).integer().not_null())
                    .col(ColumnDef::new(Lactations::StartDate).date().not_null())
                    .col(ColumnDef::new(Lactations::LactationNumber).small_integer().not_null().default(1))
                    .col(ColumnDef::new(Lactations::PregnancyId).integer().null().unique_key())
                    .col(ColumnDef::new(Lactations::ActualEndDate).date().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lactations_cow_id")
                            .from(Lactations::Table, Lactations::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lactations_pregnancy_id")
                            .from(Lactations::Table, Lactations::PregnancyId)
                            .to(Pregnancies::Table, Pregnancies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lactations_cow_id")
                    .table(Lactations::Table)
                    .col(Lactations::CowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Milk::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Milk::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Milk::CowId).integer().not_null())
                    .col(ColumnDef::new(Milk::LactationId).integer().not_null())
                    .col(ColumnDef::new(Milk::MilkingDate).date_time().not_null())
                    .col(ColumnDef::new(Milk::AmountInKgs).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_milk_cow_id")
                            .from(Milk::Table, Milk::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_milk_lactation_id")
                            .from(Milk::Table, Milk::LactationId)
                            .to(Lactations::Table, Lactations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Milk::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lactations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Lactations {
    Table,
    Id,
    CowId,
    StartDate,
    LactationNumber,
    PregnancyId,
    ActualEndDate,
}

#[derive(DeriveIden)]
enum Milk {
    Table,
    Id,
    CowId,
    LactationId,
    MilkingDate,
    AmountInKgs,
}
