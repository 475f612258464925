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
                    .table(WeightRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WeightRecords::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(WeightRecords::CowId).integer().not_null())
                    .col(ColumnDef::new(WeightRecords::WeightInKgs).double().not_null())
                    .col(ColumnDef::new(WeightRecords::DateTaken).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weight_records_cow_id")
                            .from(WeightRecords::Table, WeightRecords::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One weight record per cow per day
        manager
            .create_index(
                Index::create()
                    .name("idx_weight_records_cow_date")
                    .table(WeightRecords::Table)
                    .col(WeightRecords::CowId)
                    .col(WeightRecords::DateTaken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CullingRecords::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CullingRecords::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CullingRecords::CowId).integer().not_null().unique_key())
                    .col(ColumnDef::new(CullingRecords::Reason).string_len(35).not_null())
                    .col(ColumnDef::new(CullingRecords::Notes).string_len(100).null())
                    .col(ColumnDef::new(CullingRecords::DateCarried).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_culling_records_cow_id")
                            .from(CullingRecords::Table, CullingRecords::CowId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CullingRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WeightRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum WeightRecords {
    Table,
    Id,
    CowId,
    WeightInKgs,
    DateTaken,
}

#[derive(DeriveIden)]
enum CullingRecords {
    Table,
    Id,
    CowId,
    Reason,
    Notes,
    DateCarried,
}
