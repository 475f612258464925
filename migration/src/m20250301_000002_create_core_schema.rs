use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CowBreeds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CowBreeds::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(CowBreeds::Name).string_len(20).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Cows reference their breed (restricted) and optionally their parents
        manager
            .create_table(
                Table::create()
                    .table(Cows::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cows::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Cows::Name).string_len(35).not_null())
                    .col(ColumnDef::new(Cows::BreedId).integer().not_null())
                    .col(ColumnDef::new(Cows::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Cows::Gender).string_len(6).not_null())
                    .col(ColumnDef::new(Cows::AvailabilityStatus).string_len(5).not_null().default("Alive"))
                    .col(ColumnDef::new(Cows::CurrentPregnancyStatus).string_len(12).not_null().default("Unavailable"))
                    .col(ColumnDef::new(Cows::Category).string_len(11).not_null().default("Calf"))
                    .col(ColumnDef::new(Cows::CurrentProductionStatus).string_len(22).not_null().default("Calf"))
                    .col(ColumnDef::new(Cows::IsBought).boolean().not_null().default(false))
                    .col(ColumnDef::new(Cows::DateIntroducedInFarm).date().not_null())
                    .col(ColumnDef::new(Cows::DateOfDeath).date().null())
                    .col(ColumnDef::new(Cows::SireId).integer().null())
                    .col(ColumnDef::new(Cows::DamId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cows_breed_id")
                            .from(Cows::Table, Cows::BreedId)
                            .to(CowBreeds::Table, CowBreeds::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cows_sire_id")
                            .from(Cows::Table, Cows::SireId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cows_dam_id")
                            .from(Cows::Table, Cows::DamId)
                            .to(Cows::Table, Cows::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cows_dam_id")
                    .table(Cows::Table)
                    .col(Cows::DamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Inseminators::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inseminators::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Inseminators::FirstName).string_len(20).not_null())
                    .col(ColumnDef::new(Inseminators::LastName).string_len(20).not_null())
                    .col(ColumnDef::new(Inseminators::PhoneNumber).string_len(15).not_null().unique_key())
                    .col(ColumnDef::new(Inseminators::Sex).string_len(6).not_null())
                    .col(ColumnDef::new(Inseminators::Company).string_len(50).null())
                    .col(ColumnDef::new(Inseminators::LicenseNumber).string_len(25).null().unique_key())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inseminators::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CowBreeds::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum CowBreeds {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Cows {
    Table,
    Id,
    Name,
    BreedId,
    DateOfBirth,
    Gender,
    AvailabilityStatus,
    CurrentPregnancyStatus,
    Category,
    CurrentProductionStatus,
    IsBought,
    DateIntroducedInFarm,
    DateOfDeath,
    SireId,
    DamId,
}

#[derive(DeriveIden)]
enum Inseminators {
    Table,
    Id,
    FirstName,
    LastName,
    PhoneNumber,
    Sex,
    Company,
    LicenseNumber,
}
