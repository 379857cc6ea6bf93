use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the region_consumption table
        manager
            .create_table(
                Table::create()
                    .table(RegionConsumption::Table)
                    .if_not_exists()
                    .col(pk_auto(RegionConsumption::Id))
                    .col(string_len(RegionConsumption::Region, 10))
                    .col(integer(RegionConsumption::Year))
                    .col(double(RegionConsumption::Consumption))
                    .col(string_len(RegionConsumption::Source, 20))
                    .to_owned(),
            )
            .await?;

        // One row per (region, year); the cache layer relies on this
        // constraint for its atomic insert-if-absent.
        manager
            .create_index(
                Index::create()
                    .name("u_region_year")
                    .table(RegionConsumption::Table)
                    .col(RegionConsumption::Region)
                    .col(RegionConsumption::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RegionConsumption::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RegionConsumption {
    Table,
    Id,
    Region,
    Year,
    Consumption,
    Source,
}
