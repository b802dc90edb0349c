use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // PointOfInterest: lookups are always scoped by city
        manager
            .create_index(
                Index::create()
                    .name("idx_point_of_interest_city")
                    .table(PointOfInterest::Table)
                    .col(PointOfInterest::CityId)
                    .to_owned(),
            )
            .await?;

        // City: listing is ordered by name
        manager
            .create_index(
                Index::create()
                    .name("idx_city_name")
                    .table(City::Table)
                    .col(City::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_point_of_interest_city").table(PointOfInterest::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_city_name").table(City::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PointOfInterest { Table, CityId }

#[derive(DeriveIden)]
enum City { Table, Name }
