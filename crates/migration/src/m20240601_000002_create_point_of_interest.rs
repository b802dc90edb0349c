//! Create `point_of_interest` table.
//! Identifiers are assigned by the application (max + 1), not by the database.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PointOfInterest::Table)
                    .if_not_exists()
                    .col(integer(PointOfInterest::Id).primary_key())
                    .col(integer(PointOfInterest::CityId).not_null())
                    .col(string_len(PointOfInterest::Name, 50).not_null())
                    .col(string_len_null(PointOfInterest::Description, 200))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_point_of_interest_city")
                            .from(PointOfInterest::Table, PointOfInterest::CityId)
                            .to(City::Table, City::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PointOfInterest::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PointOfInterest { Table, Id, CityId, Name, Description }

#[derive(DeriveIden)]
enum City { Table, Id }
