//! Seed the three demo cities and their points of interest.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

struct SeedCity {
    id: i32,
    name: &'static str,
    description: &'static str,
    points: &'static [(i32, &'static str, &'static str)],
}

const CITIES: &[SeedCity] = &[
    SeedCity {
        id: 1,
        name: "New York City",
        description: "The one with that big park.",
        points: &[
            (1, "Central Park", "The most visited urban park in the US."),
            (2, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
        ],
    },
    SeedCity {
        id: 2,
        name: "Antwerp",
        description: "The one with the cathedral that was never really finished.",
        points: &[
            (3, "Cathedral of Our Lady", "A Gothic style cathedral."),
            (4, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
        ],
    },
    SeedCity {
        id: 3,
        name: "Paris",
        description: "The one with that big tower.",
        points: &[
            (5, "Eiffel Tower", "A wrought iron lattice tower on the Champ de Mars."),
            (6, "The Louvre", "The world's largest museum."),
        ],
    },
];

fn seq_err(e: sea_query::error::Error) -> DbErr {
    DbErr::Custom(e.to_string())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let mut cities = Query::insert();
        cities
            .into_table(City::Table)
            .columns([City::Id, City::Name, City::Description]);
        let mut points = Query::insert();
        points.into_table(PointOfInterest::Table).columns([
            PointOfInterest::Id,
            PointOfInterest::CityId,
            PointOfInterest::Name,
            PointOfInterest::Description,
        ]);

        for city in CITIES {
            cities
                .values([city.id.into(), city.name.into(), city.description.into()])
                .map_err(seq_err)?;
            for &(id, name, description) in city.points {
                points
                    .values([id.into(), city.id.into(), name.into(), description.into()])
                    .map_err(seq_err)?;
            }
        }

        db.execute(backend.build(&cities)).await?;
        db.execute(backend.build(&points)).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();
        let ids: Vec<i32> = CITIES.iter().map(|c| c.id).collect();

        let points = Query::delete()
            .from_table(PointOfInterest::Table)
            .and_where(Expr::col(PointOfInterest::CityId).is_in(ids.clone()))
            .to_owned();
        let cities = Query::delete()
            .from_table(City::Table)
            .and_where(Expr::col(City::Id).is_in(ids))
            .to_owned();

        db.execute(backend.build(&points)).await?;
        db.execute(backend.build(&cities)).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum City { Table, Id, Name, Description }

#[derive(DeriveIden)]
enum PointOfInterest { Table, Id, CityId, Name, Description }
