//! Migrator registering entity-specific migrations in dependency order.
//! Indexes come after the tables, seed data last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_city;
mod m20240601_000002_create_point_of_interest;
mod m20240601_000003_add_indexes;
mod m20240601_000004_seed_cities;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_city::Migration),
            Box::new(m20240601_000002_create_point_of_interest::Migration),
            Box::new(m20240601_000003_add_indexes::Migration),
            Box::new(m20240601_000004_seed_cities::Migration),
        ]
    }
}
