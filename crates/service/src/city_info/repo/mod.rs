pub mod memory;
pub mod seaorm;

pub use memory::{CitiesDataStore, InMemoryCityInfoRepository, InMemoryRepositoryFactory};
pub use seaorm::{SeaOrmCityInfoRepository, SeaOrmRepositoryFactory};
