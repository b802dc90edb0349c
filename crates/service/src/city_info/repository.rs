use async_trait::async_trait;

use super::entities::{City, PointOfInterest};
use crate::errors::ServiceError;

/// One unit of work over the city data store.
///
/// Reads see committed data (plus, for the database variant, this unit's own
/// writes). Mutations are staged and only become durable when [`save`] returns
/// `true`; dropping the repository without saving discards them.
///
/// [`save`]: CityInfoRepository::save
#[async_trait]
pub trait CityInfoRepository: Send + Sync {
    /// All cities ordered by name, without their points of interest.
    async fn list_cities(&self) -> Result<Vec<City>, ServiceError>;
    async fn get_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, ServiceError>;
    async fn city_exists(&self, city_id: i32) -> Result<bool, ServiceError>;
    async fn list_points_of_interest(&self, city_id: i32) -> Result<Vec<PointOfInterest>, ServiceError>;
    async fn get_point_of_interest(&self, city_id: i32, point_id: i32) -> Result<Option<PointOfInterest>, ServiceError>;

    /// Stage a new point under `city_id`. The returned entity carries the
    /// assigned id, one above every existing point id across all cities.
    async fn add_point_of_interest(&self, city_id: i32, point: PointOfInterest) -> Result<PointOfInterest, ServiceError>;

    /// Stage a write-back of `point`'s name and description onto the stored
    /// record with the same id in `city_id`.
    async fn update_point_of_interest(&self, city_id: i32, point: &PointOfInterest) -> Result<(), ServiceError>;

    async fn delete_point_of_interest(&self, point: &PointOfInterest) -> Result<(), ServiceError>;

    /// Commit staged mutations. `false` means nothing was made durable.
    async fn save(&self) -> bool;
}

/// Opens a repository per request. The concrete factory is picked at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CityInfoRepository>, ServiceError>;
}
