use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::city_info::entities::{City, PointOfInterest};
use crate::city_info::repository::{CityInfoRepository, RepositoryFactory};
use crate::errors::ServiceError;

/// Unit of work backed by one database transaction.
///
/// The transaction is opened in [`begin`](Self::begin) and committed by `save`.
/// Dropping the repository before `save` rolls it back.
pub struct SeaOrmCityInfoRepository {
    txn: Mutex<Option<DatabaseTransaction>>,
}

fn closed() -> ServiceError {
    ServiceError::Db("unit of work already saved".into())
}

impl SeaOrmCityInfoRepository {
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        let txn = db.begin().await?;
        Ok(Self { txn: Mutex::new(Some(txn)) })
    }
}

#[async_trait]
impl CityInfoRepository for SeaOrmCityInfoRepository {
    async fn list_cities(&self) -> Result<Vec<City>, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        let cities = models::city::list_ordered(txn).await?;
        Ok(cities.into_iter().map(City::from).collect())
    }

    async fn get_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        if include_points_of_interest {
            let found = models::city::find_with_points(txn, city_id).await?;
            Ok(found.map(|(city, points)| City::with_points(city, points)))
        } else {
            Ok(models::city::find(txn, city_id).await?.map(City::from))
        }
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        Ok(models::city::exists(txn, city_id).await?)
    }

    async fn list_points_of_interest(&self, city_id: i32) -> Result<Vec<PointOfInterest>, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        let points = models::point_of_interest::list_for_city(txn, city_id).await?;
        Ok(points.into_iter().map(PointOfInterest::from).collect())
    }

    async fn get_point_of_interest(&self, city_id: i32, point_id: i32) -> Result<Option<PointOfInterest>, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        let point = models::point_of_interest::find_for_city(txn, city_id, point_id).await?;
        Ok(point.map(PointOfInterest::from))
    }

    async fn add_point_of_interest(&self, city_id: i32, point: PointOfInterest) -> Result<PointOfInterest, ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        if !models::city::exists(txn, city_id).await? {
            return Err(ServiceError::city_not_found(city_id));
        }
        let inserted =
            models::point_of_interest::insert_next(txn, city_id, &point.name, point.description.as_deref()).await?;
        debug!(city_id, point_id = inserted.id, "inserted point of interest");
        Ok(PointOfInterest::from(inserted))
    }

    async fn update_point_of_interest(&self, city_id: i32, point: &PointOfInterest) -> Result<(), ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        let existing = models::point_of_interest::find_for_city(txn, city_id, point.id)
            .await?
            .ok_or_else(|| ServiceError::point_not_found(city_id, point.id))?;
        models::point_of_interest::update_fields(txn, existing, &point.name, point.description.as_deref()).await?;
        Ok(())
    }

    async fn delete_point_of_interest(&self, point: &PointOfInterest) -> Result<(), ServiceError> {
        let guard = self.txn.lock().await;
        let txn = guard.as_ref().ok_or_else(closed)?;
        if !models::point_of_interest::delete(txn, point.id).await? {
            return Err(ServiceError::point_not_found(point.city_id, point.id));
        }
        Ok(())
    }

    async fn save(&self) -> bool {
        let Some(txn) = self.txn.lock().await.take() else { return true };
        match txn.commit().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "commit failed");
                false
            }
        }
    }
}

#[derive(Clone)]
pub struct SeaOrmRepositoryFactory {
    db: DatabaseConnection,
}

impl SeaOrmRepositoryFactory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RepositoryFactory for SeaOrmRepositoryFactory {
    async fn open(&self) -> Result<Box<dyn CityInfoRepository>, ServiceError> {
        Ok(Box::new(SeaOrmCityInfoRepository::begin(&self.db).await?))
    }
}
