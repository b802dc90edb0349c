use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::city_info::entities::{City, PointOfInterest};
use crate::city_info::repository::{CityInfoRepository, RepositoryFactory};
use crate::errors::ServiceError;

/// In-process store of cities and their points of interest.
///
/// Shared between requests through an `Arc`; all mutations go through
/// [`CitiesDataStore::apply`], which holds the write lock for the whole batch.
#[derive(Debug)]
pub struct CitiesDataStore {
    inner: RwLock<StoreState>,
}

#[derive(Debug)]
struct StoreState {
    cities: Vec<City>,
    /// Highest point id handed out so far, committed or not.
    last_point_id: i32,
}

#[derive(Debug, Clone)]
enum PendingChange {
    Add(PointOfInterest),
    Update(PointOfInterest),
    Delete { city_id: i32, point_id: i32 },
}

fn max_point_id(cities: &[City]) -> i32 {
    cities
        .iter()
        .flat_map(|c| c.points_of_interest.iter().map(|p| p.id))
        .max()
        .unwrap_or(0)
}

impl CitiesDataStore {
    pub fn new(cities: Vec<City>) -> Self {
        let last_point_id = max_point_id(&cities);
        Self { inner: RwLock::new(StoreState { cities, last_point_id }) }
    }

    /// Store pre-populated with the demo cities.
    pub fn seeded() -> Self {
        Self::new(seed_cities())
    }

    /// Copy of the committed state.
    pub async fn snapshot(&self) -> Vec<City> {
        self.inner.read().await.cities.clone()
    }

    async fn reserve_point_id(&self) -> Result<i32, ServiceError> {
        let mut state = self.inner.write().await;
        let next = state
            .last_point_id
            .max(max_point_id(&state.cities))
            .checked_add(1)
            .ok_or_else(|| ServiceError::Db("point of interest id space exhausted".into()))?;
        state.last_point_id = next;
        Ok(next)
    }

    /// Apply a batch of changes atomically. If any change no longer applies
    /// (its city or point vanished), nothing is applied.
    async fn apply(&self, changes: Vec<PendingChange>) -> bool {
        let mut state = self.inner.write().await;
        let mut cities = state.cities.clone();
        for change in changes {
            if let Err(reason) = apply_change(&mut cities, change) {
                warn!(%reason, "in-memory save rejected");
                return false;
            }
        }
        state.cities = cities;
        true
    }
}

fn apply_change(cities: &mut [City], change: PendingChange) -> Result<(), String> {
    match change {
        PendingChange::Add(point) => {
            let city = cities
                .iter_mut()
                .find(|c| c.id == point.city_id)
                .ok_or_else(|| format!("city {} no longer exists", point.city_id))?;
            city.points_of_interest.push(point);
        }
        PendingChange::Update(point) => {
            let stored = cities
                .iter_mut()
                .find(|c| c.id == point.city_id)
                .and_then(|c| c.points_of_interest.iter_mut().find(|p| p.id == point.id))
                .ok_or_else(|| format!("point of interest {} no longer exists", point.id))?;
            stored.name = point.name;
            stored.description = point.description;
        }
        PendingChange::Delete { city_id, point_id } => {
            let city = cities
                .iter_mut()
                .find(|c| c.id == city_id)
                .ok_or_else(|| format!("city {city_id} no longer exists"))?;
            let index = city
                .points_of_interest
                .iter()
                .position(|p| p.id == point_id)
                .ok_or_else(|| format!("point of interest {point_id} no longer exists"))?;
            city.points_of_interest.remove(index);
        }
    }
    Ok(())
}

/// Unit of work over a [`CitiesDataStore`]. Changes are buffered until `save`.
pub struct InMemoryCityInfoRepository {
    store: Arc<CitiesDataStore>,
    pending: Mutex<Vec<PendingChange>>,
}

impl InMemoryCityInfoRepository {
    pub fn new(store: Arc<CitiesDataStore>) -> Self {
        Self { store, pending: Mutex::new(Vec::new()) }
    }

    async fn find_point(&self, city_id: i32, point_id: i32) -> Option<PointOfInterest> {
        let state = self.store.inner.read().await;
        state
            .cities
            .iter()
            .find(|c| c.id == city_id)
            .and_then(|c| c.points_of_interest.iter().find(|p| p.id == point_id))
            .cloned()
    }
}

#[async_trait]
impl CityInfoRepository for InMemoryCityInfoRepository {
    async fn list_cities(&self) -> Result<Vec<City>, ServiceError> {
        let state = self.store.inner.read().await;
        let mut cities: Vec<City> = state
            .cities
            .iter()
            .map(|c| City { points_of_interest: Vec::new(), ..c.clone() })
            .collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn get_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, ServiceError> {
        let state = self.store.inner.read().await;
        Ok(state.cities.iter().find(|c| c.id == city_id).map(|c| {
            let mut city = c.clone();
            if !include_points_of_interest {
                city.points_of_interest.clear();
            }
            city
        }))
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, ServiceError> {
        let state = self.store.inner.read().await;
        Ok(state.cities.iter().any(|c| c.id == city_id))
    }

    async fn list_points_of_interest(&self, city_id: i32) -> Result<Vec<PointOfInterest>, ServiceError> {
        let state = self.store.inner.read().await;
        Ok(state
            .cities
            .iter()
            .find(|c| c.id == city_id)
            .map(|c| c.points_of_interest.clone())
            .unwrap_or_default())
    }

    async fn get_point_of_interest(&self, city_id: i32, point_id: i32) -> Result<Option<PointOfInterest>, ServiceError> {
        Ok(self.find_point(city_id, point_id).await)
    }

    async fn add_point_of_interest(&self, city_id: i32, point: PointOfInterest) -> Result<PointOfInterest, ServiceError> {
        if !self.city_exists(city_id).await? {
            return Err(ServiceError::city_not_found(city_id));
        }
        let id = self.store.reserve_point_id().await?;
        let point = PointOfInterest { id, city_id, ..point };
        debug!(city_id, point_id = id, "staged point of interest");
        self.pending.lock().await.push(PendingChange::Add(point.clone()));
        Ok(point)
    }

    async fn update_point_of_interest(&self, city_id: i32, point: &PointOfInterest) -> Result<(), ServiceError> {
        if self.find_point(city_id, point.id).await.is_none() {
            return Err(ServiceError::point_not_found(city_id, point.id));
        }
        let point = PointOfInterest { city_id, ..point.clone() };
        self.pending.lock().await.push(PendingChange::Update(point));
        Ok(())
    }

    async fn delete_point_of_interest(&self, point: &PointOfInterest) -> Result<(), ServiceError> {
        self.pending
            .lock()
            .await
            .push(PendingChange::Delete { city_id: point.city_id, point_id: point.id });
        Ok(())
    }

    async fn save(&self) -> bool {
        let changes = std::mem::take(&mut *self.pending.lock().await);
        if changes.is_empty() {
            return true;
        }
        self.store.apply(changes).await
    }
}

/// Hands out units of work over one shared store.
#[derive(Clone)]
pub struct InMemoryRepositoryFactory {
    store: Arc<CitiesDataStore>,
}

impl InMemoryRepositoryFactory {
    pub fn new(store: Arc<CitiesDataStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CitiesDataStore> {
        &self.store
    }
}

#[async_trait]
impl RepositoryFactory for InMemoryRepositoryFactory {
    async fn open(&self) -> Result<Box<dyn CityInfoRepository>, ServiceError> {
        Ok(Box::new(InMemoryCityInfoRepository::new(Arc::clone(&self.store))))
    }
}

fn seed_point(id: i32, city_id: i32, name: &str, description: &str) -> PointOfInterest {
    PointOfInterest { id, city_id, name: name.to_string(), description: Some(description.to_string()) }
}

/// The demo data set: three cities with two points of interest each.
pub fn seed_cities() -> Vec<City> {
    vec![
        City {
            id: 1,
            name: "New York City".into(),
            description: Some("The one with that big park.".into()),
            points_of_interest: vec![
                seed_point(1, 1, "Central Park", "The most visited urban park in the US."),
                seed_point(2, 1, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
            ],
        },
        City {
            id: 2,
            name: "Antwerp".into(),
            description: Some("The one with the cathedral that was never really finished.".into()),
            points_of_interest: vec![
                seed_point(3, 2, "Cathedral of Our Lady", "A Gothic style cathedral."),
                seed_point(4, 2, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
            ],
        },
        City {
            id: 3,
            name: "Paris".into(),
            description: Some("The one with that big tower.".into()),
            points_of_interest: vec![
                seed_point(5, 3, "Eiffel Tower", "A wrought iron lattice tower on the Champ de Mars."),
                seed_point(6, 3, "The Louvre", "The world's largest museum."),
            ],
        },
    ]
}
