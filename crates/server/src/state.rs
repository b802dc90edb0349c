use std::sync::Arc;

use service::city_info::{CityService, PointOfInterestService, RepositoryFactory};
use service::mail::MailService;

/// Shared handler state. Cloned per request; the services behind it are shared.
#[derive(Clone)]
pub struct AppState {
    pub cities: Arc<CityService>,
    pub points_of_interest: Arc<PointOfInterestService>,
}

impl AppState {
    pub fn new(repositories: Arc<dyn RepositoryFactory>, mail: Arc<dyn MailService>) -> Self {
        Self {
            cities: Arc::new(CityService::new(Arc::clone(&repositories))),
            points_of_interest: Arc::new(PointOfInterestService::new(repositories, mail)),
        }
    }
}
