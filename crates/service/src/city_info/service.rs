use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::dto::{
    CityDto, CityView, CityWithoutPointsOfInterestDto, PointOfInterestDto, PointOfInterestForCreationDto,
    PointOfInterestForUpdateDto,
};
use super::mapper;
use super::patch::{JsonPatchOperation, PatchDocument};
use super::repository::{CityInfoRepository, RepositoryFactory};
use crate::errors::ServiceError;
use crate::mail::MailService;

pub const DELETED_SUBJECT: &str = "Point of interest deleted.";

async fn commit(repo: &dyn CityInfoRepository) -> Result<(), ServiceError> {
    if repo.save().await {
        Ok(())
    } else {
        warn!("unit of work was not saved");
        Err(ServiceError::SaveFailed)
    }
}

/// Read-only queries over cities.
pub struct CityService {
    repositories: Arc<dyn RepositoryFactory>,
}

impl CityService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>) -> Self {
        Self { repositories }
    }

    pub async fn list(&self) -> Result<Vec<CityWithoutPointsOfInterestDto>, ServiceError> {
        let repo = self.repositories.open().await?;
        let cities = repo.list_cities().await?;
        Ok(cities.iter().map(CityWithoutPointsOfInterestDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, city_id: i32, include_points_of_interest: bool) -> Result<CityView, ServiceError> {
        let repo = self.repositories.open().await?;
        let city = repo
            .get_city(city_id, include_points_of_interest)
            .await?
            .ok_or_else(|| ServiceError::city_not_found(city_id))?;
        Ok(if include_points_of_interest {
            CityView::WithPointsOfInterest(CityDto::from(&city))
        } else {
            CityView::WithoutPointsOfInterest(CityWithoutPointsOfInterestDto::from(&city))
        })
    }
}

/// Business flow for points of interest: existence checks, validation,
/// persistence and the deletion notice.
pub struct PointOfInterestService {
    repositories: Arc<dyn RepositoryFactory>,
    mail: Arc<dyn MailService>,
}

impl PointOfInterestService {
    pub fn new(repositories: Arc<dyn RepositoryFactory>, mail: Arc<dyn MailService>) -> Self {
        Self { repositories, mail }
    }

    async fn ensure_city(repo: &dyn CityInfoRepository, city_id: i32) -> Result<(), ServiceError> {
        if repo.city_exists(city_id).await? {
            Ok(())
        } else {
            info!(city_id, "city not found");
            Err(ServiceError::city_not_found(city_id))
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, city_id: i32) -> Result<Vec<PointOfInterestDto>, ServiceError> {
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let points = repo.list_points_of_interest(city_id).await?;
        Ok(mapper::to_point_dtos(&points))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, city_id: i32, point_id: i32) -> Result<PointOfInterestDto, ServiceError> {
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let point = repo
            .get_point_of_interest(city_id, point_id)
            .await?
            .ok_or_else(|| ServiceError::point_not_found(city_id, point_id))?;
        Ok(PointOfInterestDto::from(&point))
    }

    /// Validation runs before the city lookup, so an invalid body for a
    /// missing city is a 400.
    #[instrument(skip(self, dto))]
    pub async fn create(&self, city_id: i32, dto: PointOfInterestForCreationDto) -> Result<PointOfInterestDto, ServiceError> {
        dto.validate()?;
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let created = repo.add_point_of_interest(city_id, mapper::from_creation(city_id, dto)).await?;
        commit(repo.as_ref()).await?;
        info!(city_id, point_id = created.id, "point of interest created");
        Ok(PointOfInterestDto::from(&created))
    }

    #[instrument(skip(self, dto))]
    pub async fn replace(&self, city_id: i32, point_id: i32, dto: PointOfInterestForUpdateDto) -> Result<(), ServiceError> {
        dto.validate()?;
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let mut point = repo
            .get_point_of_interest(city_id, point_id)
            .await?
            .ok_or_else(|| ServiceError::point_not_found(city_id, point_id))?;
        mapper::apply_update(dto, &mut point);
        repo.update_point_of_interest(city_id, &point).await?;
        commit(repo.as_ref()).await
    }

    /// Apply a patch document. Existence is checked before the document is
    /// parsed; a rejected patch leaves the stored point untouched.
    #[instrument(skip(self, operations), fields(operations = operations.len()))]
    pub async fn patch(
        &self,
        city_id: i32,
        point_id: i32,
        operations: Vec<JsonPatchOperation>,
    ) -> Result<(), ServiceError> {
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let mut point = repo
            .get_point_of_interest(city_id, point_id)
            .await?
            .ok_or_else(|| ServiceError::point_not_found(city_id, point_id))?;

        let document = PatchDocument::try_from(operations)?;
        let patched = document.apply_to(&PointOfInterestForUpdateDto::from(&point))?;

        mapper::apply_update(patched, &mut point);
        repo.update_point_of_interest(city_id, &point).await?;
        commit(repo.as_ref()).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, city_id: i32, point_id: i32) -> Result<(), ServiceError> {
        let repo = self.repositories.open().await?;
        Self::ensure_city(repo.as_ref(), city_id).await?;
        let point = repo
            .get_point_of_interest(city_id, point_id)
            .await?
            .ok_or_else(|| ServiceError::point_not_found(city_id, point_id))?;
        repo.delete_point_of_interest(&point).await?;
        commit(repo.as_ref()).await?;

        self.mail.send(
            DELETED_SUBJECT,
            &format!("Point of interest {} with id {} was deleted.", point.name, point.id),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::city_info::entities::City;
    use crate::city_info::repo::{CitiesDataStore, InMemoryRepositoryFactory};
    use crate::city_info::validation::{DESCRIPTION_EQUALS_NAME, DESCRIPTION_FIELD};
    use crate::mail::mock::RecordingMailService;

    struct Fixture {
        store: Arc<CitiesDataStore>,
        mail: Arc<RecordingMailService>,
        cities: CityService,
        points: PointOfInterestService,
    }

    fn fixture_with(store: CitiesDataStore) -> Fixture {
        let store = Arc::new(store);
        let factory: Arc<dyn RepositoryFactory> = Arc::new(InMemoryRepositoryFactory::new(Arc::clone(&store)));
        let mail = Arc::new(RecordingMailService::default());
        Fixture {
            cities: CityService::new(Arc::clone(&factory)),
            points: PointOfInterestService::new(factory, mail.clone()),
            store,
            mail,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CitiesDataStore::seeded())
    }

    fn body(name: &str, description: &str) -> PointOfInterestForCreationDto {
        PointOfInterestForCreationDto { name: name.into(), description: Some(description.into()) }
    }

    fn ops(value: serde_json::Value) -> Vec<JsonPatchOperation> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn get_seeded_point() {
        let f = fixture();
        let point = f.points.get(1, 1).await.unwrap();
        assert_eq!(point.name, "Central Park");
        assert_eq!(point.description.as_deref(), Some("The most visited urban park in the US."));
    }

    #[tokio::test]
    async fn missing_city_or_point_is_not_found() {
        let f = fixture();
        assert!(matches!(f.points.get(999, 1).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.points.get(1, 5).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.points.list(999).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.cities.get(999, false).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn city_without_points_lists_empty() {
        let f = fixture_with(CitiesDataStore::new(vec![City {
            id: 4,
            name: "Bruges".into(),
            description: None,
            points_of_interest: vec![],
        }]));
        assert!(f.points.list(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn city_view_follows_include_flag() {
        let f = fixture();
        match f.cities.get(3, true).await.unwrap() {
            CityView::WithPointsOfInterest(city) => assert_eq!(city.points_of_interest.len(), 2),
            other => panic!("unexpected view: {other:?}"),
        }
        assert!(matches!(f.cities.get(3, false).await.unwrap(), CityView::WithoutPointsOfInterest(_)));
        assert_eq!(f.cities.list().await.unwrap()[0].name, "Antwerp");
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_persists() {
        let f = fixture();
        let created = f.points.create(3, body("Sacre-Coeur", "A basilica on Montmartre.")).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(f.points.get(3, 7).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_with_name_equal_description_persists_nothing() {
        let f = fixture();
        let before = f.store.snapshot().await;
        let err = f.points.create(1, body("X", "X")).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert_eq!(errors.messages(DESCRIPTION_FIELD), [DESCRIPTION_EQUALS_NAME.to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(f.store.snapshot().await, before);
    }

    #[tokio::test]
    async fn invalid_body_wins_over_missing_city() {
        let f = fixture();
        assert!(matches!(f.points.create(999, body("X", "X")).await, Err(ServiceError::Validation(_))));
        assert!(matches!(f.points.create(999, body("X", "Y")).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn replace_overwrites_both_fields() {
        let f = fixture();
        f.points
            .replace(2, 3, PointOfInterestForUpdateDto { name: "Onze-Lieve-Vrouwekathedraal".into(), description: None })
            .await
            .unwrap();
        let point = f.points.get(2, 3).await.unwrap();
        assert_eq!(point.name, "Onze-Lieve-Vrouwekathedraal");
        assert_eq!(point.description, None);
    }

    #[tokio::test]
    async fn patch_updates_single_field() {
        let f = fixture();
        f.points
            .patch(1, 1, ops(json!([{ "op": "replace", "path": "/name", "value": "Updated - Central Park" }])))
            .await
            .unwrap();
        let point = f.points.get(1, 1).await.unwrap();
        assert_eq!(point.name, "Updated - Central Park");
        assert_eq!(point.description.as_deref(), Some("The most visited urban park in the US."));
    }

    #[tokio::test]
    async fn rejected_patch_leaves_record_unchanged() {
        let f = fixture();
        let before = f.points.get(1, 1).await.unwrap();
        let err = f
            .points
            .patch(
                1,
                1,
                ops(json!([
                    { "op": "replace", "path": "/name", "value": "Same" },
                    { "op": "replace", "path": "/description", "value": "Same" }
                ])),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref e) if e.contains(DESCRIPTION_FIELD)));
        assert_eq!(f.points.get(1, 1).await.unwrap(), before);
    }

    #[tokio::test]
    async fn patch_of_missing_point_is_not_found_even_when_malformed() {
        let f = fixture();
        let err = f.points.patch(1, 99, ops(json!([{ "op": "bogus", "path": "/id" }]))).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_point_and_sends_one_notice() {
        let f = fixture();
        f.points.delete(3, 6).await.unwrap();
        assert!(matches!(f.points.get(3, 6).await, Err(ServiceError::NotFound(_))));

        let sent = f.mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, DELETED_SUBJECT);
        assert_eq!(sent[0].message, "Point of interest The Louvre with id 6 was deleted.");
    }

    #[tokio::test]
    async fn failed_delete_sends_nothing() {
        let f = fixture();
        assert!(f.points.delete(3, 1).await.is_err());
        assert!(f.mail.sent().is_empty());
    }
}
