//! Wire shapes. Field names follow the public JSON contract (camelCase).

use serde::{Deserialize, Serialize};

use super::validation;
use crate::errors::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterestDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWithoutPointsOfInterestDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// A city rendered with or without its points, depending on the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CityView {
    WithPointsOfInterest(CityDto),
    WithoutPointsOfInterest(CityWithoutPointsOfInterestDto),
}

/// Body of `POST`. A missing name deserializes as empty and fails validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterestForCreationDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT`, and the target shape of `PATCH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterestForUpdateDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PointOfInterestForCreationDto {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate_point_fields(&self.name, self.description.as_deref())
    }
}

impl PointOfInterestForUpdateDto {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate_point_fields(&self.name, self.description.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let dto: PointOfInterestForCreationDto = serde_json::from_str("{}").unwrap();
        assert_eq!(dto, PointOfInterestForCreationDto::default());
        assert!(dto.validate().unwrap_err().contains("name"));
    }

    #[test]
    fn city_dto_uses_camel_case() {
        let dto = CityDto { id: 1, name: "Paris".into(), description: None, points_of_interest: vec![] };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("pointsOfInterest").is_some());
    }

    #[test]
    fn city_view_serializes_untagged() {
        let view = CityView::WithoutPointsOfInterest(CityWithoutPointsOfInterestDto {
            id: 3,
            name: "Paris".into(),
            description: Some("The one with that big tower.".into()),
        });
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            serde_json::json!({"id": 3, "name": "Paris", "description": "The one with that big tower."})
        );
    }
}
