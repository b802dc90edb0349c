//! Field-by-field projection between entities and DTOs. Adding a field to
//! either side means adding it here as well.

use super::dto::{
    CityDto, CityWithoutPointsOfInterestDto, PointOfInterestDto, PointOfInterestForCreationDto,
    PointOfInterestForUpdateDto,
};
use super::entities::{City, PointOfInterest};

impl From<&PointOfInterest> for PointOfInterestDto {
    fn from(p: &PointOfInterest) -> Self {
        Self { id: p.id, name: p.name.clone(), description: p.description.clone() }
    }
}

impl From<&City> for CityDto {
    fn from(c: &City) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            description: c.description.clone(),
            points_of_interest: c.points_of_interest.iter().map(PointOfInterestDto::from).collect(),
        }
    }
}

impl From<&City> for CityWithoutPointsOfInterestDto {
    fn from(c: &City) -> Self {
        Self { id: c.id, name: c.name.clone(), description: c.description.clone() }
    }
}

/// Inverse of [`apply_update`]: the patchable view of a stored point.
impl From<&PointOfInterest> for PointOfInterestForUpdateDto {
    fn from(p: &PointOfInterest) -> Self {
        Self { name: p.name.clone(), description: p.description.clone() }
    }
}

pub fn to_point_dtos(points: &[PointOfInterest]) -> Vec<PointOfInterestDto> {
    points.iter().map(PointOfInterestDto::from).collect()
}

/// New entity under `city_id`. The id stays 0 until the repository assigns one.
pub fn from_creation(city_id: i32, dto: PointOfInterestForCreationDto) -> PointOfInterest {
    PointOfInterest { id: 0, city_id, name: dto.name, description: dto.description }
}

/// Write the update DTO's fields onto an existing entity.
pub fn apply_update(dto: PointOfInterestForUpdateDto, target: &mut PointOfInterest) {
    target.name = dto.name;
    target.description = dto.description;
}
