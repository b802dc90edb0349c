/// A city and, when loaded, the points of interest it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub points_of_interest: Vec<PointOfInterest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl From<models::city::Model> for City {
    fn from(m: models::city::Model) -> Self {
        Self { id: m.id, name: m.name, description: m.description, points_of_interest: Vec::new() }
    }
}

impl From<models::point_of_interest::Model> for PointOfInterest {
    fn from(m: models::point_of_interest::Model) -> Self {
        Self { id: m.id, city_id: m.city_id, name: m.name, description: m.description }
    }
}

impl City {
    pub fn with_points(model: models::city::Model, points: Vec<models::point_of_interest::Model>) -> Self {
        let mut city = Self::from(model);
        city.points_of_interest = points.into_iter().map(PointOfInterest::from).collect();
        city
    }
}
