use std::collections::BTreeMap;

use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct PointOfInterestDoc { pub id: i32, pub name: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct PointOfInterestInputDoc { pub name: String, pub description: Option<String> }

#[derive(ToSchema)]
pub struct CityWithoutPointsOfInterestDoc { pub id: i32, pub name: String, pub description: Option<String> }

/// `pointsOfInterest` is only present when `includePointsOfInterest=true`.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CityDoc {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub points_of_interest: Option<Vec<PointOfInterestDoc>>,
}

/// One JSON-Patch operation. `path` and `from` accept `/name` or `/description`.
#[derive(ToSchema)]
pub struct PatchOperationDoc {
    /// add, remove, replace, move, copy or test
    pub op: String,
    pub path: String,
    pub from: Option<String>,
    pub value: Option<String>,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub status: u16,
    pub title: String,
    pub detail: Option<String>,
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::cities::list,
        crate::routes::cities::get,
        crate::routes::points_of_interest::list,
        crate::routes::points_of_interest::get,
        crate::routes::points_of_interest::create,
        crate::routes::points_of_interest::replace,
        crate::routes::points_of_interest::patch,
        crate::routes::points_of_interest::delete,
    ),
    components(
        schemas(
            HealthResponse,
            PointOfInterestDoc,
            PointOfInterestInputDoc,
            CityWithoutPointsOfInterestDoc,
            CityDoc,
            PatchOperationDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cities"),
        (name = "points of interest")
    )
)]
pub struct ApiDoc;
