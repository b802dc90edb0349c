use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use service::city_info::dto::{CityView, CityWithoutPointsOfInterestDto};
use tracing::info;

use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CityQuery {
    /// Embed the city's points of interest in the response.
    #[serde(default)]
    pub include_points_of_interest: bool,
}

#[utoipa::path(
    get, path = "/api/cities", tag = "cities",
    responses(
        (status = 200, description = "Cities ordered by name", body = [crate::openapi::CityWithoutPointsOfInterestDoc]),
        (status = 500, description = "Internal Server Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CityWithoutPointsOfInterestDto>>, JsonApiError> {
    let cities = state.cities.list().await?;
    info!(count = cities.len(), "list cities");
    Ok(Json(cities))
}

#[utoipa::path(
    get, path = "/api/cities/{city_id}", tag = "cities",
    params(("city_id" = i32, Path, description = "City id"), CityQuery),
    responses(
        (status = 200, description = "City, with points of interest when requested", body = crate::openapi::CityDoc),
        (status = 404, description = "City not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
    Query(q): Query<CityQuery>,
) -> Result<Json<CityView>, JsonApiError> {
    Ok(Json(state.cities.get(city_id, q.include_points_of_interest).await?))
}
