use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service::city_info::dto::{PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto};
use service::city_info::patch::JsonPatchOperation;
use tracing::info;

use crate::{errors::JsonApiError, state::AppState};

pub fn location(city_id: i32, id: i32) -> String {
    format!("/api/cities/{city_id}/pointsofinterest/{id}")
}

#[utoipa::path(
    get, path = "/api/cities/{city_id}/pointsofinterest", tag = "points of interest",
    params(("city_id" = i32, Path, description = "City id")),
    responses(
        (status = 200, description = "Points of interest of the city", body = [crate::openapi::PointOfInterestDoc]),
        (status = 404, description = "City not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
) -> Result<Json<Vec<PointOfInterestDto>>, JsonApiError> {
    Ok(Json(state.points_of_interest.list(city_id).await?))
}

#[utoipa::path(
    get, path = "/api/cities/{city_id}/pointsofinterest/{id}", tag = "points of interest",
    params(
        ("city_id" = i32, Path, description = "City id"),
        ("id" = i32, Path, description = "Point of interest id")
    ),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PointOfInterestDoc),
        (status = 404, description = "City or point of interest not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    Path((city_id, id)): Path<(i32, i32)>,
) -> Result<Json<PointOfInterestDto>, JsonApiError> {
    Ok(Json(state.points_of_interest.get(city_id, id).await?))
}

#[utoipa::path(
    post, path = "/api/cities/{city_id}/pointsofinterest", tag = "points of interest",
    params(("city_id" = i32, Path, description = "City id")),
    request_body = crate::openapi::PointOfInterestInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PointOfInterestDoc,
            headers(("Location" = String, description = "URL of the new point of interest"))),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "City not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    Path(city_id): Path<i32>,
    input: Result<Json<PointOfInterestForCreationDto>, JsonRejection>,
) -> Result<impl IntoResponse, JsonApiError> {
    let Json(input) = input?;
    let created = state.points_of_interest.create(city_id, input).await?;
    info!(city_id, id = created.id, "created point of interest");
    Ok((StatusCode::CREATED, [(header::LOCATION, location(city_id, created.id))], Json(created)))
}

#[utoipa::path(
    put, path = "/api/cities/{city_id}/pointsofinterest/{id}", tag = "points of interest",
    params(
        ("city_id" = i32, Path, description = "City id"),
        ("id" = i32, Path, description = "Point of interest id")
    ),
    request_body = crate::openapi::PointOfInterestInputDoc,
    responses(
        (status = 204, description = "Replaced"),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "City or point of interest not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    Path((city_id, id)): Path<(i32, i32)>,
    input: Result<Json<PointOfInterestForUpdateDto>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let Json(input) = input?;
    state.points_of_interest.replace(city_id, id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch, path = "/api/cities/{city_id}/pointsofinterest/{id}", tag = "points of interest",
    params(
        ("city_id" = i32, Path, description = "City id"),
        ("id" = i32, Path, description = "Point of interest id")
    ),
    request_body = [crate::openapi::PatchOperationDoc],
    responses(
        (status = 204, description = "Patched"),
        (status = 400, description = "Invalid patch document or patched state", body = crate::openapi::ErrorDoc),
        (status = 404, description = "City or point of interest not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path((city_id, id)): Path<(i32, i32)>,
    operations: Result<Json<Vec<JsonPatchOperation>>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let operations = match operations {
        Ok(Json(operations)) => operations,
        Err(rejection) => {
            // 先判断资源是否存在，再报告请求体错误
            state.points_of_interest.get(city_id, id).await?;
            return Err(rejection.into());
        }
    };
    state.points_of_interest.patch(city_id, id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete, path = "/api/cities/{city_id}/pointsofinterest/{id}", tag = "points of interest",
    params(
        ("city_id" = i32, Path, description = "City id"),
        ("id" = i32, Path, description = "Point of interest id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "City or point of interest not found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path((city_id, id)): Path<(i32, i32)>,
) -> Result<StatusCode, JsonApiError> {
    state.points_of_interest.delete(city_id, id).await?;
    info!(city_id, id, "deleted point of interest");
    Ok(StatusCode::NO_CONTENT)
}
