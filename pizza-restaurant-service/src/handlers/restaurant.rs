use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::{info, instrument};

use crate::error::{ApiError, ApiErrorResponse, ApiErrorsResponse};
use crate::serializer::{self, RestaurantDetail, RestaurantSummary};
use crate::store;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

/// A path id that is not an integer names no restaurant.
fn restaurant_id(id: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound("Restaurant"))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List of restaurants", body = [RestaurantSummary]),
        (status = 500, description = "Unexpected error", body = ApiErrorsResponse),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let restaurants: Vec<RestaurantSummary> = state
        .run(|conn| {
            Ok(store::list_restaurants(conn)?
                .iter()
                .map(serializer::serialize_restaurant)
                .collect())
        })
        .await?;

    Ok(Json(restaurants))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = RestaurantDetail),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
        (status = 500, description = "Unexpected error", body = ApiErrorsResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RestaurantDetail>, ApiError> {
    let id = restaurant_id(id)?;

    let detail = state
        .run(move |conn| {
            let restaurant = store::find_restaurant(conn, id)?;
            let restaurant_pizzas = store::restaurant_pizzas_for(conn, &restaurant)?;
            Ok(serializer::serialize_restaurant_detail(
                &restaurant,
                &restaurant_pizzas,
            ))
        })
        .await?;

    Ok(Json(detail))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
        (status = 500, description = "Unexpected error", body = ApiErrorsResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = restaurant_id(id)?;

    let removed = state
        .run(move |conn| Ok(store::delete_restaurant(conn, id)?))
        .await?;
    info!(id, removed, "deleted restaurant");

    Ok(StatusCode::NO_CONTENT)
}
