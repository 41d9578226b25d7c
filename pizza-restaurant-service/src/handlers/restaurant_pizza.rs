use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::{ApiError, ApiErrorsResponse, ValidationError};
use crate::serializer::{self, RestaurantPizzaView};
use crate::service::{CreateRestaurantPizzaRequest, RestaurantPizzaService};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = RestaurantPizzaView),
        (status = 400, description = "Validation errors", body = ApiErrorsResponse),
        (status = 500, description = "Unexpected error", body = ApiErrorsResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaView>), ApiError> {
    let Json(body) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;
    let request = CreateRestaurantPizzaRequest::try_from(body)?;

    let created = state
        .run(move |conn| RestaurantPizzaService::new(conn).create(&request))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serializer::serialize_restaurant_pizza(
            &created.restaurant_pizza,
            &created.pizza,
            Some(&created.restaurant),
        )),
    ))
}
