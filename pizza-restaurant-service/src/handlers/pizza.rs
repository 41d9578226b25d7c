use axum::{extract::State, response::Json, routing::get, Router};
use tracing::instrument;

use crate::error::{ApiError, ApiErrorsResponse};
use crate::serializer::{self, PizzaSummary};
use crate::store;

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List of pizzas", body = [PizzaSummary]),
        (status = 500, description = "Unexpected error", body = ApiErrorsResponse),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(
    State(state): State<AppState>,
) -> Result<Json<Vec<PizzaSummary>>, ApiError> {
    let pizzas: Vec<PizzaSummary> = state
        .run(|conn| {
            Ok(store::list_pizzas(conn)?
                .iter()
                .map(serializer::serialize_pizza)
                .collect())
        })
        .await?;

    Ok(Json(pizzas))
}
