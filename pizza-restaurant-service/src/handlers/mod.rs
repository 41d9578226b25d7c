pub mod pizza;
pub mod restaurant;
pub mod restaurant_pizza;

use axum::{response::Html, routing::get, Router};
use diesel::SqliteConnection;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiError;
use crate::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Checks a connection out of the pool for the duration of `f` and runs
    /// it on the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .merge(restaurant::router())
        .merge(pizza::router())
        .merge(restaurant_pizza::router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html("<h1>Pizza Restaurants</h1>")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        restaurant::list_restaurants,
        restaurant::get_restaurant,
        restaurant::delete_restaurant,
        pizza::list_pizzas,
        restaurant_pizza::create_restaurant_pizza,
    ),
    components(
        schemas(
            crate::serializer::RestaurantSummary,
            crate::serializer::RestaurantDetail,
            crate::serializer::PizzaSummary,
            crate::serializer::RestaurantPizzaView,
            crate::service::CreateRestaurantPizzaRequest,
            crate::error::ApiErrorResponse,
            crate::error::ApiErrorsResponse
        )
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "pizzas", description = "Pizza endpoints"),
        (name = "restaurant_pizzas", description = "Pizzas offered by restaurants")
    ),
    info(
        title = "Pizza Restaurants API",
        description = "Restaurants, pizzas and the prices they are offered at",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{setup_database, TestDatabase};

    pub fn test_app() -> (TestDatabase, Router) {
        let db = setup_database();
        let app = router(AppState::new(db.pool.clone()));
        (db, app)
    }

    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Vec<u8>) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send_json(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_index() {
        let (_db, app) = test_app();

        let (status, body) = send(&app, Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().starts_with("<h1>"));
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let (_db, app) = test_app();

        let (status, body) = send_json(&app, Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/restaurant_pizzas").is_some());
        assert!(body["paths"].get("/restaurants/{id}").is_some());
    }
}
