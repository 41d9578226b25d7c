use diesel::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{ApiError, ValidationError};
use crate::models::{self, NewRestaurantPizza};
use crate::store::{self, StoreError};

pub const MIN_PRICE: f64 = 1.0;
pub const MAX_PRICE: f64 = 30.0;

/// A price as sent by clients: either a JSON number or a numeric string.
/// Booleans match neither variant and are rejected rather than read as 0 or 1.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn to_number(&self) -> Result<f64, ValidationError> {
        let value = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::NonNumericPrice(s.clone()))?,
        };
        if !value.is_finite() {
            return Err(ValidationError::NonNumericPrice(value.to_string()));
        }
        Ok(value)
    }
}

#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price between 1 and 30, as a number or numeric string
    #[schema(value_type = f64)]
    pub price: Option<PriceInput>,
    /// Id of an existing pizza
    #[schema(value_type = i32)]
    pub pizza_id: Option<i32>,
    /// Id of an existing restaurant
    #[schema(value_type = i32)]
    pub restaurant_id: Option<i32>,
}

impl CreateRestaurantPizzaRequest {
    /// Checks presence and the price range. Whether the ids resolve is decided
    /// against the store.
    pub fn validate(&self) -> Result<NewRestaurantPizza, ValidationError> {
        let price = self
            .price
            .as_ref()
            .ok_or(ValidationError::MissingField("price"))?;
        let pizza_id = self
            .pizza_id
            .ok_or(ValidationError::MissingField("pizza_id"))?;
        let restaurant_id = self
            .restaurant_id
            .ok_or(ValidationError::MissingField("restaurant_id"))?;

        let price = price.to_number()?;
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(ValidationError::PriceOutOfRange(price));
        }

        Ok(NewRestaurantPizza {
            price,
            pizza_id,
            restaurant_id,
        })
    }
}

/// Only JSON objects are accepted; serde would otherwise also read the struct
/// from a positional array.
impl TryFrom<Map<String, Value>> for CreateRestaurantPizzaRequest {
    type Error = ValidationError;

    fn try_from(body: Map<String, Value>) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(body))
            .map_err(|e| ValidationError::MalformedBody(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRestaurantPizza {
    pub restaurant_pizza: models::RestaurantPizza,
    pub restaurant: models::Restaurant,
    pub pizza: models::Pizza,
}

pub struct RestaurantPizzaService<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> RestaurantPizzaService<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Validates the request and records the offering. Nothing is written
    /// unless every check passes.
    pub fn create(
        &mut self,
        request: &CreateRestaurantPizzaRequest,
    ) -> Result<CreatedRestaurantPizza, ApiError> {
        let new = request.validate()?;

        // A deferred transaction that reads first gets SQLITE_BUSY on upgrade
        // without honouring busy_timeout; take the write lock up front.
        let created = self.conn.immediate_transaction::<_, ApiError, _>(|conn| {
            let pizza = store::find_pizza(conn, new.pizza_id).map_err(|e| match e {
                StoreError::NotFound { id, .. } => {
                    ApiError::from(ValidationError::UnknownPizza(id))
                }
                e => ApiError::from(e),
            })?;
            let restaurant =
                store::find_restaurant(conn, new.restaurant_id).map_err(|e| match e {
                    StoreError::NotFound { id, .. } => {
                        ApiError::from(ValidationError::UnknownRestaurant(id))
                    }
                    e => ApiError::from(e),
                })?;

            let restaurant_pizza = store::insert_restaurant_pizza(conn, &new)?;

            Ok(CreatedRestaurantPizza {
                restaurant_pizza,
                restaurant,
                pizza,
            })
        })?;

        info!(
            id = created.restaurant_pizza.id,
            restaurant_id = created.restaurant.id,
            pizza_id = created.pizza.id,
            price = created.restaurant_pizza.price,
            "created restaurant pizza"
        );
        Ok(created)
    }
}
