use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantSummary {
    /// Restaurant id
    pub id: i32,
    /// Restaurant name
    pub name: String,
    /// Street address
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct PizzaSummary {
    /// Pizza id
    pub id: i32,
    /// Pizza name
    pub name: String,
    /// Comma separated ingredient list
    pub ingredients: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantPizzaView {
    /// Association id
    pub id: i32,
    /// Price between 1 and 30
    pub price: f64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: PizzaSummary,
    /// Omitted when the association is nested under its own restaurant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantSummary>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RestaurantDetail {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Pizzas offered by this restaurant
    pub restaurant_pizzas: Vec<RestaurantPizzaView>,
}

pub fn serialize_restaurant(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &models::Pizza) -> PizzaSummary {
    PizzaSummary {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

/// `restaurant` is expanded only when given, so an association listed under
/// its restaurant never points back at it.
pub fn serialize_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: Option<&models::Restaurant>,
) -> RestaurantPizzaView {
    RestaurantPizzaView {
        id: restaurant_pizza.id,
        price: restaurant_pizza.price,
        pizza_id: restaurant_pizza.pizza_id,
        restaurant_id: restaurant_pizza.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: restaurant.map(serialize_restaurant),
    }
}

pub fn serialize_restaurant_detail(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetail {
    RestaurantDetail {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| serialize_restaurant_pizza(rp, pizza, None))
            .collect(),
    }
}
