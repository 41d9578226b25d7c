use diesel::prelude::*;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza};
use crate::store::{self, StoreError, StoreResult};

const RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (restaurant index, pizza index, price)
const OFFERINGS: [(usize, usize, f64); 3] = [(0, 0, 10.0), (0, 1, 12.5), (1, 2, 8.0)];

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub restaurants: usize,
    pub pizzas: usize,
    pub restaurant_pizzas: usize,
}

/// Replaces all data with the sample restaurants, pizzas and offerings.
pub fn run(conn: &mut SqliteConnection) -> StoreResult<SeedSummary> {
    let summary = conn.transaction::<_, StoreError, _>(|conn| {
        store::clear_all(conn)?;

        let restaurants = RESTAURANTS
            .iter()
            .map(|&(name, address)| {
                store::insert_restaurant(conn, &NewRestaurant { name, address })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let pizzas = PIZZAS
            .iter()
            .map(|&(name, ingredients)| {
                store::insert_pizza(conn, &NewPizza { name, ingredients })
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let offerings = OFFERINGS
            .iter()
            .map(|&(r, p, price)| {
                store::insert_restaurant_pizza(
                    conn,
                    &NewRestaurantPizza {
                        price,
                        pizza_id: pizzas[p].id,
                        restaurant_id: restaurants[r].id,
                    },
                )
            })
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(SeedSummary {
            restaurants: restaurants.len(),
            pizzas: pizzas.len(),
            restaurant_pizzas: offerings.len(),
        })
    })?;

    info!(
        restaurants = summary.restaurants,
        pizzas = summary.pizzas,
        restaurant_pizzas = summary.restaurant_pizzas,
        "seeded database"
    );
    Ok(summary)
}
