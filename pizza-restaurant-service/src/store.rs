use diesel::{insert_into, prelude::*, result::Error::NotFound};

use crate::models::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza,
};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub fn list_restaurants(conn: &mut SqliteConnection) -> StoreResult<Vec<Restaurant>> {
    Ok(restaurants::table
        .select(Restaurant::as_select())
        .order(restaurants::id)
        .load(conn)?)
}

pub fn list_pizzas(conn: &mut SqliteConnection) -> StoreResult<Vec<Pizza>> {
    Ok(pizzas::table
        .select(Pizza::as_select())
        .order(pizzas::id)
        .load(conn)?)
}

pub fn find_restaurant(conn: &mut SqliteConnection, id: i32) -> StoreResult<Restaurant> {
    match restaurants::table
        .find(id)
        .select(Restaurant::as_select())
        .first(conn)
    {
        Ok(r) => Ok(r),
        Err(NotFound) => Err(StoreError::NotFound {
            entity: "Restaurant",
            id,
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn find_pizza(conn: &mut SqliteConnection, id: i32) -> StoreResult<Pizza> {
    match pizzas::table.find(id).select(Pizza::as_select()).first(conn) {
        Ok(p) => Ok(p),
        Err(NotFound) => Err(StoreError::NotFound { entity: "Pizza", id }),
        Err(e) => Err(e.into()),
    }
}

/// Loads the offerings of a restaurant together with the pizza each one refers to.
pub fn restaurant_pizzas_for(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> StoreResult<Vec<(RestaurantPizza, Pizza)>> {
    Ok(RestaurantPizza::belonging_to(restaurant)
        .inner_join(pizzas::table)
        .select((RestaurantPizza::as_select(), Pizza::as_select()))
        .order(restaurant_pizzas::id)
        .load(conn)?)
}

/// Deletes a restaurant and its offerings in one transaction. Returns the
/// number of offerings removed along with it.
pub fn delete_restaurant(conn: &mut SqliteConnection, id: i32) -> StoreResult<usize> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let removed = diesel::delete(restaurant_pizzas::table)
            .filter(restaurant_pizzas::restaurant_id.eq(id))
            .execute(conn)?;

        let deleted = diesel::delete(restaurants::table.find(id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "Restaurant",
                id,
            });
        }

        Ok(removed)
    })
}

pub fn insert_restaurant_pizza(
    conn: &mut SqliteConnection,
    new: &NewRestaurantPizza,
) -> StoreResult<RestaurantPizza> {
    Ok(insert_into(restaurant_pizzas::table)
        .values(new)
        .returning(RestaurantPizza::as_returning())
        .get_result(conn)?)
}

pub fn insert_restaurant(
    conn: &mut SqliteConnection,
    new: &NewRestaurant<'_>,
) -> StoreResult<Restaurant> {
    Ok(insert_into(restaurants::table)
        .values(new)
        .returning(Restaurant::as_returning())
        .get_result(conn)?)
}

pub fn insert_pizza(conn: &mut SqliteConnection, new: &NewPizza<'_>) -> StoreResult<Pizza> {
    Ok(insert_into(pizzas::table)
        .values(new)
        .returning(Pizza::as_returning())
        .get_result(conn)?)
}

/// Removes every row from the three tables, children first.
pub fn clear_all(conn: &mut SqliteConnection) -> StoreResult<()> {
    conn.transaction::<_, StoreError, _>(|conn| {
        diesel::delete(restaurant_pizzas::table).execute(conn)?;
        diesel::delete(restaurants::table).execute(conn)?;
        diesel::delete(pizzas::table).execute(conn)?;
        Ok(())
    })
}
