//! Customer listing, completion and recommendation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::analytics::filter_customers;
use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{Customer, MarketingAction, PartialCustomer};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive filter on id, state and policy type
    #[serde(default)]
    pub search: Option<String>,
}

/// GET /api/customers - List customers
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Customer>> {
    let term = query.search.unwrap_or_default();
    let customers: Vec<Customer> = state.with_customers(|customers| {
        filter_customers(customers, &term)
            .into_iter()
            .cloned()
            .collect()
    });
    Json(customers)
}

/// GET /api/customers/:id - Get one customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>> {
    state
        .get_customer(&id)
        .map(Json)
        .ok_or(Error::CustomerNotFound(id))
}

/// POST /api/customers - Complete a partial customer and add it
pub async fn add_customer(
    State(state): State<AppState>,
    Json(partial): Json<PartialCustomer>,
) -> Result<(StatusCode, Json<Customer>)> {
    let customer = state.pipeline().process_single_customer(&partial).await?;
    state.add_customer(customer.clone());
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers/:id/recommendations - Marketing recommendations
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MarketingAction>>> {
    let customer = state
        .get_customer(&id)
        .ok_or(Error::CustomerNotFound(id))?;
    let actions = state.pipeline().recommendations(&customer).await?;
    Ok(Json(actions))
}
