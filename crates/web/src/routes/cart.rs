//! Cart pricing and order routes.
//!
//! The client owns the cart; the server prices it on request and records it
//! when submitted.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::cart::{LoadCartRequest, LoadedCart, OrderView, SubmitOrderRequest};
use crate::services::OrderService;
use crate::state::AppState;

/// `POST /cart/load` - price a cart. No user needed.
#[instrument(skip(state, body))]
pub async fn load(
    State(state): State<AppState>,
    Json(body): Json<LoadCartRequest>,
) -> Result<Json<LoadedCart>> {
    let cart = OrderService::new(state.pool(), state.recipes())
        .load_cart(&body.cart)
        .await?;
    Ok(Json(cart))
}

/// `POST /cart/submit` - record an order under the next order number.
///
/// Responds with the order in the same shape `GET /cart/history` uses.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<SubmitOrderRequest>,
) -> Result<(StatusCode, Json<OrderView>)> {
    let order = OrderService::new(state.pool(), state.recipes())
        .submit(user.id, &body.order)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /cart/history` - the user's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderService::new(state.pool(), state.recipes())
        .history(user.id)
        .await?;
    Ok(Json(orders))
}
