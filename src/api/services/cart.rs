//! Cart endpoints. Anonymous carts ride on a session cookie that is minted
//! on first use; logged-in customers get a cart keyed to their account.

use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};

use crate::api::constants;
use crate::api::identity::MaybeUser;
use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{CartOwner, CartView};
use crate::utils::generate_session_key;

use super::helpers::{CookieBuilder, error_from_store, success_response};
use super::types::{AddCartItemRequest, UpdateCartItemRequest};

/// Work out who owns the cart. Returns a fresh session key when an
/// anonymous caller has none yet; the response must then set the cookie.
fn cart_owner(req: &HttpRequest, user: &MaybeUser) -> (CartOwner, Option<String>) {
    if let Some(ref user) = user.0 {
        return (CartOwner::User(user.id), None);
    }

    match req.cookie(constants::CART_SESSION_COOKIE_NAME) {
        Some(cookie) => (CartOwner::Session(cookie.value().to_string()), None),
        None => {
            let key = generate_session_key();
            (CartOwner::Session(key.clone()), Some(key))
        }
    }
}

fn cart_response(result: Result<CartView>, new_session: Option<String>) -> HttpResponse {
    match result {
        Ok(view) => match new_session {
            Some(key) => {
                let cookie = CookieBuilder::from_config().build_cart_session_cookie(key);
                let mut response = success_response(view);
                if let Err(e) = response.add_cookie(&cookie) {
                    tracing::warn!("failed to attach cart session cookie: {}", e);
                }
                response
            }
            None => success_response(view),
        },
        Err(e) => error_from_store(&e),
    }
}

pub async fn get_cart(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
) -> ActixResult<impl Responder> {
    let (owner, new_session) = cart_owner(&req, &user);
    Ok(cart_response(
        storage.get_cart_view(&owner).await,
        new_session,
    ))
}

pub async fn add_item(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
    body: web::Json<AddCartItemRequest>,
) -> ActixResult<impl Responder> {
    let (owner, new_session) = cart_owner(&req, &user);
    Ok(cart_response(
        storage
            .add_cart_item(&owner, body.shoe_id, body.size, body.quantity)
            .await,
        new_session,
    ))
}

pub async fn update_item(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
    path: web::Path<i64>,
    body: web::Json<UpdateCartItemRequest>,
) -> ActixResult<impl Responder> {
    let (owner, new_session) = cart_owner(&req, &user);
    let item_id = path.into_inner();
    Ok(cart_response(
        storage.update_cart_item(&owner, item_id, body.quantity).await,
        new_session,
    ))
}

pub async fn remove_item(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let (owner, new_session) = cart_owner(&req, &user);
    let item_id = path.into_inner();
    Ok(cart_response(
        storage.remove_cart_item(&owner, item_id).await,
        new_session,
    ))
}

pub async fn clear(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
) -> ActixResult<impl Responder> {
    let (owner, new_session) = cart_owner(&req, &user);
    match storage.clear_cart(&owner).await {
        Ok(()) => Ok(cart_response(
            storage.get_cart_view(&owner).await,
            new_session,
        )),
        Err(e) => Ok(error_from_store(&e)),
    }
}
