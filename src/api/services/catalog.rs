//! Public catalog endpoints.

use actix_web::{Responder, Result as ActixResult, web};

use crate::api::identity::MaybeUser;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{CatalogFilter, NewOrderItem};

use super::helpers::{api_result, success_response};
use super::types::{AddCartItemRequest, PaginatedResponse};

const DEFAULT_PAGE_SIZE: u64 = 12;

pub async fn list_shoes(
    storage: web::Data<SeaOrmStorage>,
    query: web::Query<CatalogFilter>,
) -> ActixResult<impl Responder> {
    let filter = query.into_inner();
    let page = filter.page.unwrap_or(1).max(1);
    let page_size = filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    Ok(api_result(storage.list_shoes(&filter).await.map(
        |(items, total)| PaginatedResponse {
            items,
            total,
            page,
            page_size,
        },
    )))
}

pub async fn get_shoe(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let shoe_id = path.into_inner();
    Ok(api_result(storage.get_shoe(shoe_id).await))
}

pub async fn list_brands(storage: web::Data<SeaOrmStorage>) -> ActixResult<impl Responder> {
    Ok(api_result(storage.list_brands().await))
}

pub async fn list_categories(storage: web::Data<SeaOrmStorage>) -> ActixResult<impl Responder> {
    Ok(api_result(storage.list_categories().await))
}

/// Buy-now: skip the cart and open a checkout for a single shoe size.
pub async fn buy_now(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<i64>,
    body: web::Json<AddCartItemRequest>,
) -> ActixResult<impl Responder> {
    let shoe_id = path.into_inner();
    let items = [NewOrderItem {
        shoe_id,
        size: body.size,
        quantity: body.quantity,
    }];

    let user_id = user.0.map(|u| u.id);
    match storage.create_order(user_id, &items).await {
        Ok(order) => Ok(success_response(order)),
        Err(e) => Ok(super::helpers::error_from_store(&e)),
    }
}
