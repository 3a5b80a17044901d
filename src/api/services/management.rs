//! Staff-only management endpoints. All routes in this module sit behind
//! the StaffAuth middleware.

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::api::identity::AuthUser;
use crate::errors::StoreError;
use crate::notify;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{CustomerFilter, CustomerUpdate, OrderFilter, StaffInput};

use super::helpers::{api_result, error_from_store, success_response};
use super::types::{PaginatedResponse, StatusUpdateRequest};

pub async fn dashboard(storage: web::Data<SeaOrmStorage>) -> ActixResult<impl Responder> {
    Ok(api_result(storage.dashboard_stats().await))
}

pub async fn list_customers(
    storage: web::Data<SeaOrmStorage>,
    query: web::Query<CustomerFilter>,
) -> ActixResult<impl Responder> {
    let filter = query.into_inner();
    let page = filter.page.unwrap_or(1).max(1);
    let page_size = filter.page_size.unwrap_or(20);

    Ok(api_result(storage.list_customers(&filter).await.map(
        |(items, total)| PaginatedResponse {
            items,
            total,
            page,
            page_size,
        },
    )))
}

pub async fn get_customer(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    Ok(api_result(storage.customer_view(user_id).await))
}

pub async fn update_customer(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<i64>,
    body: web::Json<CustomerUpdate>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    Ok(api_result(storage.update_customer(user_id, &body).await))
}

pub async fn delete_customer(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    match storage.delete_user(user_id).await {
        Ok(()) => {
            info!(user_id, "customer deleted");
            Ok(success_response(serde_json::json!({ "deleted": true })))
        }
        Err(e) => Ok(error_from_store(&e)),
    }
}

pub async fn list_staff(storage: web::Data<SeaOrmStorage>) -> ActixResult<impl Responder> {
    Ok(api_result(storage.list_staff().await))
}

pub async fn create_staff(
    storage: web::Data<SeaOrmStorage>,
    body: web::Json<StaffInput>,
) -> ActixResult<impl Responder> {
    match storage.create_staff(&body).await {
        Ok(view) => {
            info!(email = %view.email, "staff account created");
            Ok(success_response(view))
        }
        Err(e) => Ok(error_from_store(&e)),
    }
}

pub async fn update_staff(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<i64>,
    body: web::Json<StaffInput>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    Ok(api_result(storage.update_staff(user_id, &body).await))
}

/// Staff may delete other staff accounts, never their own.
pub async fn delete_staff(
    storage: web::Data<SeaOrmStorage>,
    user: AuthUser,
    path: web::Path<i64>,
) -> ActixResult<impl Responder> {
    let user_id = path.into_inner();
    if user_id == user.id {
        return Ok(error_from_store(&StoreError::forbidden(
            "cannot delete your own account",
        )));
    }

    match storage.delete_user(user_id).await {
        Ok(()) => {
            info!(user_id, deleted_by = user.id, "staff account deleted");
            Ok(success_response(serde_json::json!({ "deleted": true })))
        }
        Err(e) => Ok(error_from_store(&e)),
    }
}

pub async fn list_orders(
    storage: web::Data<SeaOrmStorage>,
    query: web::Query<OrderFilter>,
) -> ActixResult<impl Responder> {
    let filter = query.into_inner();
    let page = filter.page.unwrap_or(1).max(1);
    let page_size = filter.page_size.unwrap_or(20);

    Ok(api_result(storage.list_orders(&filter).await.map(
        |(items, total)| PaginatedResponse {
            items,
            total,
            page,
            page_size,
        },
    )))
}

pub async fn get_order(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    Ok(api_result(storage.order_view(&code).await))
}

/// Advance a paid order through the fulfilment states. The customer is
/// notified on every transition.
pub async fn update_order_status(
    storage: web::Data<SeaOrmStorage>,
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    match storage.update_order_status(&code, &body.status).await {
        Ok(order) => {
            notify::status_update(&order);
            Ok(success_response(order))
        }
        Err(e) => Ok(error_from_store(&e)),
    }
}
