//! Checkout and order endpoints.
//!
//! Checkout is a four step flow keyed by the order code:
//!   1. start: the order is created and stock reserved
//!   2. contact details
//!   3. shipping and billing addresses
//!   4. payment method, then payment (or the gateway webhook)
//!
//! All steps are fenced by the reservation windows; expired orders are
//! purged by the cleanup task and their stock returned.

use actix_web::{HttpRequest, Responder, Result as ActixResult, web};
use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::api::constants;
use crate::api::identity::{AuthUser, MaybeUser};
use crate::config::get_config;
use crate::errors::StoreError;
use crate::notify;
use crate::storage::SeaOrmStorage;
use crate::storage::models::{
    CartOwner, ContactDetails, NewOrderItem, ShippingDetails,
};
use crate::utils::signature::verify_webhook_signature;

use super::helpers::{error_from_store, success_response};
use super::types::{PaymentMethodRequest, PaymentResult, StartCheckoutRequest, WebhookEvent};

/// Step 1: create the order. Items come from the request body, or from the
/// caller's cart when the body lists none (the cart is then emptied).
pub async fn start_checkout(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    user: MaybeUser,
    body: web::Json<StartCheckoutRequest>,
) -> ActixResult<impl Responder> {
    let user_id = user.0.as_ref().map(|u| u.id);

    let (items, cart_to_clear): (Vec<NewOrderItem>, Option<CartOwner>) = if body.items.is_empty() {
        let owner = match user_id {
            Some(id) => CartOwner::User(id),
            None => match req.cookie(constants::CART_SESSION_COOKIE_NAME) {
                Some(cookie) => CartOwner::Session(cookie.value().to_string()),
                None => {
                    return Ok(error_from_store(&StoreError::validation(
                        "cart is empty and no items were given",
                    )));
                }
            },
        };
        let cart = storage.get_cart_view(&owner).await?;
        let items = cart
            .lines
            .iter()
            .map(|l| NewOrderItem {
                shoe_id: l.shoe_id,
                size: l.size,
                quantity: l.quantity,
            })
            .collect();
        (items, Some(owner))
    } else {
        (body.items.clone(), None)
    };

    let order = storage.create_order(user_id, &items).await?;

    if let Some(owner) = cart_to_clear {
        if let Err(e) = storage.clear_cart(&owner).await {
            warn!(code = %order.code, "failed to clear cart after checkout: {}", e);
        }
    }

    Ok(success_response(order))
}

/// Step 2: contact details.
pub async fn update_contact(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
    body: web::Json<ContactDetails>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    let order = storage
        .update_order_contact(&code, requester, &body)
        .await?;
    Ok(success_response(order))
}

/// Step 3: shipping and billing.
pub async fn update_shipping(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
    body: web::Json<ShippingDetails>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    let order = storage
        .update_order_shipping(&code, requester, &body)
        .await?;
    Ok(success_response(order))
}

/// Step 4a: choose the payment method.
pub async fn set_payment_method(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
    body: web::Json<PaymentMethodRequest>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    let order = storage
        .set_payment_method(&code, requester, &body.payment_method)
        .await?;
    Ok(success_response(order))
}

/// Step 4b: settle the order through the mock gateway.
///
/// Cash on delivery confirms with a `COD_` reference; card payments get a
/// `MOCK_` reference. Card orders can also be settled by the webhook.
pub async fn pay(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    let order = storage.order_view_for(&code, requester).await?;

    if order.paid {
        return Ok(error_from_store(&StoreError::conflict(
            "order is already paid",
        )));
    }
    if order.payment_method.is_empty() {
        return Ok(error_from_store(&StoreError::validation(
            "payment method not selected",
        )));
    }

    let config = get_config();
    let window_minutes =
        config.checkout.form_window_minutes + config.checkout.payment_window_minutes;
    let deadline = order.created_at + Duration::minutes(window_minutes as i64);
    if Utc::now() > deadline {
        return Ok(error_from_store(&StoreError::window_expired(
            "payment window for this order has expired",
        )));
    }

    let payment_reference = match order.payment_method.as_str() {
        "cash_on_delivery" => format!("COD_{}", order.code),
        _ => format!("MOCK_{}_{}", order.code, Utc::now().timestamp()),
    };

    storage.mark_order_paid(&code).await?;
    let order = storage.order_view(&code).await?;
    notify::order_confirmation(&order);

    Ok(success_response(PaymentResult {
        order_code: order.code,
        payment_reference,
        paid: true,
    }))
}

/// Gateway webhook. The raw body is signature-checked before parsing and
/// the paid flag is set idempotently, so redeliveries are harmless.
pub async fn payment_webhook(
    storage: web::Data<SeaOrmStorage>,
    req: HttpRequest,
    body: web::Bytes,
) -> ActixResult<impl Responder> {
    let config = get_config();
    if config.api.webhook_secret.is_empty() {
        return Ok(error_from_store(&StoreError::payment_signature(
            "webhook secret not configured",
        )));
    }

    let Some(sig_header) = req
        .headers()
        .get(constants::WEBHOOK_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
    else {
        return Ok(error_from_store(&StoreError::payment_signature(
            "missing signature header",
        )));
    };

    let payload = match std::str::from_utf8(&body) {
        Ok(payload) => payload,
        Err(_) => {
            return Ok(error_from_store(&StoreError::validation(
                "webhook body is not valid UTF-8",
            )));
        }
    };

    if let Err(e) = verify_webhook_signature(payload, sig_header, &config.api.webhook_secret) {
        return Ok(error_from_store(&e));
    }

    let event: WebhookEvent = match serde_json::from_str(payload) {
        Ok(event) => event,
        Err(e) => {
            return Ok(error_from_store(&StoreError::validation(format!(
                "invalid webhook body: {}",
                e
            ))));
        }
    };

    if event.event != "payment_succeeded" {
        info!(event = %event.event, "ignoring webhook event");
        return Ok(success_response(serde_json::json!({ "handled": false })));
    }

    let newly_paid = storage.mark_order_paid(&event.order_code).await?;
    if newly_paid {
        let order = storage.order_view(&event.order_code).await?;
        notify::order_confirmation(&order);
    }

    Ok(success_response(
        serde_json::json!({ "handled": true, "already_paid": !newly_paid }),
    ))
}

/// Order lookup by code. Guest orders are addressable by code alone;
/// customer orders only by their owner.
pub async fn get_order(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    let order = storage.order_view_for(&code, requester).await?;
    Ok(success_response(order))
}

/// Abandon an unpaid order, returning its stock immediately.
pub async fn cancel_order(
    storage: web::Data<SeaOrmStorage>,
    user: MaybeUser,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let code = path.into_inner();
    let requester = user.0.map(|u| u.id);
    storage.cancel_order(&code, requester).await?;
    Ok(success_response(serde_json::json!({ "cancelled": true })))
}

/// The caller's paid order history.
pub async fn list_my_orders(
    storage: web::Data<SeaOrmStorage>,
    user: AuthUser,
) -> ActixResult<impl Responder> {
    let orders = storage.list_orders_for_user(user.id).await?;
    Ok(success_response(orders))
}
