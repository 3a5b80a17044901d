//! Order lifecycle: creation with stock reservation, checkout step updates,
//! payment marking, and expired-reservation cleanup.
//!
//! An order reserves stock the moment it is created. Until it is paid it can
//! be completed through the checkout steps; once its windows have lapsed the
//! cleanup pass deletes it and returns the stock.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::{info, warn};

use super::SeaOrmStorage;
use crate::config::get_config;
use crate::errors::{Result, StoreError};
use crate::pricing;
use crate::storage::models::{
    ContactDetails, NewOrderItem, OrderFilter, OrderLineView, OrderSummary, OrderView,
    ShippingDetails, is_valid_payment_method, is_valid_status,
};
use crate::utils::generate_order_code;

use migration::entities::{order, order_item, shoe, shoe_size};

const CODE_RETRIES: usize = 5;
const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

impl SeaOrmStorage {
    /// Create an unpaid order and atomically reserve stock for every line.
    /// The whole reservation runs in one transaction: if any line lacks
    /// stock, nothing is reserved.
    pub async fn create_order(
        &self,
        user_id: Option<i64>,
        items: &[NewOrderItem],
    ) -> Result<OrderView> {
        if items.is_empty() {
            return Err(StoreError::validation("order has no items"));
        }
        for item in items {
            if item.quantity <= 0 {
                return Err(StoreError::validation("quantity must be positive"));
            }
        }

        let config = get_config();
        let txn = self.db.begin().await?;

        let mut subtotal = rust_decimal::Decimal::ZERO;
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let shoe_model = shoe::Entity::find_by_id(item.shoe_id)
                .one(&txn)
                .await?
                .filter(|m| m.is_available)
                .ok_or_else(|| StoreError::not_found(format!("shoe {} not found", item.shoe_id)))?;

            let size_row = shoe_size::Entity::find()
                .filter(shoe_size::Column::ShoeId.eq(item.shoe_id))
                .filter(shoe_size::Column::Size.eq(item.size))
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    StoreError::validation(format!(
                        "size {} not offered for {}",
                        item.size, shoe_model.name
                    ))
                })?;

            if size_row.stock < item.quantity {
                return Err(StoreError::out_of_stock(format!(
                    "only {} units of {} in size {} available",
                    size_row.stock, shoe_model.name, item.size
                )));
            }

            // Conditional decrement: the WHERE clause re-checks stock so a
            // concurrent reservation of the same row cannot oversell.
            let reserved = shoe_size::Entity::update_many()
                .col_expr(
                    shoe_size::Column::Stock,
                    Expr::col(shoe_size::Column::Stock).sub(item.quantity),
                )
                .col_expr(shoe_size::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(shoe_size::Column::Id.eq(size_row.id))
                .filter(shoe_size::Column::Stock.gte(item.quantity))
                .exec(&txn)
                .await?;
            if reserved.rows_affected == 0 {
                return Err(StoreError::out_of_stock(format!(
                    "stock for {} in size {} was claimed by another order",
                    shoe_model.name, item.size
                )));
            }

            let unit = pricing::unit_price(shoe_model.price, shoe_model.offer_price);
            let total = pricing::line_total(shoe_model.price, shoe_model.offer_price, item.quantity);
            let discount =
                pricing::line_discount(shoe_model.price, shoe_model.offer_price, item.quantity);
            subtotal += total;

            lines.push((shoe_model, item.size, item.quantity, unit, total, discount));
        }

        let totals = pricing::order_totals(
            subtotal,
            config.checkout.tax_rate,
            config.checkout.delivery_cost,
        )?;

        // Order codes are random; retry a handful of times on collision.
        let mut code = generate_order_code();
        let mut attempts = 0;
        while order::Entity::find()
            .filter(order::Column::Code.eq(code.clone()))
            .one(&txn)
            .await?
            .is_some()
        {
            attempts += 1;
            if attempts >= CODE_RETRIES {
                return Err(StoreError::database_operation(
                    "could not generate a unique order code",
                ));
            }
            code = generate_order_code();
        }

        let now = Utc::now();
        let order_active = order::ActiveModel {
            code: Set(code.clone()),
            user_id: Set(user_id),
            status: Set("awaiting_shipment".to_string()),
            payment_method: Set(String::new()),
            paid: Set(false),
            subtotal: Set(totals.subtotal),
            tax: Set(totals.tax),
            delivery_cost: Set(totals.delivery_cost),
            total: Set(totals.total),
            first_name: Set(String::new()),
            last_name: Set(String::new()),
            email: Set(String::new()),
            phone: Set(String::new()),
            shipping_address: Set(String::new()),
            shipping_city: Set(String::new()),
            shipping_postal_code: Set(String::new()),
            billing_address: Set(String::new()),
            billing_city: Set(String::new()),
            billing_postal_code: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let order_model = order_active.insert(&txn).await?;

        for (shoe_model, size, quantity, unit, total, discount) in &lines {
            let item_active = order_item::ActiveModel {
                order_id: Set(order_model.id),
                shoe_id: Set(shoe_model.id),
                size: Set(*size),
                quantity: Set(*quantity),
                unit_price: Set(*unit),
                total: Set(*total),
                discount: Set(*discount),
                ..Default::default()
            };
            item_active.insert(&txn).await?;
        }

        txn.commit().await?;

        info!(code = %code, items = lines.len(), "order created, stock reserved");
        self.order_view(&code).await
    }

    async fn find_order(&self, code: &str) -> Result<order::Model> {
        order::Entity::find()
            .filter(order::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("order {} not found", code)))
    }

    /// Fetch an order, enforcing that a customer can only see their own
    /// orders. Anonymous orders are addressable by code alone.
    pub async fn find_order_for(&self, code: &str, requester: Option<i64>) -> Result<order::Model> {
        let model = self.find_order(code).await?;
        if let Some(owner) = model.user_id {
            if requester != Some(owner) {
                return Err(StoreError::forbidden("order belongs to another customer"));
            }
        }
        Ok(model)
    }

    pub async fn order_view(&self, code: &str) -> Result<OrderView> {
        let model = self.find_order(code).await?;
        self.build_order_view(model).await
    }

    pub async fn order_view_for(&self, code: &str, requester: Option<i64>) -> Result<OrderView> {
        let model = self.find_order_for(code, requester).await?;
        self.build_order_view(model).await
    }

    async fn build_order_view(&self, model: order::Model) -> Result<OrderView> {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(model.id))
            .all(&self.db)
            .await?;

        let shoe_ids: Vec<i64> = items.iter().map(|i| i.shoe_id).collect();
        let names: HashMap<i64, String> = if shoe_ids.is_empty() {
            HashMap::new()
        } else {
            shoe::Entity::find()
                .filter(shoe::Column::Id.is_in(shoe_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect()
        };

        let item_views = items
            .into_iter()
            .map(|i| OrderLineView {
                shoe_id: i.shoe_id,
                name: names.get(&i.shoe_id).cloned().unwrap_or_default(),
                size: i.size,
                quantity: i.quantity,
                unit_price: i.unit_price,
                total: i.total,
                discount: i.discount,
            })
            .collect();

        Ok(OrderView {
            code: model.code,
            status: model.status,
            payment_method: model.payment_method,
            paid: model.paid,
            subtotal: model.subtotal,
            tax: model.tax,
            delivery_cost: model.delivery_cost,
            total: model.total,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            shipping_address: model.shipping_address,
            shipping_city: model.shipping_city,
            shipping_postal_code: model.shipping_postal_code,
            billing_address: model.billing_address,
            billing_city: model.billing_city,
            billing_postal_code: model.billing_postal_code,
            items: item_views,
            created_at: model.created_at,
        })
    }

    fn guard_unpaid_within(model: &order::Model, window_minutes: u64) -> Result<()> {
        if model.paid {
            return Err(StoreError::conflict("order is already paid"));
        }
        let deadline = model.created_at + Duration::minutes(window_minutes as i64);
        if Utc::now() > deadline {
            return Err(StoreError::window_expired(
                "checkout window for this order has expired",
            ));
        }
        Ok(())
    }

    /// Step 2: contact details. Only while unpaid and inside the form window.
    pub async fn update_order_contact(
        &self,
        code: &str,
        requester: Option<i64>,
        contact: &ContactDetails,
    ) -> Result<OrderView> {
        let config = get_config();
        let model = self.find_order_for(code, requester).await?;
        Self::guard_unpaid_within(&model, config.checkout.form_window_minutes)?;

        if contact.first_name.trim().is_empty()
            || contact.last_name.trim().is_empty()
            || contact.email.trim().is_empty()
        {
            return Err(StoreError::validation("name and email are required"));
        }
        if !contact.email.contains('@') {
            return Err(StoreError::validation("invalid email address"));
        }

        let mut active: order::ActiveModel = model.into();
        active.first_name = Set(contact.first_name.trim().to_string());
        active.last_name = Set(contact.last_name.trim().to_string());
        active.email = Set(contact.email.trim().to_string());
        active.phone = Set(contact.phone.trim().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        self.build_order_view(model).await
    }

    /// Step 3: shipping and billing addresses.
    pub async fn update_order_shipping(
        &self,
        code: &str,
        requester: Option<i64>,
        shipping: &ShippingDetails,
    ) -> Result<OrderView> {
        let config = get_config();
        let model = self.find_order_for(code, requester).await?;
        Self::guard_unpaid_within(&model, config.checkout.form_window_minutes)?;

        if shipping.shipping_address.trim().is_empty()
            || shipping.shipping_city.trim().is_empty()
            || shipping.shipping_postal_code.trim().is_empty()
        {
            return Err(StoreError::validation("shipping address is incomplete"));
        }

        let mut active: order::ActiveModel = model.into();
        active.shipping_address = Set(shipping.shipping_address.trim().to_string());
        active.shipping_city = Set(shipping.shipping_city.trim().to_string());
        active.shipping_postal_code = Set(shipping.shipping_postal_code.trim().to_string());
        active.billing_address = Set(shipping.billing_address.trim().to_string());
        active.billing_city = Set(shipping.billing_city.trim().to_string());
        active.billing_postal_code = Set(shipping.billing_postal_code.trim().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        self.build_order_view(model).await
    }

    /// Step 4: choose the payment method. The payment window extends past
    /// the form window.
    pub async fn set_payment_method(
        &self,
        code: &str,
        requester: Option<i64>,
        method: &str,
    ) -> Result<OrderView> {
        if !is_valid_payment_method(method) {
            return Err(StoreError::validation(format!(
                "unknown payment method: {}",
                method
            )));
        }

        let config = get_config();
        let window =
            config.checkout.form_window_minutes + config.checkout.payment_window_minutes;
        let model = self.find_order_for(code, requester).await?;
        Self::guard_unpaid_within(&model, window)?;

        if model.email.is_empty() || model.shipping_address.is_empty() {
            return Err(StoreError::validation(
                "contact and shipping steps must be completed first",
            ));
        }

        let mut active: order::ActiveModel = model.into();
        active.payment_method = Set(method.to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        self.build_order_view(model).await
    }

    /// Mark an order paid. Idempotent: returns false when it already was.
    pub async fn mark_order_paid(&self, code: &str) -> Result<bool> {
        let model = self.find_order(code).await?;
        if model.paid {
            return Ok(false);
        }

        let mut active: order::ActiveModel = model.into();
        active.paid = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        info!(code = %code, "order marked as paid");
        Ok(true)
    }

    /// Delete an unpaid order and return its reserved stock.
    pub async fn cancel_order(&self, code: &str, requester: Option<i64>) -> Result<()> {
        let model = self.find_order_for(code, requester).await?;
        if model.paid {
            return Err(StoreError::conflict("paid orders cannot be cancelled"));
        }

        self.release_and_delete(model).await?;
        Ok(())
    }

    async fn release_and_delete(&self, model: order::Model) -> Result<()> {
        let txn = self.db.begin().await?;

        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(model.id))
            .all(&txn)
            .await?;

        for item in items {
            // In-place increment, safe against concurrent reservations.
            let restored = shoe_size::Entity::update_many()
                .col_expr(
                    shoe_size::Column::Stock,
                    Expr::col(shoe_size::Column::Stock).add(item.quantity),
                )
                .col_expr(shoe_size::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(shoe_size::Column::ShoeId.eq(item.shoe_id))
                .filter(shoe_size::Column::Size.eq(item.size))
                .exec(&txn)
                .await?;

            // The size row can be gone if the shoe was removed meanwhile.
            if restored.rows_affected == 0 {
                warn!(
                    shoe_id = item.shoe_id,
                    size = item.size,
                    "size row missing while restoring stock"
                );
            }
        }

        let code = model.code.clone();
        order::Entity::delete_by_id(model.id).exec(&txn).await?;
        txn.commit().await?;

        info!(code = %code, "order released, stock restored");
        Ok(())
    }

    /// Purge unpaid orders whose full reservation window has lapsed,
    /// restoring their stock. Returns the number of purged orders.
    pub async fn cleanup_expired_orders(&self) -> Result<u64> {
        let config = get_config();
        let window_minutes = config.checkout.form_window_minutes
            + config.checkout.payment_window_minutes
            + config.checkout.reservation_grace_minutes;
        let cutoff = Utc::now() - Duration::minutes(window_minutes as i64);

        let expired = order::Entity::find()
            .filter(order::Column::Paid.eq(false))
            .filter(order::Column::CreatedAt.lt(cutoff))
            .all(&self.db)
            .await?;

        let count = expired.len() as u64;
        for model in expired {
            self.release_and_delete(model).await?;
        }

        if count > 0 {
            info!(count, "expired order reservations cleaned up");
        }
        Ok(count)
    }

    /// Paid-order history for a customer, newest first.
    pub async fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<OrderSummary>> {
        let models = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .filter(order::Column::Paid.eq(true))
            .order_by_desc(order::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.summarize_orders(models).await
    }

    /// Management-side order listing with filters and pagination.
    pub async fn list_orders(&self, filter: &OrderFilter) -> Result<(Vec<OrderSummary>, u64)> {
        let mut condition = Condition::all();

        if let Some(ref status) = filter.status {
            if !status.is_empty() {
                condition = condition.add(order::Column::Status.eq(status.clone()));
            }
        }
        if let Some(paid) = filter.paid {
            condition = condition.add(order::Column::Paid.eq(paid));
        }
        if let Some(ref search) = filter.search {
            if !search.is_empty() {
                condition = condition.add(
                    Condition::any()
                        .add(order::Column::Code.contains(search))
                        .add(order::Column::Email.contains(search))
                        .add(order::Column::LastName.contains(search)),
                );
            }
        }

        let page = std::cmp::Ord::max(filter.page.unwrap_or(1), 1);
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let paginator = order::Entity::find()
            .filter(condition)
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page - 1).await?;
        let summaries = self.summarize_orders(models).await?;

        Ok((summaries, total))
    }

    async fn summarize_orders(&self, models: Vec<order::Model>) -> Result<Vec<OrderSummary>> {
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut counts: HashMap<i64, i32> = HashMap::new();
        if !ids.is_empty() {
            for item in order_item::Entity::find()
                .filter(order_item::Column::OrderId.is_in(ids))
                .all(&self.db)
                .await?
            {
                *counts.entry(item.order_id).or_insert(0) += item.quantity;
            }
        }

        Ok(models
            .into_iter()
            .map(|m| OrderSummary {
                item_count: counts.get(&m.id).copied().unwrap_or(0),
                code: m.code,
                status: m.status,
                payment_method: m.payment_method,
                paid: m.paid,
                total: m.total,
                created_at: m.created_at,
            })
            .collect())
    }

    /// Staff action: move an order along the fulfilment states.
    pub async fn update_order_status(&self, code: &str, status: &str) -> Result<OrderView> {
        if !is_valid_status(status) {
            return Err(StoreError::validation(format!(
                "unknown order status: {}",
                status
            )));
        }

        let model = self.find_order(code).await?;
        if !model.paid {
            return Err(StoreError::conflict("unpaid orders cannot change status"));
        }

        let mut active: order::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;

        self.build_order_view(model).await
    }
}
