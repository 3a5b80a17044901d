//! Cart operations. A cart belongs to a user or to an anonymous session key.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

use super::SeaOrmStorage;
use crate::errors::{Result, StoreError};
use crate::pricing;
use crate::storage::models::{CartLine, CartOwner, CartView};

use migration::entities::{cart, cart_item, shoe, shoe_size};

impl SeaOrmStorage {
    /// Find the owner's cart, creating it on first use.
    pub async fn resolve_cart(&self, owner: &CartOwner) -> Result<cart::Model> {
        let existing = match owner {
            CartOwner::User(user_id) => {
                cart::Entity::find()
                    .filter(cart::Column::UserId.eq(*user_id))
                    .one(&self.db)
                    .await?
            }
            CartOwner::Session(key) => {
                cart::Entity::find()
                    .filter(cart::Column::SessionKey.eq(key.clone()))
                    .one(&self.db)
                    .await?
            }
        };

        if let Some(model) = existing {
            return Ok(model);
        }

        let now = Utc::now();
        let active = cart::ActiveModel {
            user_id: Set(match owner {
                CartOwner::User(user_id) => Some(*user_id),
                CartOwner::Session(_) => None,
            }),
            session_key: Set(match owner {
                CartOwner::User(_) => None,
                CartOwner::Session(key) => Some(key.clone()),
            }),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(active.insert(&self.db).await?)
    }

    /// Add a quantity of a shoe size to the cart. An existing line for the
    /// same shoe and size is topped up instead of duplicated. The combined
    /// quantity may not exceed the current stock.
    pub async fn add_cart_item(
        &self,
        owner: &CartOwner,
        shoe_id: i64,
        size: i32,
        quantity: i32,
    ) -> Result<CartView> {
        if quantity <= 0 {
            return Err(StoreError::validation("quantity must be positive"));
        }

        let shoe_model = shoe::Entity::find_by_id(shoe_id)
            .one(&self.db)
            .await?
            .filter(|m| m.is_available)
            .ok_or_else(|| StoreError::not_found(format!("shoe {} not found", shoe_id)))?;

        let size_row = shoe_size::Entity::find()
            .filter(shoe_size::Column::ShoeId.eq(shoe_id))
            .filter(shoe_size::Column::Size.eq(size))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                StoreError::validation(format!("size {} not offered for {}", size, shoe_model.name))
            })?;

        let cart_model = self.resolve_cart(owner).await?;

        let existing = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .filter(cart_item::Column::ShoeId.eq(shoe_id))
            .filter(cart_item::Column::Size.eq(size))
            .one(&self.db)
            .await?;

        let new_quantity = existing.as_ref().map_or(0, |i| i.quantity) + quantity;
        if new_quantity > size_row.stock {
            return Err(StoreError::out_of_stock(format!(
                "only {} units of {} in size {} available",
                size_row.stock, shoe_model.name, size
            )));
        }

        let now = Utc::now();
        match existing {
            Some(item) => {
                let mut active: cart_item::ActiveModel = item.into();
                active.quantity = Set(new_quantity);
                active.updated_at = Set(now);
                active.update(&self.db).await?;
            }
            None => {
                let active = cart_item::ActiveModel {
                    cart_id: Set(cart_model.id),
                    shoe_id: Set(shoe_id),
                    size: Set(size),
                    quantity: Set(quantity),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await?;
            }
        }

        self.get_cart_view(owner).await
    }

    /// Set the quantity of a cart line. Zero removes the line.
    pub async fn update_cart_item(
        &self,
        owner: &CartOwner,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartView> {
        if quantity < 0 {
            return Err(StoreError::validation("quantity cannot be negative"));
        }

        let cart_model = self.resolve_cart(owner).await?;
        let item = cart_item::Entity::find_by_id(item_id)
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("cart item {} not found", item_id)))?;

        if quantity == 0 {
            item.delete(&self.db).await?;
            return self.get_cart_view(owner).await;
        }

        let size_row = shoe_size::Entity::find()
            .filter(shoe_size::Column::ShoeId.eq(item.shoe_id))
            .filter(shoe_size::Column::Size.eq(item.size))
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::validation("size no longer offered"))?;

        if quantity > size_row.stock {
            return Err(StoreError::out_of_stock(format!(
                "only {} units available in size {}",
                size_row.stock, item.size
            )));
        }

        let mut active: cart_item::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        self.get_cart_view(owner).await
    }

    pub async fn remove_cart_item(&self, owner: &CartOwner, item_id: i64) -> Result<CartView> {
        let cart_model = self.resolve_cart(owner).await?;
        let item = cart_item::Entity::find_by_id(item_id)
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("cart item {} not found", item_id)))?;

        item.delete(&self.db).await?;
        self.get_cart_view(owner).await
    }

    pub async fn clear_cart(&self, owner: &CartOwner) -> Result<()> {
        let cart_model = self.resolve_cart(owner).await?;
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Cart contents with current prices and stock levels.
    pub async fn get_cart_view(&self, owner: &CartOwner) -> Result<CartView> {
        let cart_model = self.resolve_cart(owner).await?;

        let items = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_model.id))
            .order_by_desc(cart_item::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let shoe_ids: Vec<i64> = items.iter().map(|i| i.shoe_id).collect();
        let shoes: HashMap<i64, shoe::Model> = if shoe_ids.is_empty() {
            HashMap::new()
        } else {
            shoe::Entity::find()
                .filter(shoe::Column::Id.is_in(shoe_ids.clone()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        let stocks: HashMap<(i64, i32), i32> = if shoe_ids.is_empty() {
            HashMap::new()
        } else {
            shoe_size::Entity::find()
                .filter(shoe_size::Column::ShoeId.is_in(shoe_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|s| ((s.shoe_id, s.size), s.stock))
                .collect()
        };

        let mut lines = Vec::with_capacity(items.len());
        let mut subtotal = rust_decimal::Decimal::ZERO;
        let mut total_items = 0;

        for item in items {
            let Some(shoe_model) = shoes.get(&item.shoe_id) else {
                continue;
            };
            let unit = pricing::unit_price(shoe_model.price, shoe_model.offer_price);
            let line_total = pricing::line_total(
                shoe_model.price,
                shoe_model.offer_price,
                item.quantity,
            );
            subtotal += line_total;
            total_items += item.quantity;

            lines.push(CartLine {
                id: item.id,
                shoe_id: item.shoe_id,
                name: shoe_model.name.clone(),
                size: item.size,
                quantity: item.quantity,
                unit_price: unit,
                line_total,
                available_stock: stocks
                    .get(&(item.shoe_id, item.size))
                    .copied()
                    .unwrap_or(0),
            });
        }

        Ok(CartView {
            id: cart_model.id,
            lines,
            subtotal,
            total_items,
        })
    }
}
