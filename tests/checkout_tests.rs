//! Checkout flow tests: stock reservation, the four step order pipeline,
//! payment flags, cancellation and expired-order cleanup.

use std::sync::Once;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tempfile::TempDir;

use calzados_marilo::config::init_config;
use calzados_marilo::errors::StoreError;
use calzados_marilo::storage::SeaOrmStorage;
use calzados_marilo::storage::models::{
    ContactDetails, NewOrderItem, OrderFilter, RegisterInput, ShippingDetails,
};
use migration::entities::{brand, order, shoe, shoe_size};

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

async fn insert_shoe(
    db: &DatabaseConnection,
    name: &str,
    price: i32,
    offer_price: Option<i32>,
) -> i64 {
    let now = Utc::now();
    let brand_id = brand::ActiveModel {
        name: Set(format!("{} brand", name)),
        image_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("brand insert")
    .id;

    shoe::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        price: Set(price),
        offer_price: Set(offer_price),
        gender: Set("Unisex".to_string()),
        color: Set("Negro".to_string()),
        material: Set("Cuero".to_string()),
        is_available: Set(true),
        is_featured: Set(false),
        brand_id: Set(brand_id),
        category_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("shoe insert")
    .id
}

async fn insert_size(db: &DatabaseConnection, shoe_id: i64, size: i32, stock: i32) {
    let now = Utc::now();
    shoe_size::ActiveModel {
        shoe_id: Set(shoe_id),
        size: Set(size),
        stock: Set(stock),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("size insert");
}

async fn stock_of(db: &DatabaseConnection, shoe_id: i64, size: i32) -> i32 {
    shoe_size::Entity::find()
        .filter(shoe_size::Column::ShoeId.eq(shoe_id))
        .filter(shoe_size::Column::Size.eq(size))
        .one(db)
        .await
        .expect("query")
        .expect("size row")
        .stock
}

fn item(shoe_id: i64, size: i32, quantity: i32) -> NewOrderItem {
    NewOrderItem {
        shoe_id,
        size,
        quantity,
    }
}

fn contact() -> ContactDetails {
    ContactDetails {
        first_name: "Carlos".to_string(),
        last_name: "Perez".to_string(),
        email: "carlos.perez@example.com".to_string(),
        phone: "611223344".to_string(),
    }
}

fn shipping() -> ShippingDetails {
    ShippingDetails {
        shipping_address: "Calle Sol, 3".to_string(),
        shipping_city: "Sevilla".to_string(),
        shipping_postal_code: "41001".to_string(),
        billing_address: "Calle Sol, 3".to_string(),
        billing_city: "Sevilla".to_string(),
        billing_postal_code: "41001".to_string(),
    }
}

/// Age an order past every checkout window by rewriting its created_at.
async fn backdate_order(db: &DatabaseConnection, code: &str, minutes: i64) {
    let model = order::Entity::find()
        .filter(order::Column::Code.eq(code))
        .one(db)
        .await
        .expect("query")
        .expect("order");
    let mut active: order::ActiveModel = model.into();
    active.created_at = Set(Utc::now() - Duration::minutes(minutes));
    active.update(db).await.expect("backdate");
}

mod order_creation_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_order_reserves_stock_and_computes_totals() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Runner", 100, None).await;
        insert_size(db, shoe_id, 42, 5).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("create");

        assert_eq!(order.code.len(), 10);
        assert!(order.code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(order.status, "awaiting_shipment");
        assert!(!order.paid);

        // 21% tax on subtotal plus delivery, rounded to cents.
        assert_eq!(order.subtotal, dec!(100.00));
        assert_eq!(order.delivery_cost, dec!(4.99));
        assert_eq!(order.tax, dec!(22.05));
        assert_eq!(order.total, dec!(127.04));

        assert_eq!(stock_of(db, shoe_id, 42).await, 4);
    }

    #[tokio::test]
    async fn test_offer_price_drives_line_discount() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Rebajado", 100, Some(75)).await;
        insert_size(db, shoe_id, 40, 10).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 40, 2)])
            .await
            .expect("create");

        assert_eq!(order.subtotal, dec!(150.00));
        let line = &order.items[0];
        assert_eq!(line.unit_price, dec!(75));
        assert_eq!(line.discount, dec!(50));
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let first = insert_shoe(db, "Primero", 80, None).await;
        insert_size(db, first, 41, 5).await;
        let second = insert_shoe(db, "Segundo", 80, None).await;
        insert_size(db, second, 41, 1).await;

        let result = storage
            .create_order(None, &[item(first, 41, 2), item(second, 41, 3)])
            .await;
        assert!(matches!(result, Err(StoreError::OutOfStock(_))));

        // The first line's decrement must have been rolled back.
        assert_eq!(stock_of(db, first, 41).await, 5);
        assert_eq!(stock_of(db, second, 41).await, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_checkouts_never_oversell() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "UltimoPar", 90, None).await;
        insert_size(db, shoe_id, 43, 1).await;

        let first = storage.clone();
        let second = storage.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { first.create_order(None, &[item(shoe_id, 43, 1)]).await }),
            tokio::spawn(async move { second.create_order(None, &[item(shoe_id, 43, 1)]).await }),
        );
        let results = [a.expect("task"), b.expect("task")];

        let won = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(won, 1, "only one checkout may claim the last unit");

        // No oversell: stock hit zero and a single order exists.
        assert_eq!(stock_of(db, shoe_id, 43).await, 0);
        let orders = order::Entity::find().all(db).await.expect("orders");
        assert_eq!(orders.len(), 1);
    }

    #[tokio::test]
    async fn test_create_order_rejects_missing_size() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "SinTalla", 60, None).await;
        insert_size(db, shoe_id, 42, 5).await;

        assert!(storage.create_order(None, &[item(shoe_id, 36, 1)]).await.is_err());
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_and_nonpositive() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Vacio", 60, None).await;
        insert_size(db, shoe_id, 42, 5).await;

        assert!(storage.create_order(None, &[]).await.is_err());
        assert!(storage.create_order(None, &[item(shoe_id, 42, 0)]).await.is_err());
    }
}

mod checkout_step_tests {
    use super::*;

    #[tokio::test]
    async fn test_full_checkout_pipeline() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Completo", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 43, 1)])
            .await
            .expect("create");
        let code = order.code.clone();

        let order = storage
            .update_order_contact(&code, None, &contact())
            .await
            .expect("contact");
        assert_eq!(order.email, "carlos.perez@example.com");

        let order = storage
            .update_order_shipping(&code, None, &shipping())
            .await
            .expect("shipping");
        assert_eq!(order.shipping_city, "Sevilla");

        let order = storage
            .set_payment_method(&code, None, "cash_on_delivery")
            .await
            .expect("method");
        assert_eq!(order.payment_method, "cash_on_delivery");

        assert!(storage.mark_order_paid(&code).await.expect("pay"));
        // Redelivery is a no-op.
        assert!(!storage.mark_order_paid(&code).await.expect("repay"));
    }

    #[tokio::test]
    async fn test_payment_method_requires_earlier_steps() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Saltado", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 43, 1)])
            .await
            .expect("create");

        let result = storage.set_payment_method(&order.code, None, "card").await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_payment_method_rejected() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Metodo", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 43, 1)])
            .await
            .expect("create");
        storage
            .update_order_contact(&order.code, None, &contact())
            .await
            .expect("contact");
        storage
            .update_order_shipping(&order.code, None, &shipping())
            .await
            .expect("shipping");

        assert!(storage
            .set_payment_method(&order.code, None, "bitcoin")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_contact_after_window_expires() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Tarde", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 43, 1)])
            .await
            .expect("create");
        backdate_order(db, &order.code, 60).await;

        let result = storage.update_order_contact(&order.code, None, &contact()).await;
        assert!(matches!(result, Err(StoreError::WindowExpired(_))));
    }

    #[tokio::test]
    async fn test_contact_on_paid_order_conflicts() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Pagado", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 43, 1)])
            .await
            .expect("create");
        storage.mark_order_paid(&order.code).await.expect("pay");

        let result = storage.update_order_contact(&order.code, None, &contact()).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_owner_guard() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Privado", 90, None).await;
        insert_size(db, shoe_id, 43, 3).await;

        let owner = storage
            .create_customer(&RegisterInput {
                email: "owner@example.com".to_string(),
                password: "owner-password-1".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Lopez".to_string(),
                phone_number: String::new(),
                address: String::new(),
                city: String::new(),
                postal_code: String::new(),
            })
            .await
            .expect("customer");

        let order = storage
            .create_order(Some(owner.id), &[item(shoe_id, 43, 1)])
            .await
            .expect("create");

        // Anyone without the owning account is rejected.
        assert!(matches!(
            storage.order_view_for(&order.code, None).await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            storage.order_view_for(&order.code, Some(owner.id + 1)).await,
            Err(StoreError::Forbidden(_))
        ));
        assert!(storage.order_view_for(&order.code, Some(owner.id)).await.is_ok());
    }
}

mod cancellation_and_cleanup_tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_restores_stock() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Cancelado", 70, None).await;
        insert_size(db, shoe_id, 42, 5).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 42, 3)])
            .await
            .expect("create");
        assert_eq!(stock_of(db, shoe_id, 42).await, 2);

        storage.cancel_order(&order.code, None).await.expect("cancel");
        assert_eq!(stock_of(db, shoe_id, 42).await, 5);
        assert!(storage.order_view(&order.code).await.is_err());
    }

    #[tokio::test]
    async fn test_cancel_paid_order_fails() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Firme", 70, None).await;
        insert_size(db, shoe_id, 42, 5).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("create");
        storage.mark_order_paid(&order.code).await.expect("pay");

        assert!(matches!(
            storage.cancel_order(&order.code, None).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_cleanup_purges_only_expired_unpaid_orders() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Caducado", 70, None).await;
        insert_size(db, shoe_id, 42, 10).await;

        let fresh = storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("fresh");
        let expired = storage
            .create_order(None, &[item(shoe_id, 42, 2)])
            .await
            .expect("expired");
        let paid_old = storage
            .create_order(None, &[item(shoe_id, 42, 3)])
            .await
            .expect("paid");

        backdate_order(db, &expired.code, 120).await;
        backdate_order(db, &paid_old.code, 120).await;
        storage.mark_order_paid(&paid_old.code).await.expect("pay");

        let purged = storage.cleanup_expired_orders().await.expect("cleanup");
        assert_eq!(purged, 1);

        assert!(storage.order_view(&fresh.code).await.is_ok());
        assert!(storage.order_view(&expired.code).await.is_err());
        assert!(storage.order_view(&paid_old.code).await.is_ok());

        // Stock: 10 - 1 (fresh) - 3 (paid) after the expired 2 came back.
        assert_eq!(stock_of(db, shoe_id, 42).await, 6);
    }
}

mod order_listing_tests {
    use super::*;

    #[tokio::test]
    async fn test_history_lists_only_paid_orders() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Historial", 70, None).await;
        insert_size(db, shoe_id, 42, 10).await;

        let user = storage
            .create_customer(&RegisterInput {
                email: "history@example.com".to_string(),
                password: "history-pass-1".to_string(),
                first_name: "Sara".to_string(),
                last_name: "Ruiz".to_string(),
                phone_number: String::new(),
                address: String::new(),
                city: String::new(),
                postal_code: String::new(),
            })
            .await
            .expect("customer");

        let paid = storage
            .create_order(Some(user.id), &[item(shoe_id, 42, 1)])
            .await
            .expect("paid order");
        storage.mark_order_paid(&paid.code).await.expect("pay");
        storage
            .create_order(Some(user.id), &[item(shoe_id, 42, 1)])
            .await
            .expect("unpaid order");

        let history = storage.list_orders_for_user(user.id).await.expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].code, paid.code);
    }

    #[tokio::test]
    async fn test_staff_order_filter() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Filtro", 70, None).await;
        insert_size(db, shoe_id, 42, 10).await;

        let first = storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("first");
        storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("second");
        storage.mark_order_paid(&first.code).await.expect("pay");

        let filter = OrderFilter {
            paid: Some(true),
            ..Default::default()
        };
        let (items, total) = storage.list_orders(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].code, first.code);

        let filter = OrderFilter {
            search: Some(first.code.clone()),
            ..Default::default()
        };
        let (_, total) = storage.list_orders(&filter).await.expect("search");
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_status_updates_require_payment() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let shoe_id = insert_shoe(db, "Estado", 70, None).await;
        insert_size(db, shoe_id, 42, 10).await;

        let order = storage
            .create_order(None, &[item(shoe_id, 42, 1)])
            .await
            .expect("create");

        assert!(storage.update_order_status(&order.code, "in_transit").await.is_err());

        storage.mark_order_paid(&order.code).await.expect("pay");
        let updated = storage
            .update_order_status(&order.code, "in_transit")
            .await
            .expect("status");
        assert_eq!(updated.status, "in_transit");

        assert!(storage.update_order_status(&order.code, "teleported").await.is_err());
    }
}
