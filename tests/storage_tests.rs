//! Storage backend tests for catalog, carts and accounts, using temporary
//! SQLite databases.

use std::sync::Once;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tempfile::TempDir;

use calzados_marilo::config::init_config;
use calzados_marilo::storage::SeaOrmStorage;
use calzados_marilo::storage::backend::{connect_sqlite, infer_backend_from_url, run_migrations};
use calzados_marilo::storage::models::{
    CartOwner, CatalogFilter, CustomerFilter, CustomerUpdate, RegisterInput, StaffInput,
};
use migration::entities::{brand, category, customer_profile, shoe, shoe_size};

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

async fn insert_brand(db: &DatabaseConnection, name: &str) -> i64 {
    let now = Utc::now();
    brand::ActiveModel {
        name: Set(name.to_string()),
        image_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("brand insert")
    .id
}

async fn insert_category(db: &DatabaseConnection, name: &str) -> i64 {
    let now = Utc::now();
    category::ActiveModel {
        name: Set(name.to_string()),
        image_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("category insert")
    .id
}

#[allow(clippy::too_many_arguments)]
async fn insert_shoe(
    db: &DatabaseConnection,
    name: &str,
    price: i32,
    offer_price: Option<i32>,
    gender: &str,
    available: bool,
    brand_id: i64,
    category_id: Option<i64>,
) -> i64 {
    let now = Utc::now();
    shoe::ActiveModel {
        name: Set(name.to_string()),
        description: Set(format!("{} description", name)),
        price: Set(price),
        offer_price: Set(offer_price),
        gender: Set(gender.to_string()),
        color: Set("Negro".to_string()),
        material: Set("Cuero".to_string()),
        is_available: Set(available),
        is_featured: Set(false),
        brand_id: Set(brand_id),
        category_id: Set(category_id),
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

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_string(),
        password: "sturdy-password-1".to_string(),
        first_name: "Laura".to_string(),
        last_name: "Gomez".to_string(),
        phone_number: "612345678".to_string(),
        address: "Calle Mayor, 1".to_string(),
        city: "Madrid".to_string(),
        postal_code: "28001".to_string(),
    }
}

mod connection_tests {
    use super::*;

    #[test]
    fn test_infer_backend() {
        assert_eq!(
            infer_backend_from_url("sqlite://store.db").unwrap(),
            "sqlite"
        );
        assert_eq!(
            infer_backend_from_url("postgres://u:p@localhost:15432/shop").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("mysql://nope").is_err());
    }

    #[tokio::test]
    async fn test_connect_sqlite_and_migrate() {
        init_test_config();
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("fresh.db");
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

        let conn = connect_sqlite(&db_url).await.expect("connect");
        run_migrations(&conn).await.expect("migrations");
    }

    #[tokio::test]
    async fn test_storage_new_empty_url_fails() {
        init_test_config();
        let result = SeaOrmStorage::new("", "sqlite").await;
        assert!(result.is_err());
    }
}

mod catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_shoes_excludes_unavailable() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let brand_id = insert_brand(db, "Nike").await;
        insert_shoe(db, "Visible", 80, None, "Unisex", true, brand_id, None).await;
        insert_shoe(db, "Hidden", 80, None, "Unisex", false, brand_id, None).await;

        let (items, total) = storage
            .list_shoes(&CatalogFilter::default())
            .await
            .expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Visible");
    }

    #[tokio::test]
    async fn test_search_matches_brand_name_case_insensitive() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let nike = insert_brand(db, "Nike").await;
        let puma = insert_brand(db, "Puma").await;
        insert_shoe(db, "Air Runner", 90, None, "Unisex", true, nike, None).await;
        insert_shoe(db, "Street King", 60, None, "Unisex", true, puma, None).await;

        // Brand-name query in mixed case; neither shoe name contains it.
        let filter = CatalogFilter {
            search: Some("nIkE".to_string()),
            ..Default::default()
        };
        let (items, total) = storage.list_shoes(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Air Runner");

        // Shoe-name query, also mixed case.
        let filter = CatalogFilter {
            search: Some("STREET".to_string()),
            ..Default::default()
        };
        let (items, total) = storage.list_shoes(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Street King");
    }

    #[tokio::test]
    async fn test_list_shoes_filters_combine() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let nike = insert_brand(db, "Nike").await;
        let puma = insert_brand(db, "Puma").await;
        let sport = insert_category(db, "Deportivos").await;

        insert_shoe(db, "Runner Uno", 90, None, "Hombre", true, nike, Some(sport)).await;
        insert_shoe(db, "Runner Dos", 90, None, "Mujer", true, nike, Some(sport)).await;
        insert_shoe(db, "Street", 60, None, "Hombre", true, puma, None).await;

        let filter = CatalogFilter {
            brand_id: Some(nike),
            gender: Some("Hombre".to_string()),
            ..Default::default()
        };
        let (items, total) = storage.list_shoes(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].name, "Runner Uno");
    }

    #[tokio::test]
    async fn test_list_shoes_size_filter() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let brand_id = insert_brand(db, "Vans").await;
        let with_42 = insert_shoe(db, "Con 42", 70, None, "Unisex", true, brand_id, None).await;
        insert_shoe(db, "Sin 42", 70, None, "Unisex", true, brand_id, None).await;
        insert_size(db, with_42, 42, 5).await;

        let filter = CatalogFilter {
            size: Some(42),
            ..Default::default()
        };
        let (items, total) = storage.list_shoes(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].id, with_42);
    }

    #[tokio::test]
    async fn test_get_shoe_detail_with_sizes() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let brand_id = insert_brand(db, "Adidas").await;
        let cat_id = insert_category(db, "Casuales").await;
        let shoe_id =
            insert_shoe(db, "Stan Smith 1", 100, Some(75), "Unisex", true, brand_id, Some(cat_id))
                .await;
        insert_size(db, shoe_id, 40, 10).await;
        insert_size(db, shoe_id, 41, 3).await;

        let detail = storage.get_shoe(shoe_id).await.expect("detail");
        assert_eq!(detail.brand.name, "Adidas");
        assert_eq!(detail.category.as_ref().map(|c| c.name.as_str()), Some("Casuales"));
        assert_eq!(detail.offer_price, Some(75));
        assert_eq!(detail.sizes.len(), 2);
    }

    #[tokio::test]
    async fn test_get_shoe_unavailable_is_not_found() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let brand_id = insert_brand(db, "Fila").await;
        let shoe_id = insert_shoe(db, "Retired", 50, None, "Unisex", false, brand_id, None).await;

        assert!(storage.get_shoe(shoe_id).await.is_err());
    }
}

mod cart_tests {
    use super::*;

    async fn storage_with_shoe() -> (SeaOrmStorage, TempDir, i64) {
        let (storage, temp) = create_temp_storage().await;
        let db = storage.get_db();
        let brand_id = insert_brand(db, "Nike").await;
        let shoe_id = insert_shoe(db, "Air Max 1", 100, None, "Unisex", true, brand_id, None).await;
        insert_size(db, shoe_id, 42, 5).await;
        (storage, temp, shoe_id)
    }

    #[tokio::test]
    async fn test_add_and_top_up_cart_line() {
        let (storage, _temp, shoe_id) = storage_with_shoe().await;
        let owner = CartOwner::Session("sess-1".to_string());

        let view = storage.add_cart_item(&owner, shoe_id, 42, 2).await.expect("add");
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.total_items, 2);

        // Same shoe and size tops up the existing line.
        let view = storage.add_cart_item(&owner, shoe_id, 42, 1).await.expect("add");
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.total_items, 3);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_fails() {
        let (storage, _temp, shoe_id) = storage_with_shoe().await;
        let owner = CartOwner::Session("sess-2".to_string());

        storage.add_cart_item(&owner, shoe_id, 42, 4).await.expect("add");
        let result = storage.add_cart_item(&owner, shoe_id, 42, 2).await;
        assert!(result.is_err(), "combined quantity exceeds stock of 5");
    }

    #[tokio::test]
    async fn test_update_to_zero_removes_line() {
        let (storage, _temp, shoe_id) = storage_with_shoe().await;
        let owner = CartOwner::Session("sess-3".to_string());

        let view = storage.add_cart_item(&owner, shoe_id, 42, 2).await.expect("add");
        let item_id = view.lines[0].id;

        let view = storage.update_cart_item(&owner, item_id, 0).await.expect("update");
        assert!(view.lines.is_empty());
    }

    #[tokio::test]
    async fn test_user_and_session_carts_are_separate() {
        let (storage, _temp, shoe_id) = storage_with_shoe().await;

        let session = CartOwner::Session("sess-4".to_string());
        storage.add_cart_item(&session, shoe_id, 42, 1).await.expect("add");

        let user = storage
            .create_customer(&register_input("cart.user@example.com"))
            .await
            .expect("customer");
        let view = storage.get_cart_view(&CartOwner::User(user.id)).await.expect("view");
        assert!(view.lines.is_empty());
    }

    #[tokio::test]
    async fn test_clear_cart() {
        let (storage, _temp, shoe_id) = storage_with_shoe().await;
        let owner = CartOwner::Session("sess-5".to_string());

        storage.add_cart_item(&owner, shoe_id, 42, 2).await.expect("add");
        storage.clear_cart(&owner).await.expect("clear");

        let view = storage.get_cart_view(&owner).await.expect("view");
        assert!(view.lines.is_empty());
        assert_eq!(view.total_items, 0);
    }
}

mod account_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_login() {
        let (storage, _temp) = create_temp_storage().await;

        let user = storage
            .create_customer(&register_input("Laura.Gomez@Example.com"))
            .await
            .expect("register");
        // Emails are stored lowercase.
        assert_eq!(user.email, "laura.gomez@example.com");
        assert!(!user.is_staff);

        let logged_in = storage
            .verify_login("laura.gomez@example.com", "sturdy-password-1")
            .await
            .expect("login");
        assert_eq!(logged_in.id, user.id);

        assert!(storage
            .verify_login("laura.gomez@example.com", "wrong-password")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_register_commits_user_and_profile_together() {
        let (storage, _temp) = create_temp_storage().await;

        let user = storage
            .create_customer(&register_input("paired@example.com"))
            .await
            .expect("register");

        // The profile lands in the same transaction as the user row.
        let profile = customer_profile::Entity::find_by_id(user.id)
            .one(storage.get_db())
            .await
            .expect("query")
            .expect("profile row");
        assert_eq!(profile.user_id, user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails() {
        let (storage, _temp) = create_temp_storage().await;

        storage
            .create_customer(&register_input("dup@example.com"))
            .await
            .expect("first registration");
        assert!(storage
            .create_customer(&register_input("dup@example.com"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_register_short_password_fails() {
        let (storage, _temp) = create_temp_storage().await;

        let mut input = register_input("short@example.com");
        input.password = "short".to_string();
        assert!(storage.create_customer(&input).await.is_err());
    }

    #[tokio::test]
    async fn test_update_customer_partial() {
        let (storage, _temp) = create_temp_storage().await;

        let user = storage
            .create_customer(&register_input("update@example.com"))
            .await
            .expect("register");

        let update = CustomerUpdate {
            email: None,
            first_name: None,
            last_name: None,
            phone_number: Some("699999999".to_string()),
            address: None,
            city: Some("Valencia".to_string()),
            postal_code: None,
        };
        let view = storage.update_customer(user.id, &update).await.expect("update");
        assert_eq!(view.phone_number, "699999999");
        assert_eq!(view.city, "Valencia");
        // Untouched fields survive.
        assert_eq!(view.address, "Calle Mayor, 1");
        assert_eq!(view.first_name, "Laura");
    }

    #[tokio::test]
    async fn test_list_customers_search() {
        let (storage, _temp) = create_temp_storage().await;

        storage
            .create_customer(&register_input("ana.lopez@example.com"))
            .await
            .expect("register");
        storage
            .create_customer(&register_input("pedro.ruiz@example.com"))
            .await
            .expect("register");

        let filter = CustomerFilter {
            search: Some("ana".to_string()),
            ..Default::default()
        };
        let (items, total) = storage.list_customers(&filter).await.expect("list");
        assert_eq!(total, 1);
        assert_eq!(items[0].email, "ana.lopez@example.com");
    }

    #[tokio::test]
    async fn test_staff_lifecycle() {
        let (storage, _temp) = create_temp_storage().await;

        let input = StaffInput {
            email: "gerente@calzmarilo.es".to_string(),
            password: Some("manager-pass-1".to_string()),
            first_name: "Rosa".to_string(),
            last_name: "Diaz".to_string(),
            is_superuser: false,
        };
        let staff = storage.create_staff(&input).await.expect("create staff");

        let all = storage.list_staff().await.expect("list staff");
        assert_eq!(all.len(), 1);

        // Staff can log in with their password.
        let logged_in = storage
            .verify_login("gerente@calzmarilo.es", "manager-pass-1")
            .await
            .expect("staff login");
        assert!(logged_in.is_staff);

        storage.delete_user(staff.id).await.expect("delete");
        assert!(storage.list_staff().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_create_staff_without_password_fails() {
        let (storage, _temp) = create_temp_storage().await;

        let input = StaffInput {
            email: "nopass@calzmarilo.es".to_string(),
            password: None,
            first_name: "Rosa".to_string(),
            last_name: "Diaz".to_string(),
            is_superuser: false,
        };
        assert!(storage.create_staff(&input).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let (storage, _temp) = create_temp_storage().await;
        assert!(storage.delete_user(424242).await.is_err());
    }

    #[tokio::test]
    async fn test_ensure_admin_bootstrap_and_promote() {
        let (storage, _temp) = create_temp_storage().await;

        // Empty password skips bootstrap.
        storage.ensure_admin("admin@calzmarilo.es", "").await.expect("skip");
        assert!(storage
            .find_user_by_email("admin@calzmarilo.es")
            .await
            .expect("lookup")
            .is_none());

        storage
            .ensure_admin("admin@calzmarilo.es", "root-password-1")
            .await
            .expect("bootstrap");
        let admin = storage
            .find_user_by_email("admin@calzmarilo.es")
            .await
            .expect("lookup")
            .expect("admin exists");
        assert!(admin.is_staff);
        assert!(admin.is_superuser);

        // Running again with the same password changes nothing.
        storage
            .ensure_admin("admin@calzmarilo.es", "root-password-1")
            .await
            .expect("idempotent");
        storage
            .verify_login("admin@calzmarilo.es", "root-password-1")
            .await
            .expect("admin login");

        // A changed password is rehashed on the next start.
        storage
            .ensure_admin("admin@calzmarilo.es", "root-password-2")
            .await
            .expect("rotate");
        storage
            .verify_login("admin@calzmarilo.es", "root-password-2")
            .await
            .expect("rotated login");
        assert!(storage
            .verify_login("admin@calzmarilo.es", "root-password-1")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_dashboard_stats_counts() {
        let (storage, _temp) = create_temp_storage().await;
        let db = storage.get_db();

        let brand_id = insert_brand(db, "Nike").await;
        insert_shoe(db, "Counted", 60, None, "Unisex", true, brand_id, None).await;
        storage
            .create_customer(&register_input("stats@example.com"))
            .await
            .expect("customer");

        let stats = storage.dashboard_stats().await.expect("stats");
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.total_shoes, 1);
        assert_eq!(stats.total_orders, 0);
    }
}
