//! HTTP API integration tests using actix test services and temporary
//! SQLite databases.

use std::sync::Once;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::{Value, json};
use tempfile::TempDir;

use calzados_marilo::api::constants;
use calzados_marilo::api::jwt::get_jwt_service;
use calzados_marilo::api::routes::{api_routes, health_routes};
use calzados_marilo::config::init_config;
use calzados_marilo::storage::SeaOrmStorage;
use calzados_marilo::utils::signature::sign_webhook_payload;
use migration::entities::{brand, shoe, shoe_size};

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        // SAFETY: set before the config snapshot is taken and before any
        // other thread in this binary touches the environment.
        unsafe { std::env::set_var("WEBHOOK_SECRET", "test-webhook-secret") };
        init_config();
    });
}

async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

async fn seed_shoe(storage: &SeaOrmStorage) -> i64 {
    let db = storage.get_db();
    let now = Utc::now();

    let brand_id = brand::ActiveModel {
        name: Set("Nike".to_string()),
        image_path: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("brand")
    .id;

    let shoe_id = shoe::ActiveModel {
        name: Set("Air Max Test".to_string()),
        description: Set("Testing shoe".to_string()),
        price: Set(100),
        offer_price: Set(None),
        gender: Set("Unisex".to_string()),
        color: Set("Negro".to_string()),
        material: Set("Cuero".to_string()),
        is_available: Set(true),
        is_featured: Set(true),
        brand_id: Set(brand_id),
        category_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("shoe")
    .id;

    shoe_size::ActiveModel {
        shoe_id: Set(shoe_id),
        size: Set(42),
        stock: Set(5),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("size");

    shoe_id
}

macro_rules! test_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .service(api_routes())
                .service(health_routes()),
        )
        .await
    };
}

async fn body_json(resp: actix_web::dev::ServiceResponse) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[actix_rt::test]
async fn test_health_endpoint() {
    let (storage, _temp) = create_temp_storage().await;
    let app = test_app!(storage);

    let resp = TestRequest::get().uri("/health").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["backend"], "sqlite");
}

#[actix_rt::test]
async fn test_catalog_listing_and_detail() {
    let (storage, _temp) = create_temp_storage().await;
    let shoe_id = seed_shoe(&storage).await;
    let app = test_app!(storage);

    let resp = TestRequest::get()
        .uri("/api/catalog/shoes")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Air Max Test");

    let resp = TestRequest::get()
        .uri(&format!("/api/catalog/shoes/{}", shoe_id))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["sizes"][0]["size"], 42);

    let resp = TestRequest::get()
        .uri("/api/catalog/shoes/999999")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_cart_cookie_is_minted_and_reused() {
    let (storage, _temp) = create_temp_storage().await;
    let shoe_id = seed_shoe(&storage).await;
    let app = test_app!(storage);

    let resp = TestRequest::post()
        .uri("/api/cart/items")
        .set_json(json!({ "shoe_id": shoe_id, "size": 42, "quantity": 2 }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == constants::CART_SESSION_COOKIE_NAME)
        .expect("cart session cookie set")
        .into_owned();

    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_items"], 2);

    // Same cookie sees the same cart.
    let resp = TestRequest::get()
        .uri("/api/cart")
        .cookie(session_cookie)
        .send_request(&app)
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_items"], 2);

    // No cookie means an empty cart.
    let resp = TestRequest::get().uri("/api/cart").send_request(&app).await;
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_items"], 0);
}

#[actix_rt::test]
async fn test_register_login_and_profile() {
    let (storage, _temp) = create_temp_storage().await;
    let app = test_app!(storage);

    let resp = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "nuevo@example.com",
            "password": "long-enough-1",
            "first_name": "Marta",
            "last_name": "Sanz"
        }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let access_cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == constants::ACCESS_COOKIE_NAME)
        .expect("access cookie set")
        .into_owned();

    let resp = TestRequest::get()
        .uri("/api/auth/me")
        .cookie(access_cookie)
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["email"], "nuevo@example.com");

    // Without a token the profile is unreachable.
    let resp = TestRequest::get().uri("/api/auth/me").send_request(&app).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong password is rejected.
    let resp = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr("127.0.0.1:8080".parse().expect("peer addr"))
        .set_json(json!({ "email": "nuevo@example.com", "password": "incorrect-1" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_checkout_flow_over_http() {
    let (storage, _temp) = create_temp_storage().await;
    let shoe_id = seed_shoe(&storage).await;
    let app = test_app!(storage);

    let resp = TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({ "items": [{ "shoe_id": shoe_id, "size": 42, "quantity": 1 }] }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let code = body["data"]["code"].as_str().expect("order code").to_string();

    let resp = TestRequest::put()
        .uri(&format!("/api/orders/{}/contact", code))
        .set_json(json!({
            "first_name": "Carlos",
            "last_name": "Perez",
            "email": "carlos@example.com",
            "phone": "611000111"
        }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = TestRequest::put()
        .uri(&format!("/api/orders/{}/shipping", code))
        .set_json(json!({
            "shipping_address": "Calle Sol, 3",
            "shipping_city": "Sevilla",
            "shipping_postal_code": "41001",
            "billing_address": "Calle Sol, 3",
            "billing_city": "Sevilla",
            "billing_postal_code": "41001"
        }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Paying before a method is chosen fails.
    let resp = TestRequest::post()
        .uri(&format!("/api/orders/{}/pay", code))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = TestRequest::put()
        .uri(&format!("/api/orders/{}/payment-method", code))
        .set_json(json!({ "payment_method": "cash_on_delivery" }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = TestRequest::post()
        .uri(&format!("/api/orders/{}/pay", code))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["paid"], true);
    assert_eq!(
        body["data"]["payment_reference"],
        format!("COD_{}", code)
    );

    // Paying twice conflicts.
    let resp = TestRequest::post()
        .uri(&format!("/api/orders/{}/pay", code))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_webhook_signature_checks() {
    let (storage, _temp) = create_temp_storage().await;
    let shoe_id = seed_shoe(&storage).await;

    let order = storage
        .create_order(
            None,
            &[calzados_marilo::storage::models::NewOrderItem {
                shoe_id,
                size: 42,
                quantity: 1,
            }],
        )
        .await
        .expect("order");

    let app = test_app!(storage);
    let secret = &calzados_marilo::config::get_config().api.webhook_secret;
    let payload = json!({ "order_code": order.code, "event": "payment_succeeded" }).to_string();

    // Missing signature header.
    let resp = TestRequest::post()
        .uri("/api/orders/webhook")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(payload.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Garbage signature.
    let resp = TestRequest::post()
        .uri("/api/orders/webhook")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((constants::WEBHOOK_SIGNATURE_HEADER, "t=1,v1=deadbeef"))
        .set_payload(payload.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A correctly signed event settles the order.
    let header = sign_webhook_payload(&payload, secret, Utc::now().timestamp());
    let resp = TestRequest::post()
        .uri("/api/orders/webhook")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((constants::WEBHOOK_SIGNATURE_HEADER, header.as_str()))
        .set_payload(payload.clone())
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["handled"], true);
    assert_eq!(body["data"]["already_paid"], false);

    // Redelivery reports already paid.
    let header = sign_webhook_payload(&payload, secret, Utc::now().timestamp());
    let resp = TestRequest::post()
        .uri("/api/orders/webhook")
        .insert_header(("Content-Type", "application/json"))
        .insert_header((constants::WEBHOOK_SIGNATURE_HEADER, header.as_str()))
        .set_payload(payload)
        .send_request(&app)
        .await;
    let body = body_json(resp).await;
    assert_eq!(body["data"]["already_paid"], true);
}

#[actix_rt::test]
async fn test_management_requires_staff() {
    let (storage, _temp) = create_temp_storage().await;

    storage
        .ensure_admin("admin@calzmarilo.es", "root-password-1")
        .await
        .expect("admin");
    let admin = storage
        .find_user_by_email("admin@calzmarilo.es")
        .await
        .expect("lookup")
        .expect("admin exists");

    let customer = storage
        .create_customer(&calzados_marilo::storage::models::RegisterInput {
            email: "plain@example.com".to_string(),
            password: "plain-password-1".to_string(),
            first_name: "Luis".to_string(),
            last_name: "Mora".to_string(),
            phone_number: String::new(),
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
        })
        .await
        .expect("customer");

    let app = test_app!(storage);

    // Anonymous is rejected.
    let resp = TestRequest::get()
        .uri("/api/management/dashboard")
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A plain customer is rejected.
    let jwt = get_jwt_service();
    let customer_token = jwt
        .generate_access_token(customer.id, &customer.email, false)
        .expect("token");
    let resp = TestRequest::get()
        .uri("/api/management/dashboard")
        .insert_header(("Authorization", format!("Bearer {}", customer_token)))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Staff gets through.
    let staff_token = jwt
        .generate_access_token(admin.id, &admin.email, true)
        .expect("token");
    let resp = TestRequest::get()
        .uri("/api/management/dashboard")
        .insert_header(("Authorization", format!("Bearer {}", staff_token)))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["total_customers"], 1);
}

#[actix_rt::test]
async fn test_staff_cannot_delete_own_account() {
    let (storage, _temp) = create_temp_storage().await;

    storage
        .ensure_admin("admin@calzmarilo.es", "root-password-1")
        .await
        .expect("admin");
    let admin = storage
        .find_user_by_email("admin@calzmarilo.es")
        .await
        .expect("lookup")
        .expect("admin exists");

    let app = test_app!(storage);
    let token = get_jwt_service()
        .generate_access_token(admin.id, &admin.email, true)
        .expect("token");

    let resp = TestRequest::delete()
        .uri(&format!("/api/management/staff/{}", admin.id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
