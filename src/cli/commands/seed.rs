//! Deterministic sample data for local development and demos.
//!
//! Reseeding wipes catalog, cart and order data plus every non-superuser
//! account, then rebuilds the same dataset from a fixed RNG seed.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngExt, SeedableRng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use migration::entities::{
    brand, cart, cart_item, category, customer_profile, order, order_item, shoe, shoe_image,
    shoe_size, user,
};

use super::super::CliError;
use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::utils::password::hash_password;

const RNG_SEED: u64 = 42;
const NUM_SHOES: usize = 100;
const NUM_CUSTOMERS: usize = 20;
const NUM_STAFF: usize = 10;
const SEED_PASSWORD: &str = "example123*";

pub async fn seed_database(storage: &SeaOrmStorage) -> std::result::Result<(), CliError> {
    let db = storage.get_db();

    println!("Seeding database ({} backend)...", storage.backend_name());
    run(db).await.map_err(CliError::from)?;
    println!("Seeding complete");
    Ok(())
}

async fn run(db: &DatabaseConnection) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);

    clear(db).await?;

    let brand_ids = seed_brands(db).await?;
    let category_ids = seed_categories(db).await?;
    let shoe_ids = seed_shoes(db, &mut rng, &brand_ids, &category_ids).await?;
    seed_sizes(db, &mut rng, &shoe_ids).await?;
    seed_customers(db, &mut rng).await?;
    seed_staff(db, &mut rng).await?;

    Ok(())
}

/// Wipe everything the seeder owns. Superusers survive so the bootstrapped
/// admin keeps working after a reseed.
async fn clear(db: &DatabaseConnection) -> Result<()> {
    println!("  Clearing existing data...");

    order_item::Entity::delete_many().exec(db).await?;
    order::Entity::delete_many().exec(db).await?;
    cart_item::Entity::delete_many().exec(db).await?;
    cart::Entity::delete_many().exec(db).await?;
    shoe_size::Entity::delete_many().exec(db).await?;
    shoe_image::Entity::delete_many().exec(db).await?;
    shoe::Entity::delete_many().exec(db).await?;
    brand::Entity::delete_many().exec(db).await?;
    category::Entity::delete_many().exec(db).await?;
    customer_profile::Entity::delete_many().exec(db).await?;
    user::Entity::delete_many()
        .filter(user::Column::IsSuperuser.eq(false))
        .exec(db)
        .await?;

    Ok(())
}

async fn seed_brands(db: &DatabaseConnection) -> Result<Vec<i64>> {
    let names = [
        "Nike",
        "Adidas",
        "Puma",
        "Reebok",
        "New Balance",
        "Converse",
        "Vans",
        "Fila",
    ];

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let now = Utc::now();
        let model = brand::ActiveModel {
            name: Set(name.to_string()),
            image_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        ids.push(model.id);
    }

    println!("  Created {} brands", ids.len());
    Ok(ids)
}

async fn seed_categories(db: &DatabaseConnection) -> Result<Vec<i64>> {
    let names = [
        "Deportivos",
        "Casuales",
        "Formales",
        "Botas",
        "Sandalias",
        "Zapatillas Running",
    ];

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let now = Utc::now();
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            image_path: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        ids.push(model.id);
    }

    println!("  Created {} categories", ids.len());
    Ok(ids)
}

async fn seed_shoes(
    db: &DatabaseConnection,
    rng: &mut StdRng,
    brand_ids: &[i64],
    category_ids: &[i64],
) -> Result<Vec<i64>> {
    let templates = [
        ("Air Max Runner", "Zapatilla deportiva con tecnologia Air Max"),
        ("Ultraboost 22", "Zapatilla de running con amortiguacion Boost"),
        ("Suede Classic", "Zapatilla casual iconica de gamuza"),
        ("Classic Leather", "Zapatilla clasica de cuero"),
        ("574 Core", "Zapatilla retro con comodidad moderna"),
        ("Chuck Taylor All Star", "Zapatilla clasica de lona alta"),
        ("Old Skool", "Zapatilla skate clasica con franja lateral"),
        ("Disruptor II", "Zapatilla chunky con estilo retro"),
        ("Court Vision Low", "Zapatilla de baloncesto inspirada en los 80s"),
        ("Stan Smith", "Zapatilla de tenis iconica minimalista"),
    ];
    let colors = [
        "Negro", "Blanco", "Azul", "Rojo", "Verde", "Gris", "Marron", "Rosa", "Amarillo",
        "Naranja",
    ];
    let materials = ["Cuero", "Sintetico", "Lona", "Gamuza", "Malla", "Textil"];
    let genders = ["Hombre", "Mujer", "Nino", "Nina", "Unisex"];

    let mut ids = Vec::with_capacity(NUM_SHOES);
    for i in 0..NUM_SHOES {
        let (base_name, base_description) = templates[i % templates.len()];
        let price: i32 = rng.random_range(40..=200);
        let offer_price = if price > 50 && rng.random_bool(0.5) {
            Some(rng.random_range(30..=price - 10))
        } else {
            None
        };

        let now = Utc::now();
        let model = shoe::ActiveModel {
            name: Set(format!("{} {}", base_name, i + 1)),
            description: Set(format!("{} - Modelo {}", base_description, i + 1)),
            price: Set(price),
            offer_price: Set(offer_price),
            gender: Set(genders.choose(rng).copied().unwrap_or("Unisex").to_string()),
            color: Set(colors.choose(rng).copied().unwrap_or("Negro").to_string()),
            material: Set(materials.choose(rng).copied().unwrap_or("Cuero").to_string()),
            // 20% of the catalog is unavailable on purpose
            is_available: Set(rng.random_bool(0.8)),
            is_featured: Set(rng.random_bool(0.5)),
            brand_id: Set(brand_ids.choose(rng).copied().unwrap_or(brand_ids[0])),
            category_id: Set(category_ids.choose(rng).copied()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
        ids.push(model.id);
    }

    println!("  Created {} shoes", ids.len());
    Ok(ids)
}

async fn seed_sizes(db: &DatabaseConnection, rng: &mut StdRng, shoe_ids: &[i64]) -> Result<()> {
    let available_sizes = [36, 37, 38, 39, 40, 41, 42, 43, 44, 45];
    let mut count = 0usize;

    for &shoe_id in shoe_ids {
        // 20% of shoes carry no stock at all
        if rng.random_bool(0.2) {
            continue;
        }

        let num_sizes = rng.random_range(5..=8);
        let sizes: Vec<i32> = available_sizes
            .choose_multiple(rng, num_sizes)
            .copied()
            .collect();

        for size in sizes {
            let now = Utc::now();
            shoe_size::ActiveModel {
                shoe_id: Set(shoe_id),
                size: Set(size),
                stock: Set(rng.random_range(5..=25)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            count += 1;
        }
    }

    println!("  Created {} size entries", count);
    Ok(())
}

async fn seed_customers(db: &DatabaseConnection, rng: &mut StdRng) -> Result<()> {
    let male_names = [
        "Carlos", "Javier", "Miguel", "David", "Antonio", "Jose", "Francisco", "Manuel",
        "Daniel", "Alejandro", "Pablo", "Pedro", "Luis", "Sergio", "Fernando",
    ];
    let female_names = [
        "Maria", "Carmen", "Ana", "Isabel", "Laura", "Marta", "Elena", "Sara", "Lucia",
        "Paula", "Cristina", "Patricia", "Raquel", "Beatriz", "Silvia",
    ];
    let last_names = [
        "Garcia", "Fernandez", "Gonzalez", "Rodriguez", "Lopez", "Martinez", "Sanchez",
        "Perez", "Gomez", "Martin", "Jimenez", "Ruiz", "Hernandez", "Diaz", "Moreno",
        "Alvarez", "Munoz", "Romero", "Alonso", "Gutierrez", "Navarro", "Torres",
        "Dominguez", "Vazquez", "Ramos",
    ];
    let cities = [
        ("Madrid", "28"),
        ("Barcelona", "08"),
        ("Valencia", "46"),
        ("Sevilla", "41"),
        ("Zaragoza", "50"),
        ("Malaga", "29"),
        ("Murcia", "30"),
        ("Palma", "07"),
        ("Bilbao", "48"),
        ("Alicante", "03"),
        ("Cordoba", "14"),
        ("Valladolid", "47"),
        ("Granada", "18"),
        ("Salamanca", "37"),
        ("Toledo", "45"),
    ];
    let street_types = ["Calle", "Avenida", "Plaza", "Paseo", "Travesia"];
    let street_names = [
        "Mayor",
        "Real",
        "Sol",
        "Libertad",
        "Constitucion",
        "Espana",
        "Victoria",
        "Colon",
        "Paz",
        "San Jose",
        "Santa Maria",
        "del Carmen",
        "Gran Via",
        "Reyes Catolicos",
        "Cervantes",
    ];

    let password_hash = hash_password(SEED_PASSWORD)?;

    for i in 0..NUM_CUSTOMERS {
        let first_name = if i % 2 == 0 {
            male_names.choose(rng).copied().unwrap_or("Carlos")
        } else {
            female_names.choose(rng).copied().unwrap_or("Maria")
        };
        let last_name1 = last_names.choose(rng).copied().unwrap_or("Garcia");
        let last_name2 = last_names.choose(rng).copied().unwrap_or("Lopez");

        let email = format!(
            "{}.{}{}@example.com",
            first_name.to_lowercase(),
            last_name1.to_lowercase(),
            i + 1
        );

        let now = Utc::now();
        let account = user::ActiveModel {
            email: Set(email),
            password_hash: Set(password_hash.clone()),
            first_name: Set(first_name.to_string()),
            last_name: Set(format!("{} {}", last_name1, last_name2)),
            is_staff: Set(false),
            is_superuser: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let (city, postal_prefix) = cities.choose(rng).copied().unwrap_or(("Madrid", "28"));
        let postal_code = format!("{}{:03}", postal_prefix, rng.random_range(100..=999));

        let street_type = street_types.choose(rng).copied().unwrap_or("Calle");
        let street_name = street_names.choose(rng).copied().unwrap_or("Mayor");
        let street_number: i32 = rng.random_range(1..=150);
        let mut address = format!("{} {}, {}", street_type, street_name, street_number);
        if rng.random_bool(0.7) {
            let floor: i32 = rng.random_range(1..=8);
            let door = ["A", "B", "C", "D"].choose(rng).copied().unwrap_or("A");
            address = format!("{}, {} {}", address, floor, door);
        }

        customer_profile::ActiveModel {
            user_id: Set(account.id),
            phone_number: Set(format!("6{}", rng.random_range(10000000..=99999999))),
            address: Set(address),
            city: Set(city.to_string()),
            postal_code: Set(postal_code),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
    }

    println!("  Created {} customers with profiles", NUM_CUSTOMERS);
    Ok(())
}

async fn seed_staff(db: &DatabaseConnection, rng: &mut StdRng) -> Result<()> {
    let male_names = [
        "Alberto", "Roberto", "Ricardo", "Emilio", "Marcos", "Jorge", "Angel", "Raul",
        "Victor", "Andres",
    ];
    let female_names = [
        "Sonia", "Monica", "Pilar", "Rosa", "Teresa", "Ines", "Nuria", "Gloria", "Dolores",
        "Mercedes",
    ];
    let last_names = [
        "Garcia", "Fernandez", "Gonzalez", "Rodriguez", "Lopez", "Martinez", "Sanchez",
        "Perez", "Gomez", "Martin", "Jimenez", "Ruiz", "Hernandez", "Diaz", "Moreno",
    ];
    let roles = ["admin", "gerente", "staff", "empleado", "supervisor"];

    let password_hash = hash_password(SEED_PASSWORD)?;

    for i in 0..NUM_STAFF {
        let first_name = if i % 2 == 0 {
            male_names.choose(rng).copied().unwrap_or("Alberto")
        } else {
            female_names.choose(rng).copied().unwrap_or("Sonia")
        };
        let last_name1 = last_names.choose(rng).copied().unwrap_or("Garcia");
        let last_name2 = last_names.choose(rng).copied().unwrap_or("Lopez");
        let role = roles[i % roles.len()];

        let now = Utc::now();
        user::ActiveModel {
            email: Set(format!(
                "{}.{}{}@calzmarilo.es",
                role,
                first_name.to_lowercase(),
                i + 1
            )),
            password_hash: Set(password_hash.clone()),
            first_name: Set(first_name.to_string()),
            last_name: Set(format!("{} {}", last_name1, last_name2)),
            is_staff: Set(true),
            is_superuser: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    println!("  Created {} staff accounts", NUM_STAFF);
    Ok(())
}
