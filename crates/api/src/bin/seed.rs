//! Reset the database and load the development fixtures.
//!
//! Requires `DATABASE_URL`. Destroys every user and product.

use catalog_api::auth::password::hash_password;
use catalog_core::roles::Role;
use catalog_db::models::product::CreateProduct;
use catalog_db::models::user::CreateUser;
use catalog_db::repositories::{ProductRepo, UserRepo};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    role: Role,
}

const USERS: [SeedUser; 2] = [
    SeedUser {
        name: "Admin User",
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
    },
    SeedUser {
        name: "Regular User",
        email: "user@example.com",
        password: "user123",
        role: Role::User,
    },
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_seed=info,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = catalog_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    catalog_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let products_removed = ProductRepo::delete_all(&pool)
        .await
        .expect("Failed to clear products");
    let users_removed = UserRepo::delete_all(&pool)
        .await
        .expect("Failed to clear users");
    tracing::info!(products_removed, users_removed, "Cleared existing data");

    let mut admin_id = None;
    for seed in &USERS {
        let password_hash = hash_password(seed.password).expect("Password hashing failed");
        let user = UserRepo::create(
            &pool,
            &CreateUser {
                name: seed.name.to_string(),
                email: seed.email.to_string(),
                password_hash,
                role: seed.role,
            },
        )
        .await
        .expect("Failed to create seed user");
        tracing::info!(user_id = user.id, email = %user.email, role = %user.role, "Created user");

        if user.role.is_admin() {
            admin_id = Some(user.id);
        }
    }
    let admin_id = admin_id.expect("Seed data must include an admin");

    let products = [
        ("Product 1", "Description for product 1", Decimal::new(9999, 2)),
        ("Product 2", "Description for product 2", Decimal::new(14999, 2)),
    ];
    for (name, description, price) in products {
        let product = ProductRepo::create(
            &pool,
            &CreateProduct {
                name: name.to_string(),
                description: description.to_string(),
                price,
                created_by: admin_id,
            },
        )
        .await
        .expect("Failed to create seed product");
        tracing::info!(product_id = product.id, name = %product.name, "Created product");
    }

    tracing::info!("Seeding complete");
}
