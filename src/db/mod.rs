use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Category, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price, available, category";

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// Connect the pool and bring the schema up to date.
pub async fn init_db(config: &Config) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_uri)
        .await
        .context("could not connect to DATABASE_URI")?;
    info!("Database connection pool established.");

    info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("could not apply migrations")?;
    info!("Migrations complete.");

    Ok(pool)
}

pub async fn close_db(pool: PgPool) {
    pool.close().await;
    info!("Database connection pool closed.");
}

// ── Writes ────────────────────────────────────────────────────────────────────

pub async fn insert_product(pool: &PgPool, product: &Product) -> AppResult<Product> {
    let mut tx = pool.begin().await?;

    let stored = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (name, description, price, available, category)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.available)
    .bind(product.category)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(stored)
}

/// Returns `None` when no row has the given id.
pub async fn update_product(pool: &PgPool, id: i32, product: &Product) -> AppResult<Option<Product>> {
    let mut tx = pool.begin().await?;

    let stored = sqlx::query_as::<_, Product>(&format!(
        r#"
        UPDATE products
        SET name        = $1,
            description = $2,
            price       = $3,
            available   = $4,
            category    = $5
        WHERE id = $6
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.available)
    .bind(product.category)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(stored)
}

/// Returns whether a row was removed.
pub async fn delete_product(pool: &PgPool, id: i32) -> AppResult<bool> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

// ── Reads ─────────────────────────────────────────────────────────────────────

pub async fn fetch_all_products(pool: &PgPool) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn fetch_product_by_id(pool: &PgPool, id: i32) -> AppResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(product)
}

pub async fn fetch_products_by_name(pool: &PgPool, name: &str) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1 ORDER BY id"
    ))
    .bind(name)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn fetch_products_by_category(pool: &PgPool, category: Category) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE category = $1 ORDER BY id"
    ))
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(products)
}

pub async fn fetch_products_by_availability(pool: &PgPool, available: bool) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE available = $1 ORDER BY id"
    ))
    .bind(available)
    .fetch_all(pool)
    .await?;
    Ok(products)
}
