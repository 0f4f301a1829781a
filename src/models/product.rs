use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::PgPool;

use crate::db;
use crate::error::{AppError, AppResult, ValidationError};

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 250;

/// Product categories, stored as the `product_category` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Symbolic names only, matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory(s.to_string()))
    }
}

/// The product entity. `id` is `None` while the record is transient and is
/// only ever assigned by the database on `create`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

impl Product {
    /// Build a transient product.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description,
            price: normalize_price(price),
            available,
            category,
        }
    }

    // ── JSON ─────────────────────────────────────────────────────────────────

    /// Wire representation. `price` is a decimal string so no precision is lost.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price,
            "available": self.available,
            "category": self.category,
        })
    }

    /// Decode and validate a transient product from a JSON payload.
    /// Any `id` in the payload is ignored.
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let obj = data.as_object().ok_or(ValidationError::NotAnObject)?;

        let name = match required(obj, "name")? {
            Value::String(s) => s.clone(),
            _ => return Err(invalid_type("name", "string")),
        };
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        check_text("name", &name, NAME_MAX_LEN)?;

        let description = match obj.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => {
                check_text("description", s, DESCRIPTION_MAX_LEN)?;
                Some(s.clone())
            }
            Some(_) => return Err(invalid_type("description", "string")),
        };

        let price = parse_price(required(obj, "price")?)?;

        let available = match required(obj, "available")? {
            Value::Bool(b) => *b,
            _ => return Err(invalid_type("available", "boolean")),
        };

        let category = match required(obj, "category")? {
            Value::String(s) => s.parse::<Category>()?,
            _ => return Err(invalid_type("category", "string")),
        };

        Ok(Self::new(name, description, price, available, category))
    }

    /// Take every attribute except `id` from `other`.
    pub fn replace_fields(&mut self, other: Product) {
        self.name = other.name;
        self.description = other.description;
        self.price = other.price;
        self.available = other.available;
        self.category = other.category;
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Insert a transient product; on success `self` carries the new id.
    pub async fn create(&mut self, pool: &PgPool) -> AppResult<()> {
        if let Some(id) = self.id {
            return Err(AppError::AlreadyPersisted(id));
        }
        *self = db::insert_product(pool, self).await?;
        Ok(())
    }

    /// Persist in-place changes of a persistent product.
    pub async fn update(&mut self, pool: &PgPool) -> AppResult<()> {
        let id = self.id.ok_or(AppError::NotPersisted)?;
        *self = db::update_product(pool, id, self)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(())
    }

    /// Remove the stored record. Returns `false` if it was already gone.
    pub async fn delete(&self, pool: &PgPool) -> AppResult<bool> {
        let id = self.id.ok_or(AppError::NotPersisted)?;
        db::delete_product(pool, id).await
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub async fn all(pool: &PgPool) -> AppResult<Vec<Product>> {
        db::fetch_all_products(pool).await
    }

    pub async fn find(pool: &PgPool, id: i32) -> AppResult<Option<Product>> {
        db::fetch_product_by_id(pool, id).await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> AppResult<Vec<Product>> {
        db::fetch_products_by_name(pool, name).await
    }

    pub async fn find_by_category(pool: &PgPool, category: Category) -> AppResult<Vec<Product>> {
        db::fetch_products_by_category(pool, category).await
    }

    pub async fn find_by_availability(pool: &PgPool, available: bool) -> AppResult<Vec<Product>> {
        db::fetch_products_by_availability(pool, available).await
    }
}

pub fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Product with id '{}' was not found.", id))
}

/// Parse an availability path segment.
pub fn parse_availability(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ValidationError::InvalidAvailability(raw.to_string())),
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, ValidationError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
        Some(v) => Ok(v),
    }
}

fn invalid_type(field: &'static str, expected: &'static str) -> ValidationError {
    ValidationError::InvalidType { field, expected }
}

/// Postgres text columns cannot hold NUL.
fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::InvalidCharacter(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Accepts a JSON number or a decimal string.
fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(invalid_type("price", "decimal number or string")),
    };
    let price = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| ValidationError::InvalidDecimal(raw.clone()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice);
    }
    // Range is checked after rounding: NUMERIC(14, 2) stores below 10^12.
    let price = normalize_price(price);
    if price >= Decimal::new(1_000_000_000_000_00, 2) {
        return Err(ValidationError::InvalidDecimal(raw));
    }
    Ok(price)
}

/// Two decimal places, rounded the way Postgres rounds NUMERIC.
fn normalize_price(price: Decimal) -> Decimal {
    let mut price = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    price
}
