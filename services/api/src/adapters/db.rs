//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use pdf_shala_core::domain::{NewUser, Product, User, UserCredentials};
use pdf_shala_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    last_name: String,
    email: String,
    mobile_number: String,
    password: String,
    is_admin: bool,
}

impl UserRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user: User {
                id: self.id,
                username: self.username,
                last_name: self.last_name,
                email: self.email,
                mobile_number: self.mobile_number,
                is_admin: self.is_admin,
            },
            password_hash: self.password,
        }
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: Uuid,
    title: String,
    price: f64,
    image: String,
    pdf: String,
    rating: f64,
    reviews: i32,
    downloads: i32,
}

impl ProductRecord {
    fn to_domain(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            pdf: self.pdf,
            rating: self.rating,
            reviews: self.reviews,
            downloads: self.downloads,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(&self, new_user: NewUser, password_hash: &str) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, last_name, email, mobile_number, password) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, username, last_name, email, mobile_number, password, is_admin",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.mobile_number)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain().user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, last_name, email, mobile_number, password, is_admin \
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))?;

        Ok(record.to_domain())
    }

    async fn list_products(&self) -> PortResult<Vec<Product>> {
        let records = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, title, price, image, pdf, rating, reviews, downloads \
             FROM products ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_product(&self, id: Uuid) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "SELECT id, title, price, image, pdf, rating, reviews, downloads \
             FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?;

        Ok(record.to_domain())
    }

    async fn create_product(
        &self,
        title: &str,
        price: f64,
        image: &str,
        pdf: &str,
    ) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "INSERT INTO products (id, title, price, image, pdf) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, price, image, pdf, rating, reviews, downloads",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(price)
        .bind(image)
        .bind(pdf)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(record.to_domain())
    }

    async fn update_product(
        &self,
        id: Uuid,
        title: &str,
        price: f64,
        image: &str,
        pdf: &str,
    ) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "UPDATE products SET title = $2, price = $3, image = $4, pdf = $5 \
             WHERE id = $1 \
             RETURNING id, title, price, image, pdf, rating, reviews, downloads",
        )
        .bind(id)
        .bind(title)
        .bind(price)
        .bind(image)
        .bind(pdf)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?;

        Ok(record.to_domain())
    }

    async fn delete_product(&self, id: Uuid) -> PortResult<Product> {
        let record = sqlx::query_as::<_, ProductRecord>(
            "DELETE FROM products WHERE id = $1 \
             RETURNING id, title, price, image, pdf, rating, reviews, downloads",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?;

        Ok(record.to_domain())
    }
}
