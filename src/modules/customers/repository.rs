//! Customer persistence gateway.

use sqlx::SqlitePool;

use super::models::{Customer, NewCustomer};
use crate::error::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    user_id: String,
    name: String,
    phone: String,
    address: String,
    address2: Option<String>,
    city: String,
    state: String,
    zipcode: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            address2: row.address2,
            city: row.city,
            state: row.state,
            zipcode: row.zipcode,
        }
    }
}

/// Repository for customer table operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, user_id, name, phone, address, address2, city, state, zipcode
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, user_id, name, phone, address, address2, city, state, zipcode
            FROM customers
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a new customer; the store assigns the id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the userId is already taken.
    pub async fn insert(&self, customer: &NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            INSERT INTO customers (user_id, name, phone, address, address2, city, state, zipcode)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, name, phone, address, address2, city, state, zipcode
            "#,
        )
        .bind(&customer.user_id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.address2)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zipcode)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_pool;

    fn new_customer(user_id: &str) -> NewCustomer {
        NewCustomer {
            user_id: user_id.to_string(),
            name: "Grace Hopper".to_string(),
            phone: "412-555-0100".to_string(),
            address: "1 Navy Way".to_string(),
            address2: None,
            city: "Arlington".to_string(),
            state: "VA".to_string(),
            zipcode: "22202-1234".to_string(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let first = repo.insert(&new_customer("grace@example.com")).await.unwrap();
        let second = repo.insert(&new_customer("alan@example.com")).await.unwrap();

        assert!(first.id > 0);
        assert_eq!(second.id, first.id + 1);
        assert_eq!(first, new_customer("grace@example.com").with_id(first.id));
    }

    #[tokio::test]
    async fn find_by_either_key() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        let stored = repo.insert(&new_customer("grace@example.com")).await.unwrap();

        assert_eq!(repo.find_by_id(stored.id).await.unwrap(), Some(stored.clone()));
        assert_eq!(
            repo.find_by_user_id("grace@example.com").await.unwrap(),
            Some(stored)
        );
        assert_eq!(repo.find_by_id(999).await.unwrap(), None);
        assert_eq!(repo.find_by_user_id("nobody@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_user_id_is_conflict() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        repo.insert(&new_customer("grace@example.com")).await.unwrap();
        let err = repo
            .insert(&new_customer("grace@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)), "{err:?}");
    }
}
