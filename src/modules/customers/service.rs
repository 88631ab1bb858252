use sqlx::SqlitePool;

use super::models::{Customer, CustomerPayload};
use super::repository::CustomerRepository;
use super::validation::validate_customer;
use crate::error::{RepositoryError, ServiceError};

/// Create and lookup of customers. Customers are never updated or deleted.
#[derive(Clone)]
pub struct CustomerService {
    pool: SqlitePool,
}

impl CustomerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> CustomerRepository<'_> {
        CustomerRepository::new(&self.pool)
    }

    /// Validate and store a new customer, returning it with its assigned id.
    pub async fn create_customer(&self, payload: &CustomerPayload) -> Result<Customer, ServiceError> {
        let customer = validate_customer(payload)?;
        let repo = self.repository();

        if repo.find_by_user_id(&customer.user_id).await?.is_some() {
            return Err(duplicate_user_id());
        }

        let stored = repo.insert(&customer).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => duplicate_user_id(),
            other => other.into(),
        })?;

        tracing::info!(id = stored.id, user_id = %stored.user_id, "customer created");
        Ok(stored)
    }

    pub async fn get_customer_by_id(&self, id: Option<i64>) -> Result<Customer, ServiceError> {
        let id = id
            .filter(|id| *id > 0)
            .ok_or_else(|| ServiceError::invalid("id", "id must be a positive integer"))?;

        self.repository()
            .find_by_id(id)
            .await?
            .ok_or_else(customer_not_found)
    }

    pub async fn get_customer_by_user_id(
        &self,
        user_id: Option<&str>,
    ) -> Result<Customer, ServiceError> {
        let user_id = user_id
            .filter(|user_id| !user_id.trim().is_empty())
            .ok_or_else(|| ServiceError::invalid("userId", "userId is mandatory"))?;

        self.repository()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(customer_not_found)
    }
}

fn duplicate_user_id() -> ServiceError {
    ServiceError::Duplicate("userId already exists".to_string())
}

fn customer_not_found() -> ServiceError {
    ServiceError::NotFound("Customer not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_pool;

    fn payload(user_id: &str) -> CustomerPayload {
        CustomerPayload {
            user_id: Some(user_id.into()),
            name: Some("Ada Lovelace".into()),
            phone: Some("+14125551234".into()),
            address: Some("5000 Forbes Ave".into()),
            address2: None,
            city: Some("Pittsburgh".into()),
            state: Some("PA".into()),
            zipcode: Some("15213".into()),
        }
    }

    async fn service() -> CustomerService {
        CustomerService::new(test_pool().await)
    }

    #[tokio::test]
    async fn created_customer_found_by_both_keys() {
        let service = service().await;

        let created = service
            .create_customer(&payload("ada@example.com"))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(
            service.get_customer_by_id(Some(created.id)).await.unwrap(),
            created
        );
        assert_eq!(
            service
                .get_customer_by_user_id(Some("ada@example.com"))
                .await
                .unwrap(),
            created
        );
    }

    #[tokio::test]
    async fn duplicate_user_id_is_rejected() {
        let service = service().await;
        service
            .create_customer(&payload("ada@example.com"))
            .await
            .unwrap();

        let err = service
            .create_customer(&payload("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(ref m) if m == "userId already exists"));
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_user_id_yield_one_winner() {
        let service = service().await;
        let first = payload("race@example.com");
        let second = payload("race@example.com");

        let (a, b) = tokio::join!(
            service.create_customer(&first),
            service.create_customer(&second)
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Duplicate(_)))));
    }

    #[tokio::test]
    async fn invalid_state_or_zipcode_is_rejected() {
        let service = service().await;

        let bad_state = CustomerPayload {
            state: Some("ZZ".into()),
            ..payload("ada@example.com")
        };
        let bad_zip = CustomerPayload {
            zipcode: Some("123".into()),
            ..payload("ada@example.com")
        };

        assert!(matches!(
            service.create_customer(&bad_state).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service.create_customer(&bad_zip).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn lookup_by_id_rejects_non_positive_ids() {
        let service = service().await;

        for id in [None, Some(0), Some(-3)] {
            assert!(matches!(
                service.get_customer_by_id(id).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(matches!(
            service.get_customer_by_id(Some(42)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lookup_by_user_id_rejects_blank() {
        let service = service().await;

        for user_id in [None, Some(""), Some("   ")] {
            assert!(matches!(
                service.get_customer_by_user_id(user_id).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(matches!(
            service.get_customer_by_user_id(Some("ghost@example.com")).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
