use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CustomerError, CustomerResult};
use crate::filter::CustomerQuery;
use crate::models::Customer;

/// Store handle for customer records
///
/// Every write either applies completely or leaves the store unchanged.
/// Implementations also reject writes that would duplicate a username or
/// email, which backs up the read-then-write checks in the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Get a customer by ID
    async fn find(&self, id: i32) -> CustomerResult<Option<Customer>>;

    /// List customers matching the query, ordered by ID
    async fn find_all(&self, query: &CustomerQuery) -> CustomerResult<Vec<Customer>>;

    /// Persist a new customer and return it with its assigned ID
    async fn insert(&self, customer: Customer) -> CustomerResult<Customer>;

    /// Overwrite every field of the customer stored under `customer.id`
    async fn replace(&self, customer: Customer) -> CustomerResult<Customer>;

    /// Delete a customer by ID, returning whether a record was removed
    async fn remove(&self, id: i32) -> CustomerResult<bool>;
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Customer>,
    last_id: i32,
}

impl Table {
    fn check_unique(&self, customer: &Customer) -> CustomerResult<()> {
        let others = self.rows.values().filter(|c| c.id != customer.id);
        for other in others {
            if other.username == customer.username {
                return Err(CustomerError::DuplicateUsername(customer.username.clone()));
            }
            if other.email == customer.email {
                return Err(CustomerError::DuplicateEmail(customer.email.clone()));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of CustomerRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomerRepository {
    table: Arc<RwLock<Table>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn find(&self, id: i32) -> CustomerResult<Option<Customer>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_all(&self, query: &CustomerQuery) -> CustomerResult<Vec<Customer>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut customer: Customer) -> CustomerResult<Customer> {
        let mut table = self.table.write().await;

        customer.id = None;
        table.check_unique(&customer)?;

        let id = table.last_id + 1;
        customer.id = Some(id);
        table.rows.insert(id, customer.clone());
        table.last_id = id;

        tracing::info!(customer_id = id, username = %customer.username, "Inserted customer");
        Ok(customer)
    }

    async fn replace(&self, customer: Customer) -> CustomerResult<Customer> {
        let id = customer.id.ok_or(CustomerError::NoValidId)?;
        let mut table = self.table.write().await;

        if !table.rows.contains_key(&id) {
            return Err(CustomerError::NotFound(id));
        }
        table.check_unique(&customer)?;
        table.rows.insert(id, customer.clone());

        tracing::info!(customer_id = id, "Replaced customer");
        Ok(customer)
    }

    async fn remove(&self, id: i32) -> CustomerResult<bool> {
        let mut table = self.table.write().await;
        let removed = table.rows.remove(&id).is_some();

        if removed {
            tracing::info!(customer_id = id, "Removed customer");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Condition;
    use crate::models::Gender;

    fn customer(username: &str, email: &str) -> Customer {
        Customer {
            id: None,
            username: username.to_string(),
            password: "digest".to_string(),
            first_name: "Test".to_string(),
            last_name: "Customer".to_string(),
            gender: Gender::Unknown,
            active: false,
            address: "1 Main St".to_string(),
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_ids() {
        let repo = InMemoryCustomerRepository::new();

        let first = repo.insert(customer("one", "one@example.com")).await.unwrap();
        let second = repo.insert(customer("two", "two@example.com")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find(1).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_insert_ignores_supplied_id() {
        let repo = InMemoryCustomerRepository::new();
        let mut input = customer("one", "one@example.com");
        input.id = Some(77);

        let created = repo.insert(input).await.unwrap();
        assert_eq!(created.id, Some(1));
        assert!(repo.find(77).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_remove() {
        let repo = InMemoryCustomerRepository::new();
        let first = repo.insert(customer("one", "one@example.com")).await.unwrap();
        repo.remove(first.id.unwrap()).await.unwrap();

        let second = repo.insert(customer("two", "two@example.com")).await.unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn test_store_rejects_duplicates() {
        let repo = InMemoryCustomerRepository::new();
        repo.insert(customer("one", "one@example.com")).await.unwrap();

        let result = repo.insert(customer("one", "other@example.com")).await;
        assert!(matches!(result, Err(CustomerError::DuplicateUsername(_))));

        let result = repo.insert(customer("other", "one@example.com")).await;
        assert!(matches!(result, Err(CustomerError::DuplicateEmail(_))));

        assert_eq!(repo.find_all(&CustomerQuery::new()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_requires_existing_id() {
        let repo = InMemoryCustomerRepository::new();

        let result = repo.replace(customer("one", "one@example.com")).await;
        assert!(matches!(result, Err(CustomerError::NoValidId)));

        let mut ghost = customer("one", "one@example.com");
        ghost.id = Some(9);
        let result = repo.replace(ghost).await;
        assert!(matches!(result, Err(CustomerError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_replace_overwrites_fields() {
        let repo = InMemoryCustomerRepository::new();
        let mut created = repo.insert(customer("one", "one@example.com")).await.unwrap();

        created.address = "2 Side St".to_string();
        created.active = true;
        repo.replace(created.clone()).await.unwrap();

        assert_eq!(repo.find(created.id.unwrap()).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_remove_reports_absence() {
        let repo = InMemoryCustomerRepository::new();
        let created = repo.insert(customer("one", "one@example.com")).await.unwrap();
        let id = created.id.unwrap();

        assert!(repo.remove(id).await.unwrap());
        assert!(!repo.remove(id).await.unwrap());
        assert!(repo.find(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_applies_query() {
        let repo = InMemoryCustomerRepository::new();
        let mut active = customer("active", "active@example.com");
        active.active = true;
        repo.insert(active).await.unwrap();
        repo.insert(customer("idle", "idle@example.com")).await.unwrap();

        let query = CustomerQuery::new().with(Condition::Active(true));
        let found = repo.find_all(&query).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "active");
    }
}
