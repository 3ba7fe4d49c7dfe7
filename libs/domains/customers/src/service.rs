use std::sync::Arc;

use crate::error::{CustomerError, CustomerResult};
use crate::filter::{Condition, CustomerQuery, TextField};
use crate::hashing::hash_password;
use crate::models::{Customer, Gender};
use crate::repository::CustomerRepository;

/// Customer lifecycle: uniqueness checks, password hashing and state changes
pub struct CustomerService<R: CustomerRepository> {
    repository: Arc<R>,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Persist a new customer.
    ///
    /// The plaintext password is replaced by its digest and any supplied ID
    /// is discarded.
    pub async fn create(&self, mut customer: Customer) -> CustomerResult<Customer> {
        if !self.find_by_username(&customer.username).await?.is_empty() {
            return Err(CustomerError::DuplicateUsername(customer.username));
        }
        if !self.find_by_email(&customer.email).await?.is_empty() {
            return Err(CustomerError::DuplicateEmail(customer.email));
        }

        customer.id = None;
        customer.password = hash_password(&customer.password);

        let created = self.repository.insert(customer).await?;
        tracing::info!(customer_id = created.log_id(), "Created {}", created);
        Ok(created)
    }

    /// Persist every field of an existing customer.
    ///
    /// When `previous_hashed_password` is given and differs from
    /// `customer.password`, the password is treated as new plaintext and
    /// hashed. Otherwise it is stored as is.
    pub async fn update(
        &self,
        mut customer: Customer,
        previous_hashed_password: Option<&str>,
    ) -> CustomerResult<Customer> {
        let id = customer.id.ok_or(CustomerError::NoValidId)?;

        let taken = |others: &[Customer]| others.iter().any(|other| other.id != Some(id));
        if taken(&self.find_by_username(&customer.username).await?) {
            return Err(CustomerError::DuplicateUsername(customer.username));
        }
        if taken(&self.find_by_email(&customer.email).await?) {
            return Err(CustomerError::DuplicateEmail(customer.email));
        }

        if let Some(previous) = previous_hashed_password {
            if customer.password != previous {
                customer.password = hash_password(&customer.password);
            }
        }

        let updated = self.repository.replace(customer).await?;
        tracing::info!(customer_id = id, "Updated {}", updated);
        Ok(updated)
    }

    /// Remove a customer permanently.
    pub async fn delete(&self, customer: &Customer) -> CustomerResult<()> {
        let id = customer.id.ok_or(CustomerError::NoValidId)?;
        if self.repository.remove(id).await? {
            tracing::info!(customer_id = id, "Deleted {}", customer);
        }
        Ok(())
    }

    pub async fn activate(&self, customer: &mut Customer) -> CustomerResult<()> {
        self.set_active(customer, true).await
    }

    pub async fn deactivate(&self, customer: &mut Customer) -> CustomerResult<()> {
        self.set_active(customer, false).await
    }

    /// The caller's record is only touched once the change is persisted.
    async fn set_active(&self, customer: &mut Customer, active: bool) -> CustomerResult<()> {
        let mut changed = customer.clone();
        changed.active = active;
        *customer = self.update(changed, None).await?;
        Ok(())
    }

    pub async fn find(&self, id: i32) -> CustomerResult<Option<Customer>> {
        self.repository.find(id).await
    }

    pub async fn all(&self) -> CustomerResult<Vec<Customer>> {
        self.repository.find_all(&CustomerQuery::new()).await
    }

    pub async fn list(&self, query: &CustomerQuery) -> CustomerResult<Vec<Customer>> {
        self.repository.find_all(query).await
    }

    async fn find_by_text(&self, field: TextField, value: &str) -> CustomerResult<Vec<Customer>> {
        let query = CustomerQuery::new().with(Condition::equals(field, value));
        self.repository.find_all(&query).await
    }

    pub async fn find_by_username(&self, username: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_text(TextField::Username, username).await
    }

    pub async fn find_by_email(&self, email: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_text(TextField::Email, email).await
    }

    pub async fn find_by_first_name(&self, first_name: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_text(TextField::FirstName, first_name).await
    }

    /// Alias of [`Self::find_by_first_name`]
    pub async fn find_by_name(&self, name: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_first_name(name).await
    }

    pub async fn find_by_last_name(&self, last_name: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_text(TextField::LastName, last_name).await
    }

    pub async fn find_by_address(&self, address: &str) -> CustomerResult<Vec<Customer>> {
        self.find_by_text(TextField::Address, address).await
    }

    pub async fn find_by_active(&self, active: bool) -> CustomerResult<Vec<Customer>> {
        let query = CustomerQuery::new().with(Condition::Active(active));
        self.repository.find_all(&query).await
    }

    pub async fn find_by_gender(&self, gender: Gender) -> CustomerResult<Vec<Customer>> {
        let query = CustomerQuery::new().with(Condition::Gender(gender));
        self.repository.find_all(&query).await
    }
}
