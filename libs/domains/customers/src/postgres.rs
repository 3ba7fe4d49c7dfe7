use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select, SqlErr, TransactionError, TransactionTrait,
};

use crate::{
    entity,
    error::{CustomerError, CustomerResult},
    filter::{Condition, CustomerQuery, TextField, TextMatch},
    models::Customer,
    repository::CustomerRepository,
};

pub struct PgCustomerRepository {
    db: DatabaseConnection,
}

impl PgCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn column(field: TextField) -> entity::Column {
    match field {
        TextField::Username => entity::Column::Username,
        TextField::Email => entity::Column::Email,
        TextField::Address => entity::Column::Address,
        TextField::FirstName => entity::Column::FirstName,
        TextField::LastName => entity::Column::LastName,
    }
}

/// Escape LIKE wildcards so the needle is matched literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn apply(select: Select<entity::Entity>, condition: &Condition) -> Select<entity::Entity> {
    use sea_orm::sea_query::extension::postgres::PgExpr;

    match condition {
        Condition::Text(field, TextMatch::Exact(value)) => {
            select.filter(column(*field).eq(value.as_str()))
        }
        Condition::Text(field, TextMatch::Fuzzy(needle)) => {
            select.filter(Expr::col(column(*field)).ilike(like_pattern(needle)))
        }
        Condition::Gender(gender) => select.filter(entity::Column::Gender.eq(*gender)),
        Condition::Active(active) => select.filter(entity::Column::Active.eq(*active)),
    }
}

/// Map a failed write to the domain error, translating unique violations.
fn write_error(err: TransactionError<DbErr>, customer: &Customer) -> CustomerError {
    let err = match err {
        TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
    };
    let sql_err = err.sql_err();
    translate(err, sql_err, customer)
}

/// Unique violations are told apart by the index name in the driver message.
fn translate(err: DbErr, sql_err: Option<SqlErr>, customer: &Customer) -> CustomerError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("username") => {
            CustomerError::DuplicateUsername(customer.username.clone())
        }
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("email") => {
            CustomerError::DuplicateEmail(customer.email.clone())
        }
        _ => match err {
            DbErr::RecordNotUpdated => match customer.id {
                Some(id) => CustomerError::NotFound(id),
                None => CustomerError::NoValidId,
            },
            other => CustomerError::storage(other),
        },
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn find(&self, id: i32) -> CustomerResult<Option<Customer>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(CustomerError::storage)?;

        Ok(model.map(Into::into))
    }

    async fn find_all(&self, query: &CustomerQuery) -> CustomerResult<Vec<Customer>> {
        let select = query
            .conditions()
            .iter()
            .fold(entity::Entity::find(), apply)
            .order_by_asc(entity::Column::Id);

        let models = select.all(&self.db).await.map_err(CustomerError::storage)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, mut customer: Customer) -> CustomerResult<Customer> {
        customer.id = None;
        let active_model: entity::ActiveModel = customer.clone().into();

        let model = self
            .db
            .transaction::<_, entity::Model, DbErr>(|txn| {
                Box::pin(async move { active_model.insert(txn).await })
            })
            .await
            .map_err(|e| write_error(e, &customer))?;

        tracing::info!(customer_id = model.id, username = %model.username, "Inserted customer");
        Ok(model.into())
    }

    async fn replace(&self, customer: Customer) -> CustomerResult<Customer> {
        let id = customer.id.ok_or(CustomerError::NoValidId)?;
        let active_model = entity::ActiveModel::from(customer.clone());

        let model = self
            .db
            .transaction::<_, entity::Model, DbErr>(|txn| {
                Box::pin(async move { active_model.update(txn).await })
            })
            .await
            .map_err(|e| write_error(e, &customer))?;

        tracing::info!(customer_id = id, "Replaced customer");
        Ok(model.into())
    }

    async fn remove(&self, id: i32) -> CustomerResult<bool> {
        let result = self
            .db
            .transaction::<_, _, DbErr>(|txn| {
                Box::pin(async move { entity::Entity::delete_by_id(id).exec(txn).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(e) | TransactionError::Transaction(e) => {
                    CustomerError::storage(e)
                }
            })?;

        if result.rows_affected > 0 {
            tracing::info!(customer_id = id, "Removed customer");
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn model(id: i32, username: &str) -> entity::Model {
        entity::Model {
            id,
            username: username.to_string(),
            password: "digest".to_string(),
            first_name: "Fido".to_string(),
            last_name: "Dog".to_string(),
            gender: Gender::Male,
            active: true,
            address: "1660 Broadway".to_string(),
            email: format!("{}@example.com", username),
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_query_translates_to_sql() {
        let query = CustomerQuery::new()
            .with(Condition::Text(TextField::Username, TextMatch::parse("\"fido\"")))
            .with(Condition::Text(TextField::Address, TextMatch::parse("Broad")))
            .with(Condition::Active(true));

        let sql = query
            .conditions()
            .iter()
            .fold(entity::Entity::find(), apply)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""username" = 'fido'"#), "{sql}");
        assert!(sql.contains(r#""address" ILIKE '%broad%'"#), "{sql}");
        assert!(sql.contains(r#""active" ="#), "{sql}");
    }

    #[tokio::test]
    async fn test_find_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(4, "fido")]])
            .into_connection();
        let repo = PgCustomerRepository::new(db);

        let customer = repo.find(4).await.unwrap().unwrap();
        assert_eq!(customer.id, Some(4));
        assert_eq!(customer.username, "fido");
    }

    #[tokio::test]
    async fn test_insert_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model(12, "fido")]])
            .into_connection();
        let repo = PgCustomerRepository::new(db);

        let mut input: Customer = model(0, "fido").into();
        input.id = None;
        let created = repo.insert(input).await.unwrap();

        assert_eq!(created.id, Some(12));
    }

    #[tokio::test]
    async fn test_storage_error_becomes_data_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let repo = PgCustomerRepository::new(db);

        let mut input: Customer = model(0, "fido").into();
        input.id = None;
        let result = repo.insert(input).await;

        assert!(matches!(result, Err(CustomerError::DataValidation(cause)) if cause.contains("disk full")));
    }

    #[test]
    fn test_unique_violation_on_email_index() {
        let customer: Customer = model(5, "fido").into();
        let violation = SqlErr::UniqueConstraintViolation(
            r#"duplicate key value violates unique constraint "idx_customers_email""#.to_string(),
        );

        let err = translate(DbErr::Custom("23505".to_string()), Some(violation), &customer);
        assert!(matches!(err, CustomerError::DuplicateEmail(email) if email == "fido@example.com"));
    }

    #[test]
    fn test_unique_violation_on_username_index() {
        let customer: Customer = model(5, "fido").into();
        let violation = SqlErr::UniqueConstraintViolation(
            r#"duplicate key value violates unique constraint "idx_customers_username""#
                .to_string(),
        );

        let err = translate(DbErr::Custom("23505".to_string()), Some(violation), &customer);
        assert!(matches!(err, CustomerError::DuplicateUsername(name) if name == "fido"));
    }

    #[test]
    fn test_record_not_updated_is_not_found() {
        let customer: Customer = model(9, "fido").into();
        let err = translate(DbErr::RecordNotUpdated, None, &customer);
        assert!(matches!(err, CustomerError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_replace_storage_error_becomes_data_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .append_exec_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgCustomerRepository::new(db);

        let result = repo.replace(model(3, "fido").into()).await;
        assert!(matches!(result, Err(CustomerError::DataValidation(cause)) if cause.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_remove_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgCustomerRepository::new(db);

        assert!(repo.remove(3).await.unwrap());
        assert!(!repo.remove(3).await.unwrap());
    }
}
