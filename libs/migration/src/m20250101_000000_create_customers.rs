use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

// Unique violations are mapped back to the offending field by index name,
// so both names must contain the column name.
const USERNAME_INDEX: &str = "idx_customers_username";
const EMAIL_INDEX: &str = "idx_customers_email";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Gender::Enum)
                    .values([Gender::Male, Gender::Female, Gender::Unknown])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string_len(Customers::Username, 255))
                    .col(string_len(Customers::Password, 255))
                    .col(string_len(Customers::FirstName, 255))
                    .col(string_len(Customers::LastName, 255))
                    .col(
                        ColumnDef::new(Customers::Gender)
                            .enumeration(
                                Gender::Enum,
                                [Gender::Male, Gender::Female, Gender::Unknown],
                            )
                            .not_null()
                            .default("UNKNOWN"),
                    )
                    .col(boolean(Customers::Active).default(false))
                    .col(string_len(Customers::Address, 255))
                    .col(string_len(Customers::Email, 255))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USERNAME_INDEX)
                    .table(Customers::Table)
                    .col(Customers::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(EMAIL_INDEX)
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Gender::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Username,
    Password,
    FirstName,
    LastName,
    Gender,
    Active,
    Address,
    Email,
}

#[derive(DeriveIden)]
enum Gender {
    #[sea_orm(iden = "gender")]
    Enum,
    #[sea_orm(iden = "MALE")]
    Male,
    #[sea_orm(iden = "FEMALE")]
    Female,
    #[sea_orm(iden = "UNKNOWN")]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_columns_are_bounded() {
        let sql = Table::create()
            .table(Customers::Table)
            .col(string_len(Customers::Username, 255))
            .col(string_len(Customers::Email, 255))
            .to_string(PostgresQueryBuilder);

        assert!(sql.contains(r#"CREATE TABLE "customers""#), "{sql}");
        assert!(sql.contains(r#""username" varchar(255)"#), "{sql}");
        assert!(sql.contains(r#""email" varchar(255)"#), "{sql}");
    }

    #[test]
    fn test_username_index_is_unique() {
        let sql = Index::create()
            .name(USERNAME_INDEX)
            .table(Customers::Table)
            .col(Customers::Username)
            .unique()
            .to_string(PostgresQueryBuilder);

        assert!(sql.starts_with("CREATE UNIQUE INDEX"), "{sql}");
        assert!(sql.contains(r#""idx_customers_username""#), "{sql}");
    }

    #[test]
    fn test_index_names_identify_columns() {
        assert!(USERNAME_INDEX.contains("username"));
        assert!(EMAIL_INDEX.contains("email"));
    }
}
