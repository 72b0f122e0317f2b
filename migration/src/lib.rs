pub use sea_orm_migration::prelude::*;

mod m20260105_090000_create_schema;
mod m20260105_090100_create_users;
mod m20260105_090200_create_boards_columns_and_cards;
mod m20260105_090300_create_membership_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_090000_create_schema::Migration),
            Box::new(m20260105_090100_create_users::Migration),
            Box::new(m20260105_090200_create_boards_columns_and_cards::Migration),
            Box::new(m20260105_090300_create_membership_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }
    }

    #[test]
    fn migrations_are_applied_in_name_order() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|migration| migration.name().to_string())
            .collect();

        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
        assert_eq!(names[0], "m20260105_090000_create_schema");
    }

    #[tokio::test]
    async fn membership_tables_reference_users_and_cascade() -> Result<(), DbErr> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok(), exec_ok()])
            .into_connection();

        m20260105_090300_create_membership_tables::Migration
            .up(&SchemaManager::new(&db))
            .await?;

        let statements: Vec<String> = db
            .into_transaction_log()
            .iter()
            .flat_map(|transaction| transaction.statements())
            .map(|statement| statement.sql.clone())
            .collect();

        assert_eq!(statements.len(), 3);
        assert!(statements[0].contains("kanban.board_members"));
        assert!(statements[1].contains("kanban.card_members"));
        for sql in &statements[..2] {
            assert!(sql.contains("REFERENCES kanban.users(id)"));
            assert!(sql.contains("ON DELETE CASCADE"));
        }

        Ok(())
    }
}
