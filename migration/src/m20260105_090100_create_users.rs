use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE TYPE kanban.role AS ENUM ('user', 'admin')")
            .await?;

        let create_table_sql = "CREATE TABLE IF NOT EXISTS kanban.users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            username VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            password VARCHAR(255) NOT NULL,
            role kanban.role NOT NULL DEFAULT 'user',
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT users_username_unique UNIQUE (username),
            CONSTRAINT users_email_unique UNIQUE (email)
        )";

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS kanban.users")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS kanban.role")
            .await?;

        Ok(())
    }
}
