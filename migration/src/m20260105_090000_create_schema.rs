use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the kanban schema that holds every table
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS kanban;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO kanban, public;")
            .await?;

        // gen_random_uuid() lives in pgcrypto on PostgreSQL versions before 13
        manager
            .get_connection()
            .execute_unprepared("CREATE EXTENSION IF NOT EXISTS pgcrypto;")
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS kanban CASCADE;")
            .await?;

        Ok(())
    }
}
