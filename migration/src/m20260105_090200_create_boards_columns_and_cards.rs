use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let create_boards_sql = "CREATE TABLE IF NOT EXISTS kanban.boards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )";

        let create_columns_sql = "CREATE TABLE IF NOT EXISTS kanban.board_columns (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            board_id UUID NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT fk_board_columns_board
                FOREIGN KEY (board_id)
                REFERENCES kanban.boards(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )";

        // due_date is a free-form string chosen by the client, not a timestamp
        let create_cards_sql = "CREATE TABLE IF NOT EXISTS kanban.cards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            due_date VARCHAR(255),
            column_id UUID NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            CONSTRAINT fk_cards_column
                FOREIGN KEY (column_id)
                REFERENCES kanban.board_columns(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )";

        for sql in [create_boards_sql, create_columns_sql, create_cards_sql] {
            manager.get_connection().execute_unprepared(sql).await?;
        }

        // Columns and cards are always loaded by their parent, oldest first
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS board_columns_board_id_created_at_idx
                ON kanban.board_columns(board_id, created_at)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS cards_column_id_created_at_idx
                ON kanban.cards(column_id, created_at)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse dependency order (indexes go with their tables)
        for table in ["cards", "board_columns", "boards"] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TABLE IF EXISTS kanban.{table}"))
                .await?;
        }

        Ok(())
    }
}
