use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Junction tables between users and the boards and cards they joined.
        // The composite primary key makes a second join of the same pair fail.
        let create_board_members_sql = "CREATE TABLE IF NOT EXISTS kanban.board_members (
            board_id UUID NOT NULL,
            user_id UUID NOT NULL,
            PRIMARY KEY (board_id, user_id),
            CONSTRAINT fk_board_members_board
                FOREIGN KEY (board_id)
                REFERENCES kanban.boards(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE,
            CONSTRAINT fk_board_members_user
                FOREIGN KEY (user_id)
                REFERENCES kanban.users(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )";

        let create_card_members_sql = "CREATE TABLE IF NOT EXISTS kanban.card_members (
            card_id UUID NOT NULL,
            user_id UUID NOT NULL,
            PRIMARY KEY (card_id, user_id),
            CONSTRAINT fk_card_members_card
                FOREIGN KEY (card_id)
                REFERENCES kanban.cards(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE,
            CONSTRAINT fk_card_members_user
                FOREIGN KEY (user_id)
                REFERENCES kanban.users(id)
                ON DELETE CASCADE
                ON UPDATE CASCADE
        )";

        manager
            .get_connection()
            .execute_unprepared(create_board_members_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared(create_card_members_sql)
            .await?;

        // Lookups of "boards this user belongs to" go through user_id
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS board_members_user_id_idx
                ON kanban.board_members(user_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS kanban.card_members")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS kanban.board_members")
            .await?;

        Ok(())
    }
}
