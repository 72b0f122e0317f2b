//! Fixtures shared by the domain tests that run against `MockDatabase`.

use crate::{board_columns, boards, cards, users, Id};
use async_trait::async_trait;
use chrono::Utc;
use clap::Parser;
use events::{DomainEvent, EventHandler, EventPublisher};
use sea_orm::MockExecResult;
use service::config::Config;
use std::sync::{Arc, Mutex};

pub(crate) fn config() -> Config {
    Config::parse_from(["kanban_board_rs"]).set_jwt_secret("test-secret".to_string())
}

pub(crate) fn user_model(username: &str) -> users::Model {
    let now = Utc::now();
    users::Model {
        id: Id::new_v4(),
        name: username.to_string(),
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password: "hash".to_string(),
        role: users::Role::User,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub(crate) fn board_model(name: &str) -> boards::Model {
    let now = Utc::now();
    boards::Model {
        id: Id::new_v4(),
        name: name.to_string(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub(crate) fn column_model(board_id: Id, name: &str) -> board_columns::Model {
    let now = Utc::now();
    board_columns::Model {
        id: Id::new_v4(),
        name: name.to_string(),
        board_id,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub(crate) fn card_model(column_id: Id, title: &str) -> cards::Model {
    let now = Utc::now();
    cards::Model {
        id: Id::new_v4(),
        title: title.to_string(),
        description: format!("{title} description"),
        due_date: None,
        column_id,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub(crate) fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

/// Records every published event so tests can assert on what reached the hub.
#[derive(Default)]
pub(crate) struct RecordingHandler {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingHandler {
    pub(crate) fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &DomainEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub(crate) fn recording_publisher() -> (EventPublisher, Arc<RecordingHandler>) {
    let recorder = Arc::new(RecordingHandler::default());
    let publisher = EventPublisher::new().with_handler(recorder.clone());
    (publisher, recorder)
}
