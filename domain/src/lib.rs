//! The mutation gateway. Every operation that changes a board, column or card
//! runs in this crate: the caller is authorized, the store is changed, the
//! result is re-read, and the change is published as a `DomainEvent`.
//!
//! This module also re-exports the entities and read shapes from the
//! `entity_api` crate so that consumers of `domain` do not depend on
//! `entity_api` directly.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{board::BoardWithAssociations, card::CardWithMembers, column::ColumnWithCards};
pub use entity_api::{board_columns, boards, cards, jwts, users, Id};

pub mod authorization;
pub mod board;
pub mod card;
pub mod column;
pub mod error;
pub mod jwt;
pub mod mutation;
pub mod user;

#[cfg(all(test, feature = "mock"))]
pub(crate) mod test_support;
