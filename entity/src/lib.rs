use uuid::Uuid;

pub mod board_columns;
pub mod board_members;
pub mod boards;
pub mod card_members;
pub mod cards;
pub mod jwts;
pub mod roles;
pub mod users;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
