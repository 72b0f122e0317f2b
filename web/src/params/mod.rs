pub(crate) mod board;
pub(crate) mod column;
